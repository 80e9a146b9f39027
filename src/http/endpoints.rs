//! Transport-independent endpoint logic shared by the axum router and the
//! Lambda gateway.

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};

use crate::core::news_insert::InsertNewsRequest;
use crate::core::query::SubsidySearchParams;
use crate::state::AppState;
use crate::utils::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl Reply {
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self {
                status,
                body: Some(value),
            },
            Err(e) => Self::from_error(&ApiError::SerializationError(e)),
        }
    }

    /// 預檢用：200，沒有 body
    pub fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }

    pub fn from_error(error: &ApiError) -> Self {
        Self {
            status: error.status_code(),
            body: Some(error_body(error)),
        }
    }
}

pub fn error_body(error: &ApiError) -> Value {
    json!({
        "error": error.category(),
        "details": error.details(),
    })
}

/// 呼叫端造成的錯誤記為 warn，其餘記為 error
fn failure(endpoint: &str, error: &ApiError) -> Reply {
    if error.is_client_error() {
        tracing::warn!("⚠️ {} rejected: {}", endpoint, error);
    } else {
        tracing::error!("❌ {} failed: {}", endpoint, error);
    }
    Reply::from_error(error)
}

pub async fn search_subsidies(state: &AppState, params: SubsidySearchParams) -> Reply {
    match state.subsidies.search(&params).await {
        Ok(response) => Reply::json(StatusCode::OK, &response),
        Err(e) => failure("get-subsidies", &e),
    }
}

pub async fn post_news(state: &AppState, body: &[u8]) -> Reply {
    let request: InsertNewsRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            return failure(
                "post-news",
                &ApiError::ValidationError {
                    message: format!("malformed JSON body: {}", e),
                },
            );
        }
    };

    match state.news.insert(request).await {
        Ok(outcome) => Reply::json(StatusCode::OK, &outcome),
        Err(e) => failure("post-news", &e),
    }
}

pub fn health() -> Reply {
    Reply::json(StatusCode::OK, &json!({ "status": "ok" }))
}
