//! API Gateway proxy events for the Lambda deployment.

use std::collections::HashMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::query::SubsidySearchParams;
use crate::http::cors::gateway_headers;
use crate::http::endpoints::{self, Reply};
use crate::state::AppState;
use crate::utils::error::ApiError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<Reply> for GatewayResponse {
    fn from(reply: Reply) -> Self {
        let mut headers: HashMap<String, String> = gateway_headers().into_iter().collect();
        let body = match reply.body {
            Some(value) => {
                headers.insert("content-type".to_string(), "application/json".to_string());
                value.to_string()
            }
            None => String::new(),
        };

        Self {
            status_code: reply.status.as_u16(),
            headers,
            body,
            is_base64_encoded: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    GetSubsidies,
    PostNews,
    Health,
}

impl Endpoint {
    fn from_path(path: &str) -> Option<Self> {
        let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        match last {
            "get-subsidies" => Some(Endpoint::GetSubsidies),
            "post-news" => Some(Endpoint::PostNews),
            "health" => Some(Endpoint::Health),
            _ => None,
        }
    }
}

fn search_params(query: Option<HashMap<String, String>>) -> SubsidySearchParams {
    SubsidySearchParams::from_pairs(query.unwrap_or_default())
}

fn method_not_allowed(method: &str) -> Reply {
    Reply::json(
        StatusCode::METHOD_NOT_ALLOWED,
        &json!({ "error": "method_not_allowed", "details": format!("{} is not supported", method) }),
    )
}

pub async fn dispatch(state: &AppState, request: GatewayRequest) -> GatewayResponse {
    let method = request.http_method.to_ascii_uppercase();
    tracing::info!("{} {}", method, request.path);

    let Some(endpoint) = Endpoint::from_path(&request.path) else {
        return Reply::json(
            StatusCode::NOT_FOUND,
            &json!({ "error": "not_found", "details": format!("no route for {}", request.path) }),
        )
        .into();
    };

    if method == "OPTIONS" {
        return Reply::empty().into();
    }

    let reply = match (endpoint, method.as_str()) {
        (Endpoint::GetSubsidies, "GET") => {
            endpoints::search_subsidies(state, search_params(request.query_string_parameters))
                .await
        }
        (Endpoint::PostNews, "POST") => {
            if request.is_base64_encoded {
                Reply::from_error(&ApiError::ValidationError {
                    message: "base64-encoded bodies are not supported".to_string(),
                })
            } else {
                let body = request.body.unwrap_or_default();
                endpoints::post_news(state, body.as_bytes()).await
            }
        }
        (Endpoint::Health, "GET") => endpoints::health(),
        (_, other) => method_not_allowed(other),
    };

    reply.into()
}
