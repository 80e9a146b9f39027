use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {message}")]
    ValidationError { message: String },

    #[error("Unauthorized: {message}")]
    AuthError { message: String },

    #[error("Query failed: {message}")]
    QueryError { message: String },

    #[error("Store operation failed: {message}")]
    StoreError { message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// 回應 body 中 `error` 欄位使用的分類字串
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::ValidationError { .. } => "validation_failure",
            ApiError::AuthError { .. } => "auth_failure",
            ApiError::QueryError { .. } => "query_failure",
            ApiError::StoreError { .. }
            | ApiError::HttpError(_)
            | ApiError::SerializationError(_) => "store_failure",
            ApiError::ConfigError { .. }
            | ApiError::InvalidConfigValueError { .. }
            | ApiError::MissingConfigError { .. }
            | ApiError::IoError(_) => "config_failure",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthError { .. } => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 底層診斷訊息 (不含分類前綴)
    pub fn details(&self) -> String {
        match self {
            ApiError::ValidationError { message }
            | ApiError::AuthError { message }
            | ApiError::QueryError { message }
            | ApiError::StoreError { message }
            | ApiError::ConfigError { message } => message.clone(),
            ApiError::HttpError(e) => e.to_string(),
            ApiError::SerializationError(e) => e.to_string(),
            ApiError::IoError(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// 將存取層錯誤轉為查詢失敗，保留原始診斷訊息
    pub fn into_query_failure(self) -> ApiError {
        match self {
            ApiError::QueryError { .. } => self,
            other => ApiError::QueryError {
                message: other.details(),
            },
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        let validation = ApiError::ValidationError {
            message: "name is required".to_string(),
        };
        let auth = ApiError::AuthError {
            message: "passphrase mismatch".to_string(),
        };
        let query = ApiError::QueryError {
            message: "relation does not exist".to_string(),
        };

        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(auth.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(query.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(validation.is_client_error());
        assert!(!query.is_client_error());
    }

    #[test]
    fn test_into_query_failure_keeps_diagnostic() {
        let store = ApiError::StoreError {
            message: "connection refused".to_string(),
        };

        let query = store.into_query_failure();

        assert_eq!(query.category(), "query_failure");
        assert_eq!(query.details(), "connection refused");
    }
}
