use std::time::Duration;

use axum::http::{HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

pub const ALLOWED_HEADERS: [&str; 4] = ["authorization", "x-client-info", "apikey", "content-type"];
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
        .max_age(Duration::from_secs(60 * 60))
}

/// 預檢回應需要的 allow-* 標頭 (origin 由 `cors_layer` 補上)
pub fn preflight_headers() -> [(HeaderName, String); 2] {
    [
        (
            axum::http::header::ACCESS_CONTROL_ALLOW_HEADERS,
            ALLOWED_HEADERS.join(", "),
        ),
        (
            axum::http::header::ACCESS_CONTROL_ALLOW_METHODS,
            allowed_methods(),
        ),
    ]
}

/// Lambda 回應沒有 tower 中介層，每個回應都要帶完整的 CORS 標頭
pub fn gateway_headers() -> Vec<(String, String)> {
    vec![
        ("access-control-allow-origin".to_string(), "*".to_string()),
        (
            "access-control-allow-headers".to_string(),
            ALLOWED_HEADERS.join(", "),
        ),
        ("access-control-allow-methods".to_string(), allowed_methods()),
    ]
}

fn allowed_methods() -> String {
    ALLOWED_METHODS
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
