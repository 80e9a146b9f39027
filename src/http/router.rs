use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::query::SubsidySearchParams;
use crate::http::cors::{cors_layer, preflight_headers};
use crate::http::endpoints::{self, Reply};
use crate::state::AppState;
use crate::utils::error::{ApiError, Result};

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Reply::from_error(&self).into_response()
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/get-subsidies",
            get(get_subsidies_handler).options(preflight_handler),
        )
        .route(
            "/post-news",
            axum::routing::post(post_news_handler).options(preflight_handler),
        )
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> Reply {
    endpoints::health()
}

async fn get_subsidies_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Reply {
    // 重複的鍵取第一個值，解析本身不會失敗
    let params = SubsidySearchParams::from_query_string(query.as_deref().unwrap_or(""));
    endpoints::search_subsidies(&state, params).await
}

async fn post_news_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Reply {
    endpoints::post_news(&state, &body).await
}

async fn preflight_handler() -> impl IntoResponse {
    (StatusCode::OK, preflight_headers())
}

/// 綁定埠號並服務，收到 Ctrl+C 或 SIGTERM 時優雅關閉
pub async fn serve(state: Arc<AppState>, port: u16) -> Result<()> {
    let app = create_router(state);

    let address = format!("0.0.0.0:{port}");
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("🚀 Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => tracing::error!("Failed to install Ctrl+C handler: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
