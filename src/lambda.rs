use std::sync::Arc;

use chiiki_api::http::gateway::{dispatch, GatewayRequest, GatewayResponse};
use chiiki_api::utils::{logger, validation::Validate};
use chiiki_api::{AppState, LambdaConfig};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

async fn function_handler(
    state: Arc<AppState>,
    event: LambdaEvent<GatewayRequest>,
) -> Result<GatewayResponse, Error> {
    tracing::debug!("Request id: {}", event.context.request_id);
    Ok(dispatch(&state, event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時讀一次設定，之後每次呼叫共用同一個 client
    let config = LambdaConfig::from_env()?;
    config.validate()?;
    let state = AppState::from_config(&config);

    tracing::info!("Lambda handler ready");
    run(service_fn(move |event: LambdaEvent<GatewayRequest>| {
        let state = state.clone();
        async move { function_handler(state, event).await }
    }))
    .await
}
