use std::sync::Arc;

use chiiki_api::core::ConfigProvider;
use chiiki_api::config::validate_provider;
use chiiki_api::utils::logger;
use chiiki_api::{AppState, CliConfig, InMemoryStore, TomlConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting chiiki-api");

    // --config 優先於命令列與環境變數
    let toml_config = match &cli.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path);
            Some(TomlConfig::from_file(path)?)
        }
        None => None,
    };
    let provider: &dyn ConfigProvider = match &toml_config {
        Some(config) => config,
        None => &cli,
    };

    // 驗證配置
    if let Err(e) = validate_provider(provider, cli.fixtures.is_none()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let state = match &cli.fixtures {
        Some(path) => {
            let store = InMemoryStore::from_fixture_file(path).await?;
            tracing::info!("🧪 Serving fixtures from {}", path);
            AppState::new(
                Arc::new(store),
                provider.admin_passphrase(),
                provider.request_timeout(),
            )
        }
        None => AppState::from_config(provider),
    };

    let port = toml_config
        .as_ref()
        .and_then(TomlConfig::port)
        .unwrap_or(cli.port);

    chiiki_api::http::serve(state, port).await?;
    Ok(())
}
