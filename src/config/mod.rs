pub mod lambda;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_secret, validate_table_name, validate_url};
#[cfg(feature = "cli")]
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_SUBSIDIES_TABLE: &str = "subsidies";
pub const DEFAULT_NEWS_TABLE: &str = "local_news";
pub const MAX_TIMEOUT_SECS: u64 = 300;

#[cfg(feature = "cli")]
#[derive(Clone, Parser)]
#[command(name = "chiiki-api")]
#[command(about = "Subsidy search and news insert API for the regional dashboard")]
pub struct CliConfig {
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:54321")]
    pub backend_url: String,

    #[arg(long, env = "BACKEND_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "SUBSIDIES_TABLE", default_value = DEFAULT_SUBSIDIES_TABLE)]
    pub subsidies_table: String,

    #[arg(long, env = "NEWS_TABLE", default_value = DEFAULT_NEWS_TABLE)]
    pub news_table: String,

    #[arg(long, env = "ADMIN_PASSPHRASE", default_value = "", hide_env_values = true)]
    pub admin_passphrase: String,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", help = "Upper bound for one search")]
    pub request_timeout_secs: Option<u64>,

    #[arg(long, env = "PORT", default_value = "8787")]
    pub port: u16,

    #[arg(long, help = "Serve subsidies from a JSON fixture file instead of the backend")]
    pub fixtures: Option<String>,

    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn backend_url(&self) -> &str {
        &self.backend_url
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn subsidies_table(&self) -> &str {
        &self.subsidies_table
    }

    fn news_table(&self) -> &str {
        &self.news_table
    }

    fn admin_passphrase(&self) -> &str {
        &self.admin_passphrase
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self, self.fixtures.is_none())
    }
}

/// 所有設定來源共用的檢查；fixture 模式不需要後端連線設定
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C, require_backend: bool) -> Result<()> {
    if require_backend {
        validate_url("backend_url", config.backend_url())?;
        validate_secret("api_key", config.api_key())?;
    }

    validate_table_name("subsidies_table", config.subsidies_table())?;
    validate_table_name("news_table", config.news_table())?;
    validate_secret("admin_passphrase", config.admin_passphrase())?;

    if let Some(timeout) = config.request_timeout() {
        validate_range("request_timeout_secs", timeout.as_secs(), 1, MAX_TIMEOUT_SECS)?;
    }

    tracing::info!("✅ Configuration validation passed");
    Ok(())
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["chiiki-api"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_config_validates_backend_settings() {
        let config = parse(&[
            "--backend-url",
            "https://abc.supabase.co",
            "--api-key",
            "service-role",
            "--admin-passphrase",
            "open sesame",
            "--request-timeout-secs",
            "10",
        ]);

        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.subsidies_table(), "subsidies");
    }

    #[test]
    fn test_fixture_mode_skips_backend_settings() {
        let config = parse(&[
            "--api-key",
            "",
            "--admin-passphrase",
            "open sesame",
            "--fixtures",
            "subsidies.json",
        ]);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_passphrase_fails_validation() {
        let config = parse(&["--api-key", "service-role", "--admin-passphrase", ""]);

        assert!(config.validate().is_err());
    }
}
