use crate::config::{validate_provider, DEFAULT_NEWS_TABLE, DEFAULT_SUBSIDIES_TABLE};
use crate::core::ConfigProvider;
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::Validate;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Deserialize)]
pub struct TomlConfig {
    pub backend: BackendConfig,
    pub admin: AdminConfig,
    pub server: Option<ServerConfig>,
}

#[derive(Clone, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub api_key: String,
    pub subsidies_table: Option<String>,
    pub news_table: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Clone, Deserialize)]
pub struct AdminConfig {
    pub passphrase: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ApiError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ApiError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ADMIN_PASSPHRASE})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ApiError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 伺服器埠號 (未設定時由命令列決定)
    pub fn port(&self) -> Option<u16> {
        self.server.as_ref().and_then(|s| s.port)
    }
}

impl ConfigProvider for TomlConfig {
    fn backend_url(&self) -> &str {
        &self.backend.url
    }

    fn api_key(&self) -> &str {
        &self.backend.api_key
    }

    fn subsidies_table(&self) -> &str {
        self.backend
            .subsidies_table
            .as_deref()
            .unwrap_or(DEFAULT_SUBSIDIES_TABLE)
    }

    fn news_table(&self) -> &str {
        self.backend
            .news_table
            .as_deref()
            .unwrap_or(DEFAULT_NEWS_TABLE)
    }

    fn admin_passphrase(&self) -> &str {
        &self.admin.passphrase
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.backend.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self, true)
    }
}
