use crate::config::{validate_provider, DEFAULT_NEWS_TABLE, DEFAULT_SUBSIDIES_TABLE};
use crate::core::ConfigProvider;
use crate::utils::error::{ApiError, Result};
use std::env;
use std::time::Duration;

/// Lambda 以環境變數設定
#[derive(Clone)]
pub struct LambdaConfig {
    pub backend_url: String,
    pub api_key: String,
    pub subsidies_table: String,
    pub news_table: String,
    pub admin_passphrase: String,
    pub request_timeout_secs: Option<u64>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| ApiError::ConfigError {
                message: format!("{} environment variable is required", key),
            })
        };

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ApiError::InvalidConfigValueError {
                    field: "REQUEST_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            backend_url: required("BACKEND_URL")?,
            api_key: required("BACKEND_API_KEY")?,
            subsidies_table: lookup("SUBSIDIES_TABLE")
                .unwrap_or_else(|| DEFAULT_SUBSIDIES_TABLE.to_string()),
            news_table: lookup("NEWS_TABLE").unwrap_or_else(|| DEFAULT_NEWS_TABLE.to_string()),
            admin_passphrase: required("ADMIN_PASSPHRASE")?,
            request_timeout_secs,
        })
    }
}

impl ConfigProvider for LambdaConfig {
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

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_applies_defaults() {
        let config = LambdaConfig::from_lookup(lookup(&[
            ("BACKEND_URL", "https://abc.supabase.co"),
            ("BACKEND_API_KEY", "service-role"),
            ("ADMIN_PASSPHRASE", "open sesame"),
        ]))
        .unwrap();

        assert_eq!(config.subsidies_table(), "subsidies");
        assert_eq!(config.news_table(), "local_news");
        assert_eq!(config.request_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_required_variable() {
        let result = LambdaConfig::from_lookup(lookup(&[
            ("BACKEND_URL", "https://abc.supabase.co"),
            ("ADMIN_PASSPHRASE", "open sesame"),
        ]));

        match result {
            Err(ApiError::ConfigError { message }) => assert!(message.contains("BACKEND_API_KEY")),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected missing BACKEND_API_KEY"),
        }
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = LambdaConfig::from_lookup(lookup(&[
            ("BACKEND_URL", "https://abc.supabase.co"),
            ("BACKEND_API_KEY", "service-role"),
            ("ADMIN_PASSPHRASE", "open sesame"),
            ("REQUEST_TIMEOUT_SECS", "soon"),
        ]));

        assert!(matches!(
            result,
            Err(ApiError::InvalidConfigValueError { .. })
        ));
    }
}
