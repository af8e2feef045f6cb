use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::requisition::ImportConfig;

pub const ENV_PREFIX: &str = "DEMAND_PLANNER_";
pub const ENV_CONFIG_PATH: &str = "DEMAND_PLANNER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "demand-planner.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub http: HttpConfig,

    #[validate(length(min = 1))]
    pub database_url: String,

    /// `tracing_subscriber::EnvFilter` directive, e.g. `info,sqlx=warn`
    pub log_filter: String,

    #[validate(nested)]
    pub import: ImportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            database_url: "sqlite://demand-planner.db".to_string(),
            log_filter: "info".to_string(),
            import: ImportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the TOML file, then `DEMAND_PLANNER_*` variables
    /// (`__` separates nested keys, e.g. `DEMAND_PLANNER_IMPORT__ROW_LIMIT`)
    pub fn figment() -> Figment {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        config
            .validate()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        config.import.delimiter_byte()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::requisition::TokenizerMode;

    fn base() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::from_figment(base()).unwrap();
        assert_eq!(config.http.port, 3001);
        assert_eq!(config.import.row_limit, 100);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_toml_overrides() {
        let figment = base().merge(Toml::string(
            r#"
            database_url = "sqlite::memory:"

            [http]
            port = 8080

            [import]
            row_limit = 250
            delimiter = ";"
            tokenizer = "split"
            "#,
        ));

        let config = AppConfig::from_figment(figment).unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.import.row_limit, 250);
        assert_eq!(config.import.delimiter, ';');
        assert_eq!(config.import.tokenizer, TokenizerMode::Split);
        assert_eq!(config.import.display_rows, 5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let figment = base().merge(Toml::string("[import]\nrow_limit = 0\n"));
        assert!(matches!(
            AppConfig::from_figment(figment),
            Err(AppError::ConfigError(_))
        ));

        let figment = base().merge(Toml::string("[http]\nport = 0\n"));
        assert!(AppConfig::from_figment(figment).is_err());

        let figment = base().merge(Toml::string("[import]\ndelimiter = '\"'\n"));
        assert!(AppConfig::from_figment(figment).is_err());
    }
}
