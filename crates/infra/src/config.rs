//! Configuration loading.
//!
//! Sources, later ones overriding earlier:
//! 1. defaults in code
//! 2. `config/<environment>` file (any format the `config` crate reads), optional
//! 3. environment variables with the `M2GO_` prefix (`__` separates nesting),
//!    e.g. `M2GO_DEFAULT_CYCLE=friday`, `M2GO_LOG_FORMAT=pretty`
//!
//! The environment name comes from `M2GO_ENVIRONMENT` (default `development`).

use config::{Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use m2go_core::DomainError;
use m2go_ordering::{MixPool, MixPoolTable};

const DEFAULT_ENV: &str = "development";
const DEFAULT_CYCLE: &str = "monday";
const DEFAULT_LOG_FORMAT: &str = "json";
const CONFIG_DIR: &str = "config";

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid pool configuration: {0}")]
    InvalidPools(#[from] DomainError),
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    environment: String,
    default_cycle: String,
    log_format: String,
    /// Absent means the standard pool table; an empty list disables pooling.
    #[serde(default)]
    pools: Option<Vec<MixPool>>,
}

/// Validated application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub environment: String,
    /// Cycle used when a caller does not name one.
    pub default_cycle: String,
    /// `json` or `pretty`.
    pub log_format: String,
    pub pools: MixPoolTable,
}

impl AppConfig {
    /// Load configuration from files and environment variables.
    pub fn load() -> Result<Self, AppConfigError> {
        let environment =
            std::env::var("M2GO_ENVIRONMENT").unwrap_or_else(|_| DEFAULT_ENV.to_string());

        let builder = Self::defaults(&environment)?
            .add_source(File::with_name(&format!("{CONFIG_DIR}/{environment}")).required(false))
            .add_source(
                Environment::with_prefix("M2GO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_raw(builder.build()?.try_deserialize()?)
    }

    /// Parse a TOML document on top of the defaults (no env overrides).
    pub fn from_toml_str(toml: &str) -> Result<Self, AppConfigError> {
        let cfg = Self::defaults(DEFAULT_ENV)?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_raw(cfg.try_deserialize()?)
    }

    fn defaults(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("default_cycle", DEFAULT_CYCLE)?
            .set_default("log_format", DEFAULT_LOG_FORMAT)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, AppConfigError> {
        let pools = match raw.pools {
            Some(pools) => MixPoolTable::new(pools)?,
            None => MixPoolTable::standard(),
        };
        Ok(Self {
            environment: raw.environment,
            default_cycle: raw.default_cycle,
            log_format: raw.log_format,
            pools,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENV.to_string(),
            default_cycle: DEFAULT_CYCLE.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            pools: MixPoolTable::standard(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn pools_come_from_file() {
        let cfg = AppConfig::from_toml_str(
            r#"
            default_cycle = "friday"

            [[pools]]
            id = "herbs"
            forms = ["PREP_chop"]
            members = [
              { product = "parsley", weight = 1.0 },
              { product = "cilantro", weight = 3.0 },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.default_cycle, "friday");
        assert_eq!(cfg.log_format, "json");
        let pool = &cfg.pools.pools()[0];
        assert_eq!(pool.id, "herbs");
        assert_eq!(pool.share_of("cilantro"), Some(0.75));
    }

    #[test]
    fn log_format_comes_from_file() {
        let cfg = AppConfig::from_toml_str(r#"log_format = "pretty""#).unwrap();
        assert_eq!(cfg.log_format, "pretty");
        assert_eq!(cfg.default_cycle, "monday");
    }

    #[test]
    fn empty_pool_list_disables_pooling() {
        let cfg = AppConfig::from_toml_str("pools = []").unwrap();
        assert!(cfg.pools.pools().is_empty());
    }

    #[test]
    fn invalid_weights_are_rejected_at_load() {
        let err = AppConfig::from_toml_str(
            r#"
            [[pools]]
            id = "bad"
            forms = ["PREP_shred"]
            members = [{ product = "carrot", weight = -2.0 }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, AppConfigError::InvalidPools(_)));
    }
}
