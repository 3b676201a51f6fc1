use serde::Deserialize;

use crate::infrastructure::auth::JwtConfig;
use crate::infrastructure::seed::SeedConfig;
use crate::infrastructure::store::StoreConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub seed: SeedConfig,
    /// Token signing for callers that build auth views; the seed and purge
    /// commands do not issue tokens
    pub auth: JwtConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local` and `SEED__*` variables,
    /// later sources overriding earlier ones
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("SEED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::seed::PurgePolicy;
    use crate::infrastructure::store::StoreBackend;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.store.url, "postgres://localhost/anythink-market");
        assert_eq!(config.seed.count, 100);
        assert_eq!(config.seed.purge_policy, PurgePolicy::Strict);
        assert_eq!(config.auth.expiration_days, 60);
    }

    #[test]
    fn test_auth_section_configures_token_issuer() {
        use crate::domain::{TokenIssuer, User};
        use crate::infrastructure::auth::JwtService;

        let config = AppConfig::default();
        let service = JwtService::new(config.auth.clone());

        let token = service.issue(&User::new("alice", "alice@example.com")).unwrap();
        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_partial_sources_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [store]
                backend = "postgres"
                url = "postgres://db/market"

                [seed]
                count = 10
                purge_policy = "lenient"

                [logging]
                format = "json"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.store.url, "postgres://db/market");
        assert_eq!(config.store.operation_timeout_secs, 30);
        assert_eq!(config.seed.count, 10);
        assert_eq!(config.seed.password, "password");
        assert_eq!(config.seed.purge_policy, PurgePolicy::Lenient);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }
}
