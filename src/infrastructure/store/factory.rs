//! Store factory for runtime backend selection

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::comment::Comment;
use crate::domain::item::Item;
use crate::domain::store::{Connection, StoreContext};
use crate::domain::user::User;
use crate::domain::DomainError;

use super::in_memory::InMemoryStore;
use super::postgres::{connect_pool, ensure_schemas, PostgresCollection, PostgresConnection};

/// Supported store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local collections, discarded at exit
    Memory,
    /// PostgreSQL JSONB tables
    #[default]
    Postgres,
}

impl std::str::FromStr for StoreBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::Memory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(DomainError::configuration(format!(
                "Unknown store backend '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Connection URL, used by the postgres backend
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    /// Upper bound for any single store call
    pub operation_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: "postgres://localhost/anythink-market".to_string(),
            max_connections: 5,
            connect_timeout_secs: 10,
            operation_timeout_secs: 30,
        }
    }
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Default::default()
        }
    }

    pub fn postgres(url: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::Postgres,
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Factory for opening store connections
#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    /// Open a connection to the configured backend
    pub async fn connect(config: &StoreConfig) -> Result<StoreContext, DomainError> {
        match config.backend {
            StoreBackend::Memory => {
                info!(backend = %config.backend, "Using in-memory store");
                Ok(InMemoryStore::new().connect())
            }
            StoreBackend::Postgres => Self::connect_postgres(config).await,
        }
    }

    async fn connect_postgres(config: &StoreConfig) -> Result<StoreContext, DomainError> {
        let pool = connect_pool(
            &config.url,
            config.max_connections,
            config.connect_timeout_secs,
        )
        .await?;

        ensure_schemas(&pool).await?;

        let users = PostgresCollection::<User>::new(pool.clone());
        let items = PostgresCollection::<Item>::new(pool.clone());
        let comments = PostgresCollection::<Comment>::new(pool.clone());

        let connection = PostgresConnection::new(pool, &config.url);
        info!(address = %connection.address(), "Connected to PostgreSQL");

        Ok(StoreContext::new(
            Arc::new(connection),
            Arc::new(users),
            Arc::new(items),
            Arc::new(comments),
        ))
    }
}
