//! PostgreSQL document store with connection pooling
//!
//! Each collection is a table of JSONB documents keyed by UUID. Unique
//! document fields are enforced by expression indexes named
//! `{table}_{field}_key`, so a violation can be mapped back to its field.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::{debug, info};

use crate::domain::comment::{Comment, CommentRepository};
use crate::domain::document::{Document, DocumentKey, ItemId, Repository};
use crate::domain::item::{Item, ItemRepository};
use crate::domain::store::Connection;
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// Open a pool against `url`
pub async fn connect_pool(
    url: &str,
    max_connections: u32,
    connect_timeout_secs: u64,
) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(connect_timeout_secs))
        .connect(url)
        .await
        .map_err(|e| {
            DomainError::connection(format!(
                "Failed to connect to {}: {}",
                redact_address(url),
                e
            ))
        })
}

/// Create every collection's table and indexes, closing the pool if any
/// statement fails
pub async fn ensure_schemas(pool: &PgPool) -> Result<(), DomainError> {
    let result: Result<(), DomainError> = async {
        PostgresCollection::<User>::new(pool.clone()).ensure_schema().await?;
        PostgresCollection::<Item>::new(pool.clone()).ensure_schema().await?;
        PostgresCollection::<Comment>::new(pool.clone()).ensure_schema().await?;
        Ok(())
    }
    .await;

    if result.is_err() {
        pool.close().await;
    }

    result
}

/// Strip credentials from a connection URL
pub fn redact_address(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}{}", &url[..scheme + 3], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}

/// Map a database error to the domain, turning unique violations into
/// conflicts on the field the violated index covers
fn map_write_error<E: Document>(error: sqlx::Error, action: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return DomainError::conflict(conflict_field::<E>(db.constraint()));
        }
    }

    DomainError::storage(format!("Failed to {} {}: {}", action, E::COLLECTION, error))
}

fn conflict_field<E: Document>(constraint: Option<&str>) -> &'static str {
    constraint
        .and_then(|name| {
            E::UNIQUE_FIELDS
                .iter()
                .copied()
                .find(|field| name == index_name(E::COLLECTION, field))
        })
        .unwrap_or("id")
}

fn index_name(table: &str, field: &str) -> String {
    format!("{}_{}_key", table, field)
}

fn schema_statements<E: Document>() -> Vec<String> {
    let table = E::COLLECTION;
    let mut statements = vec![format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id UUID PRIMARY KEY,
            data JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        table
    )];

    statements.extend(E::UNIQUE_FIELDS.iter().map(|field| {
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ((data->>'{}'))",
            index_name(table, field),
            table,
            field
        )
    }));

    statements
}

fn decode<E: Document>(row: &sqlx::postgres::PgRow) -> Result<E, DomainError> {
    let data: serde_json::Value = row
        .try_get("data")
        .map_err(|e| DomainError::storage(format!("Failed to read {}: {}", E::COLLECTION, e)))?;

    serde_json::from_value(data).map_err(|e| {
        DomainError::storage(format!("Failed to deserialize {}: {}", E::COLLECTION, e))
    })
}

/// A single collection stored as a PostgreSQL table
pub struct PostgresCollection<E>
where
    E: Document,
{
    pool: PgPool,
    _phantom: PhantomData<E>,
}

impl<E> Debug for PostgresCollection<E>
where
    E: Document,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresCollection")
            .field("table", &E::COLLECTION)
            .finish()
    }
}

impl<E> PostgresCollection<E>
where
    E: Document,
{
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    /// Ensures the table and its unique indexes exist
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        for statement in schema_statements::<E>() {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!(
                        "Failed to create {} schema: {}",
                        E::COLLECTION,
                        e
                    ))
                })?;
        }

        debug!(table = E::COLLECTION, "Schema ready");
        Ok(())
    }

    /// Documents whose JSON `field` equals `value`, oldest first
    async fn find_where(&self, field: &str, value: &str) -> Result<Vec<E>, DomainError> {
        let query = format!(
            "SELECT data FROM {} WHERE data->>'{}' = $1 ORDER BY created_at",
            E::COLLECTION,
            field
        );

        let rows = sqlx::query(&query)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to query {}: {}", E::COLLECTION, e))
            })?;

        rows.iter().map(decode::<E>).collect()
    }

    fn encode(entity: &E) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(entity).map_err(|e| {
            DomainError::storage(format!("Failed to serialize {}: {}", E::COLLECTION, e))
        })
    }
}

#[async_trait]
impl<E> Repository<E> for PostgresCollection<E>
where
    E: Document + 'static,
{
    async fn insert(&self, mut entity: E) -> Result<E, DomainError> {
        entity.prepare()?;
        let now = Utc::now();
        entity.stamp(now, true);

        let query = format!(
            "INSERT INTO {} (id, data, created_at, updated_at) VALUES ($1, $2, $3, $3)",
            E::COLLECTION
        );

        sqlx::query(&query)
            .bind(entity.id().as_uuid())
            .bind(Self::encode(&entity)?)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error::<E>(e, "insert"))?;

        Ok(entity)
    }

    async fn save(&self, mut entity: E) -> Result<E, DomainError> {
        entity.prepare()?;
        let now = Utc::now();
        entity.stamp(now, false);

        let query = format!(
            r#"
            INSERT INTO {} (id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
            "#,
            E::COLLECTION
        );

        sqlx::query(&query)
            .bind(entity.id().as_uuid())
            .bind(Self::encode(&entity)?)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error::<E>(e, "save"))?;

        Ok(entity)
    }

    async fn get(&self, id: &E::Id) -> Result<Option<E>, DomainError> {
        let query = format!("SELECT data FROM {} WHERE id = $1", E::COLLECTION);

        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get {}: {}", E::COLLECTION, e)))?;

        row.as_ref().map(decode::<E>).transpose()
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let query = format!("SELECT data FROM {} ORDER BY created_at", E::COLLECTION);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to list {}: {}", E::COLLECTION, e))
            })?;

        rows.iter().map(decode::<E>).collect()
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let query = format!("DELETE FROM {}", E::COLLECTION);

        let result = sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to clear {}: {}", E::COLLECTION, e))
            })?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let query = format!("SELECT COUNT(*) AS count FROM {}", E::COLLECTION);

        let row = sqlx::query(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to count {}: {}", E::COLLECTION, e))
            })?;

        let count: i64 = row.get("count");
        Ok(count as u64)
    }
}

#[async_trait]
impl UserRepository for PostgresCollection<User> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .find_where("username", &username.to_lowercase())
            .await?
            .into_iter()
            .next())
    }

    async fn count_with_favorite(&self, item: &ItemId) -> Result<u64, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM users WHERE jsonb_exists(data->'favorites', $1)",
        )
        .bind(item.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to count favorites: {}", e)))?;

        let count: i64 = row.get("count");
        Ok(count as u64)
    }
}

#[async_trait]
impl ItemRepository for PostgresCollection<Item> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Item>, DomainError> {
        Ok(self
            .find_where("slug", &slug.to_lowercase())
            .await?
            .into_iter()
            .next())
    }
}

#[async_trait]
impl CommentRepository for PostgresCollection<Comment> {
    async fn list_for_item(&self, item: &ItemId) -> Result<Vec<Comment>, DomainError> {
        self.find_where("item", &item.to_string()).await
    }
}

/// Connection handle owning the pool shared by the collections
#[derive(Debug)]
pub struct PostgresConnection {
    pool: PgPool,
    address: String,
    connected: AtomicBool,
}

impl PostgresConnection {
    pub fn new(pool: PgPool, url: &str) -> Self {
        Self {
            pool,
            address: redact_address(url),
            connected: AtomicBool::new(true),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Connection for PostgresConnection {
    fn address(&self) -> &str {
        &self.address
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.pool.close().await;
            info!(address = %self.address, "Disconnected from PostgreSQL");
        }
    }
}
