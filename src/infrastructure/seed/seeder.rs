//! Seeding orchestrator
//!
//! Runs purge then seed over an already-open [`StoreContext`] and always
//! releases the connection afterwards. Records are written one at a time;
//! the first failure stops the batch and nothing already written is rolled
//! back.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::generator::{synthetic_comment, synthetic_item, synthetic_user};
use crate::domain::{
    CommentId, Document, DomainError, ItemId, PasswordHasher, StoreContext, UserId,
};

/// Default number of records per collection
pub const DEFAULT_COUNT: usize = 100;

/// Default password shared by every synthetic user
pub const DEFAULT_PASSWORD: &str = "password";

/// What to do when purging fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurgePolicy {
    /// Log the failure and skip seeding
    #[default]
    Strict,
    /// Log the failure and seed anyway
    Lenient,
}

/// Seeding configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub count: usize,
    pub password: String,
    pub purge_policy: PurgePolicy,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            password: DEFAULT_PASSWORD.to_string(),
            purge_policy: PurgePolicy::default(),
        }
    }
}

/// Step of the pipeline an error occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPhase {
    Purge,
    Users,
    Items,
    Comments,
}

impl std::fmt::Display for SeedPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Purge => write!(f, "purge"),
            Self::Users => write!(f, "users"),
            Self::Items => write!(f, "items"),
            Self::Comments => write!(f, "comments"),
        }
    }
}

/// Furthest state a run reached before disconnecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Connected,
    Purged,
    Seeded,
}

/// A failed pipeline step
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{phase} failed: {source}")]
pub struct SeedError {
    pub phase: SeedPhase,
    pub source: DomainError,
}

impl SeedError {
    pub fn new(phase: SeedPhase, source: DomainError) -> Self {
        Self { phase, source }
    }
}

/// Documents removed by a purge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeCounts {
    pub users: u64,
    pub items: u64,
    pub comments: u64,
}

/// Outcome of a run
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub state: RunState,
    pub purged: Option<PurgeCounts>,
    pub users: Vec<UserId>,
    pub items: Vec<ItemId>,
    pub comments: Vec<CommentId>,
    pub errors: Vec<SeedError>,
    pub disconnected: bool,
}

impl SeedReport {
    fn new() -> Self {
        Self {
            state: RunState::Connected,
            purged: None,
            users: Vec::new(),
            items: Vec::new(),
            comments: Vec::new(),
            errors: Vec::new(),
            disconnected: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Drives the purge and seed phases against a store
#[derive(Debug, Clone)]
pub struct Seeder {
    config: SeedConfig,
    hasher: Arc<dyn PasswordHasher>,
    operation_timeout: Duration,
}

impl Seeder {
    pub fn new(config: SeedConfig, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            config,
            hasher,
            operation_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Purge, seed, then disconnect
    #[instrument(skip_all, fields(address = %context.connection().address(), count = self.config.count))]
    pub async fn run(&self, context: &StoreContext) -> SeedReport {
        let mut report = SeedReport::new();

        let seed = match self.purge(context).await {
            Ok(counts) => {
                report.purged = Some(counts);
                report.state = RunState::Purged;
                true
            }
            Err(e) => {
                error!(phase = %e.phase, error = %e.source, "Failed to clean database");
                report.errors.push(e);

                match self.config.purge_policy {
                    PurgePolicy::Strict => {
                        warn!("Skipping seeding after failed purge");
                        false
                    }
                    PurgePolicy::Lenient => {
                        warn!("Seeding despite failed purge");
                        true
                    }
                }
            }
        };

        if seed {
            self.seed_into(context, &mut report).await;
        }

        self.disconnect(context, &mut report).await;
        report
    }

    /// Purge only, then disconnect
    #[instrument(skip_all, fields(address = %context.connection().address()))]
    pub async fn run_purge(&self, context: &StoreContext) -> SeedReport {
        let mut report = SeedReport::new();

        match self.purge(context).await {
            Ok(counts) => {
                report.purged = Some(counts);
                report.state = RunState::Purged;
            }
            Err(e) => {
                error!(phase = %e.phase, error = %e.source, "Failed to clean database");
                report.errors.push(e);
            }
        }

        self.disconnect(context, &mut report).await;
        report
    }

    /// Delete every user, item and comment
    #[instrument(skip_all)]
    pub async fn purge(&self, context: &StoreContext) -> Result<PurgeCounts, SeedError> {
        let fail = |e| SeedError::new(SeedPhase::Purge, e);

        let users = self
            .bounded("delete users", context.users().delete_all())
            .await
            .map_err(fail)?;
        let items = self
            .bounded("delete items", context.items().delete_all())
            .await
            .map_err(fail)?;
        let comments = self
            .bounded("delete comments", context.comments().delete_all())
            .await
            .map_err(fail)?;

        info!(users, items, comments, "Database cleaned");

        Ok(PurgeCounts {
            users,
            items,
            comments,
        })
    }

    /// Seed without purging or disconnecting
    pub async fn seed(&self, context: &StoreContext) -> SeedReport {
        let mut report = SeedReport::new();
        self.seed_into(context, &mut report).await;
        report
    }

    async fn seed_into(&self, context: &StoreContext, report: &mut SeedReport) {
        match self.write_all(context, report).await {
            Ok(()) => {
                report.state = RunState::Seeded;
                info!(
                    users = report.users.len(),
                    items = report.items.len(),
                    comments = report.comments.len(),
                    "Database seeded"
                );
            }
            Err(e) => {
                error!(
                    phase = %e.phase,
                    error = %e.source,
                    users = report.users.len(),
                    items = report.items.len(),
                    comments = report.comments.len(),
                    "Failed to seed database"
                );
                report.errors.push(e);
            }
        }
    }

    #[instrument(skip_all, fields(count = self.config.count))]
    async fn write_all(&self, context: &StoreContext, report: &mut SeedReport) -> Result<(), SeedError> {
        let count = self.config.count;

        for i in 0..count {
            let fail = |e| SeedError::new(SeedPhase::Users, e);

            let mut user = synthetic_user(i);
            user.set_password(self.hasher.as_ref(), &self.config.password)
                .map_err(fail)?;

            let user = self
                .bounded("insert user", context.users().insert(user))
                .await
                .map_err(fail)?;
            report.users.push(*user.id());
        }
        info!(count = report.users.len(), "Users seeded");

        for i in 0..count {
            let seller = report.users[i % report.users.len()];
            let item = self
                .bounded("insert item", context.items().insert(synthetic_item(i, seller)))
                .await
                .map_err(|e| SeedError::new(SeedPhase::Items, e))?;
            report.items.push(*item.id());
        }
        info!(count = report.items.len(), "Items seeded");

        for i in 0..count {
            let seller = report.users[i % report.users.len()];
            let item = report.items[i % report.items.len()];
            let comment = self
                .bounded(
                    "insert comment",
                    context.comments().insert(synthetic_comment(i, seller, item)),
                )
                .await
                .map_err(|e| SeedError::new(SeedPhase::Comments, e))?;
            report.comments.push(*comment.id());
        }
        info!(count = report.comments.len(), "Comments seeded");

        Ok(())
    }

    async fn disconnect(&self, context: &StoreContext, report: &mut SeedReport) {
        context.disconnect().await;
        report.disconnected = true;
        info!(address = %context.connection().address(), "Disconnected");
    }

    /// Run a store call under the operation timeout
    async fn bounded<T, F>(&self, operation: &str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.operation_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::storage(format!(
                "{} timed out after {}s",
                operation,
                self.operation_timeout.as_secs_f64()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::mock::MockCollection;
    use crate::domain::store::mock::context as mock_context;
    use crate::domain::user::PlainHasher;
    use crate::domain::{Comment, Item, User};
    use crate::infrastructure::store::InMemoryStore;

    fn seeder(count: usize) -> Seeder {
        let config = SeedConfig {
            count,
            ..Default::default()
        };
        Seeder::new(config, Arc::new(PlainHasher::default()))
    }

    #[test]
    fn test_seed_config_defaults() {
        let config = SeedConfig::default();
        assert_eq!(config.count, 100);
        assert_eq!(config.password, "password");
        assert_eq!(config.purge_policy, PurgePolicy::Strict);
    }

    #[test]
    fn test_seed_error_display() {
        let err = SeedError::new(SeedPhase::Users, DomainError::conflict("username"));
        assert!(err.to_string().starts_with("users failed:"));
    }

    #[tokio::test]
    async fn test_run_seeds_empty_store() {
        let store = InMemoryStore::new();
        let context = store.connect();

        let report = seeder(DEFAULT_COUNT).run(&context).await;

        assert!(report.is_success());
        assert_eq!(report.state, RunState::Seeded);
        assert_eq!(report.purged, Some(PurgeCounts::default()));
        assert!(report.disconnected);
        assert!(!context.connection().is_connected());

        let check = store.connect();
        assert_eq!(check.users().count().await.unwrap(), 100);
        assert_eq!(check.items().count().await.unwrap(), 100);
        assert_eq!(check.comments().count().await.unwrap(), 100);

        let users = check.users().list().await.unwrap();
        let items = check.items().list().await.unwrap();
        let comments = check.comments().list().await.unwrap();

        for i in 0..100 {
            assert_eq!(users[i].username(), format!("user{}", i));
            assert_eq!(items[i].seller(), users[i % 100].id());
            assert_eq!(comments[i].seller(), users[i % 100].id());
            assert_eq!(comments[i].item(), items[i % 100].id());
            assert!(items[i].slug().unwrap().starts_with(&format!("product-{}-", i)));
        }

        assert_eq!(report.users.len(), 100);
        assert_eq!(&report.users[0], users[0].id());
    }

    #[tokio::test]
    async fn test_seeded_users_share_password() {
        let store = InMemoryStore::new();
        let hasher = Arc::new(PlainHasher::default());
        let seeder = Seeder::new(
            SeedConfig {
                count: 3,
                ..Default::default()
            },
            hasher.clone(),
        );

        seeder.run(&store.connect()).await;

        let users = store.connect().users().list().await.unwrap();
        for user in &users {
            assert!(user.valid_password(hasher.as_ref(), "password"));
            assert!(!user.valid_password(hasher.as_ref(), "wrong"));
        }
        assert_ne!(users[0].salt(), users[1].salt());
    }

    #[tokio::test]
    async fn test_run_twice_replaces_data() {
        let store = InMemoryStore::new();

        seeder(5).run(&store.connect()).await;
        let report = seeder(5).run(&store.connect()).await;

        assert!(report.is_success());
        assert_eq!(
            report.purged,
            Some(PurgeCounts {
                users: 5,
                items: 5,
                comments: 5
            })
        );
        assert_eq!(store.connect().users().count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_seed_twice_without_purge_conflicts_on_first_username() {
        let store = InMemoryStore::new();
        let seeder = seeder(5);

        assert!(seeder.seed(&store.connect()).await.is_success());
        let report = seeder.seed(&store.connect()).await;

        assert_eq!(
            report.errors,
            vec![SeedError::new(SeedPhase::Users, DomainError::conflict("username"))]
        );
        assert!(report.users.is_empty());

        let context = store.connect();
        assert!(context.users().find_by_username("user0").await.unwrap().is_some());
        assert_eq!(context.users().count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_writes() {
        let store = InMemoryStore::new();
        let context = store.connect();
        context
            .users()
            .insert(User::new("user5", "someone@example.com"))
            .await
            .unwrap();

        let report = seeder(10).seed(&context).await;

        assert_eq!(report.users.len(), 5);
        assert_eq!(report.errors[0].phase, SeedPhase::Users);
        assert_eq!(report.errors[0].source, DomainError::conflict("username"));
        assert_eq!(report.state, RunState::Connected);
        assert_eq!(context.users().count().await.unwrap(), 6);
        assert_eq!(context.items().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_strict_purge_failure_skips_seeding() {
        let (context, connection) = mock_context(
            MockCollection::<User>::new().with_delete_error("locked"),
            MockCollection::<Item>::new(),
            MockCollection::<Comment>::new(),
        );

        let report = seeder(3).run(&context).await;

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].phase, SeedPhase::Purge);
        assert_eq!(report.state, RunState::Connected);
        assert!(report.users.is_empty());
        assert_eq!(context.users().count().await.unwrap(), 0);
        assert_eq!(connection.disconnect_calls(), 1);
    }

    #[tokio::test]
    async fn test_lenient_purge_failure_still_seeds() {
        let (context, connection) = mock_context(
            MockCollection::<User>::new().with_delete_error("locked"),
            MockCollection::<Item>::new(),
            MockCollection::<Comment>::new(),
        );
        let seeder = Seeder::new(
            SeedConfig {
                count: 3,
                purge_policy: PurgePolicy::Lenient,
                ..Default::default()
            },
            Arc::new(PlainHasher::default()),
        );

        let report = seeder.run(&context).await;

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.state, RunState::Seeded);
        assert_eq!(report.users.len(), 3);
        assert_eq!(report.comments.len(), 3);
        assert_eq!(connection.disconnect_calls(), 1);
    }

    #[derive(Debug)]
    struct FailingHasher;

    impl PasswordHasher for FailingHasher {
        fn generate_salt(&self) -> String {
            "salt".to_string()
        }

        fn derive(&self, _password: &str, _salt: &str) -> Result<String, DomainError> {
            Err(DomainError::credential("derivation unavailable"))
        }
    }

    #[tokio::test]
    async fn test_disconnects_after_seed_failure() {
        let (context, connection) = mock_context(
            MockCollection::<User>::new(),
            MockCollection::<Item>::new(),
            MockCollection::<Comment>::new(),
        );
        let seeder = Seeder::new(SeedConfig::default(), Arc::new(FailingHasher));

        let report = seeder.run(&context).await;

        assert_eq!(report.state, RunState::Purged);
        assert!(report.users.is_empty());
        assert_eq!(report.errors[0].phase, SeedPhase::Users);
        assert!(matches!(report.errors[0].source, DomainError::Credential { .. }));
        assert!(report.disconnected);
        assert_eq!(connection.disconnect_calls(), 1);
    }

    #[tokio::test]
    async fn test_run_purge_only() {
        let store = InMemoryStore::new();
        seeder(4).run(&store.connect()).await;

        let context = store.connect();
        let report = seeder(4).run_purge(&context).await;

        assert!(report.is_success());
        assert_eq!(report.purged.unwrap().comments, 4);
        assert!(report.users.is_empty());
        assert!(!context.connection().is_connected());
        assert_eq!(store.connect().users().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_zero_count_seeds_nothing() {
        let store = InMemoryStore::new();
        let report = seeder(0).run(&store.connect()).await;

        assert!(report.is_success());
        assert_eq!(report.state, RunState::Seeded);
        assert_eq!(store.connect().items().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_slow_store_call_times_out() {
        let seeder = seeder(1).with_operation_timeout(Duration::from_millis(10));

        let err = seeder
            .bounded("insert user", std::future::pending::<Result<(), DomainError>>())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(err.to_string().contains("insert user timed out"));
    }
}
