//! Seed command - purge then repopulate the store

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use super::{bootstrap, StoreArgs};
use crate::config::AppConfig;
use crate::infrastructure::seed::{PurgePolicy, SeedReport, Seeder};
use crate::infrastructure::store::StoreFactory;
use crate::infrastructure::user::Pbkdf2Hasher;

#[derive(Args, Debug, Default, Clone)]
pub struct SeedArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Number of users, items and comments to create
    #[arg(long)]
    pub count: Option<usize>,

    /// Seed even when purging the existing data fails
    #[arg(long)]
    pub lenient_purge: bool,
}

impl SeedArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        self.store.apply(config);

        if let Some(count) = self.count {
            config.seed.count = count;
        }

        if self.lenient_purge {
            config.seed.purge_policy = PurgePolicy::Lenient;
        }
    }
}

/// Run the seed command
///
/// Configuration and connection failures are returned; purge and seed
/// failures are logged and the command still completes.
pub async fn run(args: SeedArgs) -> anyhow::Result<()> {
    let config = bootstrap(|config| args.apply(config))?;

    info!(
        backend = %config.store.backend,
        count = config.seed.count,
        purge_policy = ?config.seed.purge_policy,
        "Starting seed run"
    );

    let context = StoreFactory::connect(&config.store)
        .await
        .context("Failed to connect to store")?;

    let seeder = Seeder::new(config.seed.clone(), Arc::new(Pbkdf2Hasher::default()))
        .with_operation_timeout(Duration::from_secs(config.store.operation_timeout_secs));

    let report = seeder.run(&context).await;
    log_report(&report);

    Ok(())
}

pub(super) fn log_report(report: &SeedReport) {
    let purged = report.purged.unwrap_or_default();

    if report.is_success() {
        info!(
            state = ?report.state,
            purged_users = purged.users,
            purged_items = purged.items,
            purged_comments = purged.comments,
            users = report.users.len(),
            items = report.items.len(),
            comments = report.comments.len(),
            "Run complete"
        );
    } else {
        warn!(
            state = ?report.state,
            errors = report.errors.len(),
            users = report.users.len(),
            items = report.items.len(),
            comments = report.comments.len(),
            "Run finished with errors"
        );
    }
}
