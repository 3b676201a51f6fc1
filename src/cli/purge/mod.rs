//! Purge command - delete every seeded document

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use super::seed::log_report;
use super::{bootstrap, StoreArgs};
use crate::infrastructure::seed::Seeder;
use crate::infrastructure::store::StoreFactory;
use crate::infrastructure::user::Pbkdf2Hasher;

/// Run the purge command
pub async fn run(args: StoreArgs) -> anyhow::Result<()> {
    let config = bootstrap(|config| args.apply(config))?;

    info!(backend = %config.store.backend, "Starting purge");

    let context = StoreFactory::connect(&config.store)
        .await
        .context("Failed to connect to store")?;

    let seeder = Seeder::new(config.seed.clone(), Arc::new(Pbkdf2Hasher::default()))
        .with_operation_timeout(Duration::from_secs(config.store.operation_timeout_secs));

    let report = seeder.run_purge(&context).await;
    log_report(&report);

    Ok(())
}
