//! CLI module for the marketplace seeder
//!
//! Provides subcommands:
//! - `seed`: purge the store and repopulate it with synthetic data
//! - `purge`: delete every user, item and comment

pub mod purge;
pub mod seed;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::store::StoreBackend;

/// Marketplace seeder - Populate a document store with development data
#[derive(Parser)]
#[command(name = "marketplace-seed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Purge the store, then seed users, items and comments
    Seed(seed::SeedArgs),

    /// Delete all users, items and comments
    Purge(StoreArgs),
}

/// Store selection shared by every subcommand
#[derive(Args, Debug, Default, Clone)]
pub struct StoreArgs {
    /// Store backend (memory or postgres)
    #[arg(long)]
    pub store: Option<StoreBackend>,

    /// Connection URL, implies the postgres backend when --store is absent
    #[arg(long)]
    pub database_url: Option<String>,
}

impl StoreArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.database_url {
            config.store.url = url.clone();
            config.store.backend = StoreBackend::Postgres;
        }

        if let Some(backend) = self.store {
            config.store.backend = backend;
        }
    }
}

/// Load `.env`, configuration and logging before a command runs
fn bootstrap(apply: impl FnOnce(&mut AppConfig)) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    apply(&mut config);

    logging::init_logging(&config.logging).context("Failed to initialise logging")?;
    Ok(config)
}
