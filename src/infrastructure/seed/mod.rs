//! Seed infrastructure - Synthetic data generation and the seeding pipeline

mod generator;
mod seeder;

pub use generator::{synthetic_comment, synthetic_item, synthetic_user, SEED_IMAGE, SEED_TAGS};
pub use seeder::{
    PurgeCounts, PurgePolicy, RunState, SeedConfig, SeedError, SeedPhase, SeedReport, Seeder,
    DEFAULT_COUNT, DEFAULT_PASSWORD,
};
