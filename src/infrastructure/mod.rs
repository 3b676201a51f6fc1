//! Infrastructure layer - Store adapters, credentials and the seeding pipeline

pub mod auth;
pub mod logging;
pub mod seed;
pub mod services;
pub mod store;
pub mod user;
