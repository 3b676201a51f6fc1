//! Marketplace seeder
//!
//! Domain model for a marketplace of users, items and comments, plus a
//! one-shot pipeline that wipes a document store and fills it with
//! synthetic data for local development:
//! - Users with salted PBKDF2 credentials and favorite/follow relationships
//! - Items with generated slugs and a derived favorites count
//! - Viewer-relative projections of all three documents
//! - In-memory and PostgreSQL document stores

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
