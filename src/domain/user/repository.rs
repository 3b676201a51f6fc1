//! User repository trait

use async_trait::async_trait;

use super::entity::User;
use crate::domain::document::{ItemId, Repository};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Get a user by username (case-insensitive)
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Count users whose favorites contain `item`
    async fn count_with_favorite(&self, item: &ItemId) -> Result<u64, DomainError>;
}
