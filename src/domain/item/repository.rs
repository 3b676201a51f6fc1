//! Item repository trait

use async_trait::async_trait;

use super::entity::Item;
use crate::domain::document::Repository;
use crate::domain::DomainError;

/// Repository trait for item storage
#[async_trait]
pub trait ItemRepository: Repository<Item> {
    /// Get an item by its slug
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Item>, DomainError>;
}
