//! Comment repository trait

use async_trait::async_trait;

use super::entity::Comment;
use crate::domain::document::{ItemId, Repository};
use crate::domain::DomainError;

/// Repository trait for comment storage
#[async_trait]
pub trait CommentRepository: Repository<Comment> {
    /// List the comments left on `item`, oldest first
    async fn list_for_item(&self, item: &ItemId) -> Result<Vec<Comment>, DomainError>;
}
