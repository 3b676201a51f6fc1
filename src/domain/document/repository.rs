//! Generic repository trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::Document;

/// Collection-level operations available for every document type
#[async_trait]
pub trait Repository<E>: Send + Sync + Debug
where
    E: Document + 'static,
{
    /// Inserts a new document. Runs [`Document::prepare`], enforces unique
    /// keys and stamps both timestamps. Returns the persisted document.
    async fn insert(&self, entity: E) -> Result<E, DomainError>;

    /// Writes a document back, inserting it when it does not exist yet
    async fn save(&self, entity: E) -> Result<E, DomainError>;

    /// Retrieves a document by its identifier
    async fn get(&self, id: &E::Id) -> Result<Option<E>, DomainError>;

    /// Retrieves all documents in insertion order
    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Deletes every document, returning how many were removed
    async fn delete_all(&self) -> Result<u64, DomainError>;

    /// Returns the number of stored documents
    async fn count(&self) -> Result<u64, DomainError>;
}
