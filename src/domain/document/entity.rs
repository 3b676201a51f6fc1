//! Document trait shared by every stored entity

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use super::id::DocumentKey;
use crate::domain::DomainError;

/// A field whose value must be unique within a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub field: &'static str,
    pub value: String,
}

impl UniqueKey {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Trait for types that can be stored in a document collection
pub trait Document: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// The identifier type for this document
    type Id: DocumentKey;

    /// Name of the collection holding this document type
    const COLLECTION: &'static str;

    /// Fields covered by `unique_keys`, used to declare store indexes
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    /// Returns the document's identifier
    fn id(&self) -> &Self::Id;

    /// Normalises fields, runs derived-value hooks and checks field-level
    /// constraints. Stores call this before every write.
    fn prepare(&mut self) -> Result<(), DomainError>;

    /// Values that must be unique across the collection
    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }

    /// Records a write at `now`. `created` is true on the first write.
    fn stamp(&mut self, now: DateTime<Utc>, created: bool);
}
