//! Comment entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::{CommentId, Document, ItemId, UserId};
use crate::domain::DomainError;

/// Comment left by a user on an item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    id: CommentId,
    #[serde(default)]
    body: String,
    seller: UserId,
    item: ItemId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(body: impl Into<String>, seller: UserId, item: ItemId) -> Self {
        let now = Utc::now();

        Self {
            id: CommentId::generate(),
            body: body.into(),
            seller,
            item,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn seller(&self) -> &UserId {
        &self.seller
    }

    pub fn item(&self) -> &ItemId {
        &self.item
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Document for Comment {
    type Id = CommentId;

    const COLLECTION: &'static str = "comments";

    fn id(&self) -> &CommentId {
        &self.id
    }

    fn prepare(&mut self) -> Result<(), DomainError> {
        Ok(())
    }

    fn stamp(&mut self, now: DateTime<Utc>, created: bool) {
        if created {
            self.created_at = now;
        }
        self.updated_at = now;
    }
}
