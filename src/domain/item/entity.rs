//! Item entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slug::generate_slug;
use crate::domain::document::{CommentId, Document, ItemId, UniqueKey, UserId};
use crate::domain::DomainError;

/// Item document listed by a seller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    title: String,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default)]
    favorites_count: u64,
    #[serde(default)]
    tag_list: Vec<String>,
    #[serde(default)]
    comments: Vec<CommentId>,
    seller: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a new item. The slug is derived on the first write.
    pub fn new(title: impl Into<String>, description: impl Into<String>, seller: UserId) -> Self {
        let now = Utc::now();

        Self {
            id: ItemId::generate(),
            slug: None,
            title: title.into(),
            description: description.into(),
            image: None,
            favorites_count: 0,
            tag_list: Vec::new(),
            comments: Vec::new(),
            seller,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_list = tags.into_iter().map(Into::into).collect();
        self
    }

    // Getters

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn favorites_count(&self) -> u64 {
        self.favorites_count
    }

    pub fn tag_list(&self) -> &[String] {
        &self.tag_list
    }

    pub fn comments(&self) -> &[CommentId] {
        &self.comments
    }

    pub fn seller(&self) -> &UserId {
        &self.seller
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Store a recomputed favorites count
    pub fn set_favorites_count(&mut self, count: u64) {
        self.favorites_count = count;
    }

    /// Append a comment reference, keeping order
    pub fn add_comment(&mut self, comment: CommentId) {
        if !self.comments.contains(&comment) {
            self.comments.push(comment);
        }
    }

    /// Derive the slug from the title when none is set yet
    pub fn ensure_slug(&mut self) {
        if self.slug.as_deref().is_none_or(str::is_empty) {
            self.slug = Some(generate_slug(&self.title));
        }
    }
}

impl Document for Item {
    type Id = ItemId;

    const COLLECTION: &'static str = "items";
    const UNIQUE_FIELDS: &'static [&'static str] = &["slug"];

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn prepare(&mut self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::blank("title"));
        }

        if self.description.trim().is_empty() {
            return Err(DomainError::blank("description"));
        }

        self.ensure_slug();
        self.slug = self.slug.take().map(|slug| slug.to_lowercase());

        Ok(())
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        self.slug
            .iter()
            .map(|slug| UniqueKey::new("slug", slug.to_lowercase()))
            .collect()
    }

    fn stamp(&mut self, now: DateTime<Utc>, created: bool) {
        if created {
            self.created_at = now;
        }
        self.updated_at = now;
    }
}
