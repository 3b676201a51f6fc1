//! User entity and related types

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::credentials::{Credentials, PasswordHasher};
use super::validation::{validate_email, validate_username};
use crate::domain::document::{Document, ItemId, UniqueKey, UserId};
use crate::domain::DomainError;

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// User document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default)]
    role: Role,
    #[serde(default)]
    favorites: HashSet<ItemId>,
    #[serde(default)]
    following: HashSet<UserId>,
    #[serde(flatten)]
    credentials: Option<Credentials>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with no profile, favorites, follows or password
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::generate(),
            username: username.into(),
            email: email.into(),
            bio: None,
            image: None,
            role: Role::default(),
            favorites: HashSet::new(),
            following: HashSet::new(),
            credentials: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    // Getters

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn favorites(&self) -> &HashSet<ItemId> {
        &self.favorites
    }

    pub fn following(&self) -> &HashSet<UserId> {
        &self.following
    }

    pub fn salt(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::salt)
    }

    pub fn hash(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::hash)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Credentials

    /// Replace the password material with a fresh salt and hash
    pub fn set_password(
        &mut self,
        hasher: &dyn PasswordHasher,
        password: &str,
    ) -> Result<(), DomainError> {
        self.credentials = Some(Credentials::generate(hasher, password)?);
        Ok(())
    }

    /// Check a candidate password against the stored salt and hash
    pub fn valid_password(&self, hasher: &dyn PasswordHasher, password: &str) -> bool {
        self.credentials
            .as_ref()
            .is_some_and(|c| c.matches(hasher, password))
    }

    // Relationships

    /// Add an item to favorites. Returns false if it was already there.
    pub fn favorite(&mut self, item: ItemId) -> bool {
        self.favorites.insert(item)
    }

    /// Remove an item from favorites. Returns false if it was not there.
    pub fn unfavorite(&mut self, item: &ItemId) -> bool {
        self.favorites.remove(item)
    }

    pub fn is_favorite(&self, item: &ItemId) -> bool {
        self.favorites.contains(item)
    }

    /// Follow another user. Returns false if already following.
    pub fn follow(&mut self, user: UserId) -> bool {
        self.following.insert(user)
    }

    /// Stop following a user. Returns false if not following.
    pub fn unfollow(&mut self, user: &UserId) -> bool {
        self.following.remove(user)
    }

    pub fn is_following(&self, user: &UserId) -> bool {
        self.following.contains(user)
    }
}

impl Document for User {
    type Id = UserId;

    const COLLECTION: &'static str = "users";
    const UNIQUE_FIELDS: &'static [&'static str] = &["username", "email"];

    fn id(&self) -> &UserId {
        &self.id
    }

    fn prepare(&mut self) -> Result<(), DomainError> {
        self.username = self.username.trim().to_lowercase();
        self.email = self.email.trim().to_lowercase();

        validate_username(&self.username)?;
        validate_email(&self.email)?;

        Ok(())
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::new("username", self.username.to_lowercase()),
            UniqueKey::new("email", self.email.to_lowercase()),
        ]
    }

    fn stamp(&mut self, now: DateTime<Utc>, created: bool) {
        if created {
            self.created_at = now;
        }
        self.updated_at = now;
    }
}
