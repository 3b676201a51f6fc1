//! Social service - Favorites, follows and the derived favorites count

use std::sync::Arc;

use tracing::debug;

use crate::domain::{
    Document, DomainError, Item, ItemId, ItemRepository, User, UserId, UserRepository,
};

/// Applies relationship changes and persists the affected documents
#[derive(Debug, Clone)]
pub struct SocialService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
}

impl SocialService {
    pub fn new(users: Arc<dyn UserRepository>, items: Arc<dyn ItemRepository>) -> Self {
        Self { users, items }
    }

    /// Add `item` to the user's favorites and persist the user
    pub async fn favorite(&self, mut user: User, item: ItemId) -> Result<User, DomainError> {
        if user.favorite(item) {
            debug!(user = %user.id(), item = %item, "Favorited item");
        }
        self.users.save(user).await
    }

    /// Remove `item` from the user's favorites and persist the user
    pub async fn unfavorite(&self, mut user: User, item: &ItemId) -> Result<User, DomainError> {
        user.unfavorite(item);
        self.users.save(user).await
    }

    /// Follow `target` and persist the follower
    pub async fn follow(&self, mut user: User, target: UserId) -> Result<User, DomainError> {
        if user.follow(target) {
            debug!(user = %user.id(), target = %target, "Followed user");
        }
        self.users.save(user).await
    }

    /// Stop following `target` and persist the follower
    pub async fn unfollow(&self, mut user: User, target: &UserId) -> Result<User, DomainError> {
        user.unfollow(target);
        self.users.save(user).await
    }

    /// Recount the users favoriting `item`, store the count and persist the item
    pub async fn update_favorite_count(&self, mut item: Item) -> Result<Item, DomainError> {
        let count = self.users.count_with_favorite(item.id()).await?;
        item.set_favorites_count(count);
        self.items.save(item).await
    }
}
