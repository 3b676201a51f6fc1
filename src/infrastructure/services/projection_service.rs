//! Projection service - Resolves references before building views

use std::sync::Arc;

use crate::domain::{
    AuthView, Comment, CommentView, DomainError, Item, ItemView, ProfileView,
    TokenIssuer, User, UserId, UserRepository,
};

/// Builds viewer-relative views, loading referenced sellers from the store
#[derive(Debug, Clone)]
pub struct ProjectionService {
    users: Arc<dyn UserRepository>,
    issuer: Arc<dyn TokenIssuer>,
}

impl ProjectionService {
    pub fn new(users: Arc<dyn UserRepository>, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { users, issuer }
    }

    pub fn auth_view(&self, user: &User) -> Result<AuthView, DomainError> {
        user.to_auth_view(self.issuer.as_ref())
    }

    pub fn profile_view(&self, user: &User, viewer: Option<&User>) -> ProfileView {
        user.to_profile_for(viewer)
    }

    pub async fn item_view(&self, item: &Item, viewer: Option<&User>) -> Result<ItemView, DomainError> {
        let seller = self.resolve_seller(item.seller()).await?;
        item.to_view_for(&seller, viewer)
    }

    pub async fn comment_view(
        &self,
        comment: &Comment,
        viewer: Option<&User>,
    ) -> Result<CommentView, DomainError> {
        let seller = self.resolve_seller(comment.seller()).await?;
        comment.to_view_for(&seller, viewer)
    }

    async fn resolve_seller(&self, id: &UserId) -> Result<User, DomainError> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::unresolved("seller", id))
    }
}
