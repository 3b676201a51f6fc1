//! Viewer-relative public representations of documents
//!
//! Each view is computed from a document plus an optional viewing user.
//! Anonymous viewers never follow or favorite anything. Item and comment
//! views embed the seller's profile, so the seller must be loaded and must
//! match the document's `seller` reference.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::auth::TokenIssuer;
use crate::domain::comment::Comment;
use crate::domain::document::{CommentId, Document};
use crate::domain::item::Item;
use crate::domain::user::{Role, User};
use crate::domain::DomainError;

/// Avatar shown for users without an image
pub const DEFAULT_AVATAR: &str = "https://static.productionready.io/images/smiley-cyrus.jpg";

/// Representation returned to the user who just authenticated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthView {
    pub username: String,
    pub email: String,
    pub token: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub role: Role,
}

/// Public profile of a user as seen by a viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub username: String,
    pub bio: Option<String>,
    pub image: String,
    pub following: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub slug: Option<String>,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tag_list: Vec<String>,
    pub favorited: bool,
    pub favorites_count: u64,
    pub seller: ProfileView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: CommentId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub seller: ProfileView,
}

impl User {
    /// Representation for the authenticated user, including a fresh token
    pub fn to_auth_view(&self, issuer: &dyn TokenIssuer) -> Result<AuthView, DomainError> {
        Ok(AuthView {
            username: self.username().to_string(),
            email: self.email().to_string(),
            token: issuer.issue(self)?,
            bio: self.bio().map(str::to_string),
            image: self.image().map(str::to_string),
            role: self.role(),
        })
    }

    /// Profile of this user as seen by `viewer`
    pub fn to_profile_for(&self, viewer: Option<&User>) -> ProfileView {
        ProfileView {
            username: self.username().to_string(),
            bio: self.bio().map(str::to_string),
            image: self.image().unwrap_or(DEFAULT_AVATAR).to_string(),
            following: viewer.is_some_and(|v| v.is_following(self.id())),
        }
    }
}

impl Item {
    /// Item as seen by `viewer`, with `seller` as the loaded owner
    pub fn to_view_for(&self, seller: &User, viewer: Option<&User>) -> Result<ItemView, DomainError> {
        if seller.id() != self.seller() {
            return Err(DomainError::unresolved("seller", self.seller()));
        }

        Ok(ItemView {
            slug: self.slug().map(str::to_string),
            title: self.title().to_string(),
            description: self.description().to_string(),
            image: self.image().map(str::to_string),
            created_at: self.created_at(),
            updated_at: self.updated_at(),
            tag_list: self.tag_list().to_vec(),
            favorited: viewer.is_some_and(|v| v.is_favorite(self.id())),
            favorites_count: self.favorites_count(),
            seller: seller.to_profile_for(viewer),
        })
    }
}

impl Comment {
    /// Comment as seen by `viewer`, with `seller` as the loaded author
    pub fn to_view_for(
        &self,
        seller: &User,
        viewer: Option<&User>,
    ) -> Result<CommentView, DomainError> {
        if seller.id() != self.seller() {
            return Err(DomainError::unresolved("seller", self.seller()));
        }

        Ok(CommentView {
            id: *self.id(),
            body: self.body().to_string(),
            created_at: self.created_at(),
            seller: seller.to_profile_for(viewer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::MockTokenIssuer;

    fn user(name: &str) -> User {
        User::new(name, format!("{}@example.com", name))
    }

    #[test]
    fn test_profile_for_anonymous_viewer() {
        let alice = user("alice").with_bio("hello");

        let view = alice.to_profile_for(None);
        assert_eq!(view.username, "alice");
        assert_eq!(view.bio.as_deref(), Some("hello"));
        assert_eq!(view.image, DEFAULT_AVATAR);
        assert!(!view.following);
    }

    #[test]
    fn test_profile_for_follower() {
        let alice = user("alice").with_image("https://example.com/a.png");
        let mut bob = user("bob");
        bob.follow(*alice.id());

        let view = alice.to_profile_for(Some(&bob));
        assert!(view.following);
        assert_eq!(view.image, "https://example.com/a.png");
    }

    #[test]
    fn test_profile_for_non_follower() {
        let alice = user("alice");
        let bob = user("bob");

        assert!(!alice.to_profile_for(Some(&bob)).following);
    }

    #[test]
    fn test_auth_view_uses_issued_token() {
        let alice = user("alice").with_role(Role::Admin);
        let mut issuer = MockTokenIssuer::new();
        issuer
            .expect_issue()
            .times(1)
            .returning(|u| Ok(format!("token-for-{}", u.username())));

        let view = alice.to_auth_view(&issuer).unwrap();
        assert_eq!(view.token, "token-for-alice");
        assert_eq!(view.email, "alice@example.com");
        assert_eq!(view.role, Role::Admin);
    }

    #[test]
    fn test_auth_view_propagates_issuer_error() {
        let alice = user("alice");
        let mut issuer = MockTokenIssuer::new();
        issuer
            .expect_issue()
            .returning(|_| Err(DomainError::credential("no key")));

        assert!(alice.to_auth_view(&issuer).is_err());
    }

    #[test]
    fn test_item_view_favorited_by_viewer() {
        let seller = user("seller");
        let item = Item::new("Lamp", "Bright", *seller.id()).with_tags(["home"]);
        let mut viewer = user("viewer");
        viewer.favorite(*item.id());
        viewer.follow(*seller.id());

        let view = item.to_view_for(&seller, Some(&viewer)).unwrap();
        assert!(view.favorited);
        assert!(view.seller.following);
        assert_eq!(view.tag_list, vec!["home".to_string()]);
        assert_eq!(view.favorites_count, 0);
    }

    #[test]
    fn test_item_view_for_anonymous_viewer() {
        let seller = user("seller");
        let item = Item::new("Lamp", "Bright", *seller.id());

        let view = item.to_view_for(&seller, None).unwrap();
        assert!(!view.favorited);
        assert!(!view.seller.following);
    }

    #[test]
    fn test_item_view_requires_matching_seller() {
        let seller = user("seller");
        let other = user("other");
        let item = Item::new("Lamp", "Bright", *seller.id());

        let err = item.to_view_for(&other, None).unwrap_err();
        assert_eq!(err, DomainError::unresolved("seller", seller.id()));
    }

    #[test]
    fn test_comment_view() {
        let seller = user("seller");
        let item = Item::new("Lamp", "Bright", *seller.id());
        let comment = Comment::new("Nice", *seller.id(), *item.id());

        let view = comment.to_view_for(&seller, None).unwrap();
        assert_eq!(view.id, *comment.id());
        assert_eq!(view.body, "Nice");
        assert_eq!(view.seller.username, "seller");
    }

    #[test]
    fn test_comment_view_requires_matching_seller() {
        let seller = user("seller");
        let comment = Comment::new("Nice", *seller.id(), crate::domain::document::ItemId::generate());

        assert!(comment.to_view_for(&user("other"), None).is_err());
    }

    #[test]
    fn test_views_serialize_camel_case() {
        let seller = user("seller");
        let item = Item::new("Lamp", "Bright", *seller.id());

        let json = serde_json::to_value(item.to_view_for(&seller, None).unwrap()).unwrap();
        assert!(json.get("favoritesCount").is_some());
        assert!(json.get("tagList").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
