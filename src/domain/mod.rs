//! Domain layer: documents, their invariants and the ports they are stored
//! and projected through

pub mod auth;
pub mod comment;
pub mod document;
pub mod error;
pub mod item;
pub mod projection;
pub mod store;
pub mod user;

pub use auth::TokenIssuer;
pub use comment::{Comment, CommentRepository};
pub use document::{CommentId, Document, ItemId, Repository, UserId};
pub use error::DomainError;
pub use item::{Item, ItemRepository};
pub use projection::{AuthView, CommentView, ItemView, ProfileView, DEFAULT_AVATAR};
pub use store::{Connection, StoreContext};
pub use user::{PasswordHasher, Role, User, UserRepository};
