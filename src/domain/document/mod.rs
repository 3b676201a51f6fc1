//! Document domain - Generic document store abstraction layer

mod entity;
mod id;
mod repository;

pub use entity::{Document, UniqueKey};
pub use id::{CommentId, DocumentKey, ItemId, UserId};
pub use repository::Repository;

#[cfg(test)]
pub use repository::mock;
