//! Deterministic synthetic records

use crate::domain::{Comment, Item, ItemId, User, UserId};

/// Image attached to every synthetic user and item
pub const SEED_IMAGE: &str = "https://example.com/image.png";

/// Tags attached to every synthetic item
pub const SEED_TAGS: [&str; 2] = ["tag1", "tag2"];

/// The `index`-th synthetic user, without password material
pub fn synthetic_user(index: usize) -> User {
    User::new(format!("user{}", index), format!("user{}@example.com", index))
        .with_bio(format!("User {} bio", index))
        .with_image(SEED_IMAGE)
}

pub fn synthetic_item(index: usize, seller: UserId) -> Item {
    Item::new(
        format!("Product {}", index),
        format!("Description of product {}", index),
        seller,
    )
    .with_image(SEED_IMAGE)
    .with_tags(SEED_TAGS)
}

pub fn synthetic_comment(index: usize, seller: UserId, item: ItemId) -> Comment {
    Comment::new(format!("Comment {}", index), seller, item)
}
