//! Item domain

mod entity;
mod repository;
pub mod slug;

pub use entity::Item;
pub use repository::ItemRepository;
pub use slug::{generate_slug, slugify};
