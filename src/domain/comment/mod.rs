//! Comment domain

mod entity;
mod repository;

pub use entity::Comment;
pub use repository::CommentRepository;
