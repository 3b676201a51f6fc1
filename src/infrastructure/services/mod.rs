//! Infrastructure services

mod projection_service;
mod social_service;

pub use projection_service::ProjectionService;
pub use social_service::SocialService;
