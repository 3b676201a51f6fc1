//! Authentication infrastructure module
//!
//! This module provides JWT token issuing for authenticated user views.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtService};
