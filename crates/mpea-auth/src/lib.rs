//! MPEA Auth - Admin authentication
//!
//! This crate provides:
//! - JWT token encoding and validation
//! - Admin credential checks and account creation (bcrypt)
//! - The per-request `AuthContext` filled in by the server middleware

pub mod model;
pub mod service;

// Re-export commonly used types
pub use model::*;

// JWT error types carried by AuthContext
pub use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
