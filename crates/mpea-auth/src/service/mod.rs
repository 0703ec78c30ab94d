//! Authentication service implementations

pub mod admin;
pub mod auth;
