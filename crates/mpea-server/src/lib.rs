// Main library module for the MPEA CMS backend
// Admin and public HTTP APIs over the translation catalog and site content

// Module declarations
pub mod api; // API handlers and request models
pub mod error; // HTTP error mapping
pub mod middleware; // Authentication and rate limiting
pub mod model; // Configuration, state and response envelope
pub mod secured; // Admin gate used by the handlers
pub mod startup; // Application startup utilities

pub use error::AppError;
pub use model::{app_state::AppState, config::Configuration};
