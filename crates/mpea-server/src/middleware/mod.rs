// HTTP middleware implementations

pub mod auth; // Bearer token decoding into AuthContext
pub mod rate_limit; // Contact form and login limiters
