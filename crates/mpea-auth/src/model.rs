//! Authentication models
//!
//! JWT claims, the authenticated admin identity and the request-scoped
//! `AuthContext`.

use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};

// Auth configuration keys
pub const TOKEN_SECRET_KEY: &str = "mpea.auth.jwt.secret";
pub const DEFAULT_TOKEN_SECRET_KEY: &str = "default_secret_key_please_change";
pub const TOKEN_EXPIRE_SECONDS: &str = "mpea.auth.jwt.expireSeconds";
pub const DEFAULT_TOKEN_EXPIRE_SECONDS: i64 = 7 * 24 * 60 * 60;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TOKEN_PREFIX: &str = "Bearer ";
pub const BCRYPT_COST: u32 = 10;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid username or password";
pub const TOKEN_MISSING_MESSAGE: &str = "authentication token not provided";
pub const TOKEN_EXPIRED_MESSAGE: &str = "token expired!";
pub const TOKEN_INVALID_MESSAGE: &str = "invalid token";

/// JWT claims issued at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminJwtPayload {
    pub id: i32,
    pub username: String,
    pub exp: i64,
}

/// The admin a request is acting as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: i32,
    pub username: String,
}

impl From<AdminJwtPayload> for AdminIdentity {
    fn from(value: AdminJwtPayload) -> Self {
        Self {
            id: value.id,
            username: value.username,
        }
    }
}

/// Authentication outcome attached to every request
#[derive(Debug, Default)]
pub struct AuthContext {
    pub admin: Option<AdminIdentity>,
    pub jwt_error: Option<jsonwebtoken::errors::Error>,
    pub token_provided: bool,
}

impl AuthContext {
    pub fn jwt_error_string(&self) -> String {
        if let Some(e) = &self.jwt_error {
            match e.kind() {
                ErrorKind::ExpiredSignature => TOKEN_EXPIRED_MESSAGE.to_string(),
                _ => TOKEN_INVALID_MESSAGE.to_string(),
            }
        } else {
            String::default()
        }
    }

    /// The authenticated admin, or the message explaining why there is none.
    pub fn require_admin(&self) -> Result<AdminIdentity, String> {
        match &self.admin {
            Some(admin) => Ok(admin.clone()),
            None if !self.token_provided => Err(TOKEN_MISSING_MESSAGE.to_string()),
            None if self.jwt_error.is_some() => Err(self.jwt_error_string()),
            None => Err(TOKEN_INVALID_MESSAGE.to_string()),
        }
    }
}
