//! JWT token service
//!
//! Tokens are HS256-signed with the raw bytes of the configured secret.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::model::{AdminIdentity, AdminJwtPayload};

/// Decode and validate a JWT token
pub fn decode_jwt_token(
    token: &str,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<jsonwebtoken::TokenData<AdminJwtPayload>> {
    let decoding_key = DecodingKey::from_secret(secret_key.as_bytes());
    decode::<AdminJwtPayload>(token, &decoding_key, &Validation::new(Algorithm::HS256))
}

/// Encode a JWT token for `admin`, valid for `expire_seconds`
pub fn encode_jwt_token(
    admin: &AdminIdentity,
    secret_key: &str,
    expire_seconds: i64,
) -> jsonwebtoken::errors::Result<String> {
    let exp = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(expire_seconds))
        .unwrap_or_else(chrono::Utc::now)
        .timestamp();

    let payload = AdminJwtPayload {
        id: admin.id,
        username: admin.username.clone(),
        exp,
    };

    let encoding_key = EncodingKey::from_secret(secret_key.as_bytes());
    encode(&Header::new(Algorithm::HS256), &payload, &encoding_key)
}
