// Admin access control for handlers

use actix_web::{HttpMessage, HttpRequest};

use mpea_auth::model::{AdminIdentity, AuthContext, TOKEN_MISSING_MESSAGE};
use mpea_common::CmsError;

use crate::error::AppError;

/// The admin attached to `req` by the authentication middleware.
///
/// Fails with `AuthError` (401) when the token is missing, expired or invalid.
pub fn require_admin(req: &HttpRequest) -> Result<AdminIdentity, AppError> {
    let extensions = req.extensions();
    let Some(auth_context) = extensions.get::<AuthContext>() else {
        return Err(CmsError::AuthError(TOKEN_MISSING_MESSAGE.to_string()).into());
    };

    auth_context
        .require_admin()
        .map_err(|message| CmsError::AuthError(message).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use mpea_auth::model::TOKEN_EXPIRED_MESSAGE;

    #[test]
    fn test_require_admin_without_context() {
        let req = TestRequest::default().to_http_request();
        let err = require_admin(&req).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CmsError>(),
            Some(&CmsError::AuthError(TOKEN_MISSING_MESSAGE.to_string()))
        );
    }

    #[test]
    fn test_require_admin_with_context() {
        let req = TestRequest::default().to_http_request();
        let admin = AdminIdentity {
            id: 1,
            username: "admin".to_string(),
        };
        req.extensions_mut().insert(AuthContext {
            admin: Some(admin.clone()),
            jwt_error: None,
            token_provided: true,
        });
        assert_eq!(require_admin(&req).unwrap(), admin);
    }

    #[test]
    fn test_require_admin_expired() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthContext {
            admin: None,
            jwt_error: Some(jsonwebtoken_error()),
            token_provided: true,
        });
        let err = require_admin(&req).unwrap_err();
        assert_eq!(err.to_string(), TOKEN_EXPIRED_MESSAGE);
    }

    fn jsonwebtoken_error() -> mpea_auth::JwtError {
        mpea_auth::JwtErrorKind::ExpiredSignature.into()
    }
}
