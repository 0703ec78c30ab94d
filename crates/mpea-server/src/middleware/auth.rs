// Authentication middleware for Actix-web
// Decodes the bearer token, if any, into an AuthContext request extension.
// Rejection is left to the handlers (see `secured::require_admin`).

use actix_service::forward_ready;
use actix_utils::future::{Ready, ok};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{Method, header::HeaderMap},
    web::Data,
};
use futures::future::LocalBoxFuture;

use mpea_auth::model::{AUTHORIZATION_HEADER, AdminIdentity, AuthContext, TOKEN_PREFIX};
use mpea_auth::service::auth::decode_jwt_token;

use crate::model::app_state::AppState;

// Authentication middleware transformer
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware { service })
    }
}

pub struct AuthenticationMiddleware<S> {
    service: S,
}

/// Token from `Authorization: Bearer <token>`, if present and non-empty
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION_HEADER)?.to_str().ok()?.trim();
    let token = value.strip_prefix(TOKEN_PREFIX)?.trim();

    (!token.is_empty()).then(|| token.to_string())
}

/// Decode `token` against `secret_key` into a fresh context.
pub fn authenticate_token(token: Option<String>, secret_key: &str) -> AuthContext {
    let mut auth_context = AuthContext::default();

    if let Some(token) = token {
        auth_context.token_provided = true;

        match decode_jwt_token(&token, secret_key) {
            Ok(token_data) => {
                auth_context.admin = Some(AdminIdentity::from(token_data.claims));
            }
            Err(err) => {
                tracing::debug!(error = %err, "rejected bearer token");
                auth_context.jwt_error = Some(err);
            }
        }
    }

    auth_context
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if Method::OPTIONS != *req.method() {
            let token = extract_token(req.headers());

            let auth_context = match req.app_data::<Data<AppState>>() {
                Some(app_state) => authenticate_token(token, app_state.token_secret_key()),
                None => {
                    tracing::error!("AppState not found in request app_data");
                    AuthContext {
                        token_provided: token.is_some(),
                        ..Default::default()
                    }
                }
            };

            // Always insert AuthContext so require_admin can inspect it
            req.extensions_mut().insert(auth_context);
        }

        let res = self.service.call(req);

        Box::pin(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};
    use mpea_auth::service::auth::encode_jwt_token;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(value).unwrap(),
        );
        map
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token(&headers("Bearer abc")), Some("abc".to_string()));
        assert_eq!(extract_token(&headers("  Bearer  abc ")), Some("abc".to_string()));
        assert_eq!(extract_token(&headers("Bearer ")), None);
        assert_eq!(extract_token(&headers("Basic abc")), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_authenticate_token() {
        let admin = AdminIdentity {
            id: 3,
            username: "admin".to_string(),
        };
        let token = encode_jwt_token(&admin, "secret", 60).unwrap();

        let ctx = authenticate_token(Some(token.clone()), "secret");
        assert_eq!(ctx.admin, Some(admin));
        assert!(ctx.token_provided);

        let ctx = authenticate_token(Some(token), "other");
        assert!(ctx.admin.is_none());
        assert!(ctx.jwt_error.is_some());

        let ctx = authenticate_token(None, "secret");
        assert!(!ctx.token_provided);
    }
}
