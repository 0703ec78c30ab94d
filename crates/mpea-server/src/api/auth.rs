//! Admin login and logout

use actix_web::{HttpRequest, HttpResponse, Responder, Scope, post, web};
use serde::{Deserialize, Serialize};
use validator::Validate;

use mpea_auth::{
    model::{AdminIdentity, INVALID_CREDENTIALS_MESSAGE},
    service::{admin, auth::encode_jwt_token},
};
use mpea_common::CmsError;

use super::model::{client_ip, validated};
use crate::{
    error::AppError,
    model::{app_state::AppState, response},
};

#[derive(Debug, Deserialize, Validate)]
struct LoginParam {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResult {
    token: String,
    admin: AdminIdentity,
}

#[post("/login")]
async fn login(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<LoginParam>,
) -> Result<HttpResponse, AppError> {
    let param = validated(body.into_inner())?;
    let client_ip = client_ip(&req);

    if let Some(lockout) = data.login_limiter.check(&client_ip) {
        return Err(CmsError::TooManyRequests(format!(
            "too many failed logins, retry in {} seconds",
            lockout.as_secs().max(1)
        ))
        .into());
    }

    let Some(account) =
        admin::authenticate(data.persistence(), &param.username, &param.password).await?
    else {
        data.login_limiter.record_failure(&client_ip);
        tracing::info!(username = %param.username, client_ip = %client_ip, "login rejected");
        return Err(CmsError::AuthError(INVALID_CREDENTIALS_MESSAGE.to_string()).into());
    };

    data.login_limiter.record_success(&client_ip);

    let identity = AdminIdentity {
        id: account.id,
        username: account.username,
    };
    let token = encode_jwt_token(
        &identity,
        data.token_secret_key(),
        data.settings.token_expire_seconds,
    )
    .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))?;

    tracing::info!(id = identity.id, username = %identity.username, "admin logged in");

    Ok(response::Result::<LoginResult>::http_success(LoginResult {
        token,
        admin: identity,
    }))
}

/// Tokens are stateless; the client discards its copy.
#[post("/logout")]
async fn logout() -> impl Responder {
    response::Result::<()>::http_success_with_message("logged out".to_string(), ())
}

pub fn routes() -> Scope {
    web::scope("/api/auth").service(login).service(logout)
}
