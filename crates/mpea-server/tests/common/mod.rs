//! Shared setup for the HTTP API tests
//!
//! Every test gets its own `AppState` over the in-memory backend, so tests
//! never share rows or rate-limiter entries.

#![allow(dead_code)]

use std::sync::Arc;

use mpea_auth::{model::AdminIdentity, service::auth::encode_jwt_token};
use mpea_persistence::MemoryPersistService;
use mpea_server::model::{app_state::AppState, config::Configuration};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "admin123";

/// State with the test secret plus `overrides`.
pub fn test_state(overrides: &[(&str, &str)]) -> Arc<AppState> {
    let mut all = vec![("mpea.auth.jwt.secret", TEST_SECRET)];
    all.extend_from_slice(overrides);

    let configuration = Configuration::with_overrides(&all).unwrap();
    Arc::new(AppState::new(
        configuration,
        Arc::new(MemoryPersistService::new()),
    ))
}

/// Create the test admin and return a bearer header value for it.
pub async fn admin_bearer(state: &AppState) -> String {
    let id = mpea_auth::service::admin::create(state.persistence(), TEST_USERNAME, TEST_PASSWORD)
        .await
        .unwrap();
    bearer_for(id, 3600)
}

pub fn bearer_for(id: i32, expire_seconds: i64) -> String {
    let identity = AdminIdentity {
        id,
        username: TEST_USERNAME.to_string(),
    };
    let token = encode_jwt_token(&identity, TEST_SECRET, expire_seconds).unwrap();
    format!("Bearer {}", token)
}

/// Initialize the full application, wrapped like the real server.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(mpea_server::middleware::auth::Authentication)
                .app_data(actix_web::web::Data::from($state.clone()))
                .configure(mpea_server::api::configure),
        )
        .await
    };
}
