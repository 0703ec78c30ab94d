use actix_web::{HttpResponse, get, web};
use serde::Serialize;

use crate::model::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    storage: &'static str,
}

/// Liveness check; reports `degraded` when the store does not answer.
#[get("/health")]
async fn health(data: web::Data<AppState>) -> HttpResponse {
    let storage = match data.persistence().health_check().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "storage health check failed");
            "down"
        }
    };

    HttpResponse::Ok().json(HealthStatus {
        status: if storage == "up" { "ok" } else { "degraded" },
        storage,
    })
}
