//! HTTP API handlers

pub mod auth;
pub mod board_chair;
pub mod case;
pub mod certificate;
pub mod contact_message;
pub mod event;
pub mod health;
pub mod kindergarten;
pub mod lecturer;
pub mod model;
pub mod news;
pub mod page;
pub mod partner;
pub mod public;
pub mod translation;

use actix_web::{HttpRequest, error, web};

use mpea_common::CmsError;

use crate::error::AppError;

fn bad_request(err: impl std::fmt::Display) -> actix_web::Error {
    AppError::from(CmsError::IllegalArgument(err.to_string())).into()
}

/// Malformed bodies, query strings and path segments answer with the 400 envelope.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| bad_request(err)),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| bad_request(err)),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err: error::PathError, _req: &HttpRequest| bad_request(err)),
    );
}

/// Register every route of the server.
pub fn configure(cfg: &mut web::ServiceConfig) {
    extractor_configs(cfg);

    cfg.service(health::health)
        .service(auth::routes())
        .service(translation::routes())
        .service(page::routes())
        .service(news::routes())
        .service(contact_message::routes())
        .service(case::routes())
        .service(lecturer::routes())
        .service(partner::routes())
        .service(kindergarten::routes())
        .service(event::routes())
        .service(board_chair::routes())
        .service(certificate::routes())
        .service(public::routes());
}
