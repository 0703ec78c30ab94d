//! Contact message admin API

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, patch, web};
use serde::Deserialize;
use validator::Validate;

use mpea_common::{CmsError, ContactStatus, ContactType};
use mpea_persistence::{ContactMessageInfo, ContactPersistence, ContactQuery, Page};

use super::model::{parse_filter, validated};
use crate::{
    error::AppError,
    model::{app_state::AppState, response},
    secured::require_admin,
};

const MESSAGE_NOT_FOUND: &str = "contact message not found";

#[derive(Debug, Default, Deserialize, Validate)]
struct SearchParam {
    #[validate(range(min = 1, message = "must be a positive integer"))]
    page: Option<u64>,
    #[validate(range(min = 1, max = 100, message = "must be within 1-100"))]
    limit: Option<u64>,
    #[serde(rename = "type")]
    message_type: Option<String>,
    status: Option<String>,
    #[serde(default)]
    keyword: String,
}

#[derive(Debug, Deserialize)]
struct StatusParam {
    #[serde(default)]
    status: String,
}

fn not_found() -> AppError {
    CmsError::ResourceNotFound(MESSAGE_NOT_FOUND.to_string()).into()
}

#[get("")]
async fn search(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SearchParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let params = validated(params.into_inner())?;

    let query = ContactQuery {
        message_type: parse_filter::<ContactType>(params.message_type.as_deref(), "type")?,
        status: parse_filter::<ContactStatus>(params.status.as_deref(), "status")?,
        keyword: params.keyword.trim().to_string(),
    };

    let result = data
        .persistence()
        .contact_find_page(
            &query,
            params.page.unwrap_or(1),
            params.limit.unwrap_or(super::model::DEFAULT_LIST_PAGE_SIZE),
        )
        .await?;

    Ok(response::Result::<Page<ContactMessageInfo>>::http_success(
        result,
    ))
}

#[get("/{id}")]
async fn find_one(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let message = data
        .persistence()
        .contact_find_by_id(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<ContactMessageInfo>::http_success(
        message,
    ))
}

#[patch("/{id}/status")]
async fn update_status(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<StatusParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let id = path.into_inner();

    let status = body
        .status
        .trim()
        .parse::<ContactStatus>()
        .map_err(|_| CmsError::IllegalArgument("status is invalid".to_string()))?;

    if !data.persistence().contact_update_status(id, status).await? {
        return Err(not_found());
    }

    tracing::info!(id, status = %status, admin = %admin.username, "contact message status changed");

    Ok(response::Result::<()>::http_success(()))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let id = path.into_inner();

    if !data.persistence().contact_delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(id, admin = %admin.username, "contact message deleted");

    Ok(response::Result::<()>::http_success(()))
}

pub fn routes() -> Scope {
    web::scope("/api/contact-messages")
        .service(search)
        .service(find_one)
        .service(update_status)
        .service(remove)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter::<ContactType>(None, "type").unwrap(), None);
        assert_eq!(parse_filter::<ContactType>(Some("  "), "type").unwrap(), None);
        assert_eq!(
            parse_filter::<ContactType>(Some("business"), "type").unwrap(),
            Some(ContactType::Business)
        );
        assert!(parse_filter::<ContactStatus>(Some("archived"), "status").is_err());
    }
}
