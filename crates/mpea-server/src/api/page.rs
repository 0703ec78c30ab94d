//! Site page admin API

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use validator::Validate;

use mpea_common::{CmsError, PublishStatus};
use mpea_persistence::{ContentDraft, ContentPatch, Page, PageInfo, PagePersistence};

use super::model::{ListQuery, validated};
use crate::{
    error::AppError,
    model::{app_state::AppState, response},
    secured::require_admin,
};

const PAGE_NOT_FOUND: &str = "page not found";

#[derive(Debug, Deserialize, Validate)]
struct CreateParam {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    title: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    path: String,
    content: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateParam {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    title: Option<String>,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    path: Option<String>,
    content: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatedResult {
    pub id: i32,
}

/// Parse an optional `published`/`draft` status.
pub(crate) fn parse_status(status: Option<&str>) -> Result<Option<PublishStatus>, AppError> {
    status
        .map(|s| {
            s.trim()
                .parse::<PublishStatus>()
                .map_err(|_| CmsError::IllegalArgument("status must be published or draft".to_string()))
        })
        .transpose()
        .map_err(AppError::from)
}

fn not_found() -> AppError {
    CmsError::ResourceNotFound(PAGE_NOT_FOUND.to_string()).into()
}

#[get("")]
async fn search(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let params = validated(params.into_inner())?;

    let result = data
        .persistence()
        .page_find_page(
            None,
            params.keyword.trim(),
            params.page_no(),
            params.page_size(),
        )
        .await?;

    Ok(response::Result::<Page<PageInfo>>::http_success(result))
}

#[get("/{id}")]
async fn find_one(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let page = data
        .persistence()
        .page_find_by_id(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<PageInfo>::http_success(page))
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let param = validated(body.into_inner())?;

    let draft = ContentDraft {
        title: param.title.trim().to_string(),
        address: param.path.trim().to_string(),
        content: param.content.unwrap_or_default(),
        status: parse_status(param.status.as_deref())?.unwrap_or_default(),
    };

    let id = data.persistence().page_create(draft).await?;

    tracing::info!(id, admin = %admin.username, "page created");

    Ok(response::Result::<CreatedResult>::http_success(
        CreatedResult { id },
    ))
}

#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let param = validated(body.into_inner())?;
    let id = path.into_inner();

    let patch = ContentPatch {
        title: param.title.map(|v| v.trim().to_string()),
        address: param.path.map(|v| v.trim().to_string()),
        content: param.content,
        status: parse_status(param.status.as_deref())?,
    };

    if !data.persistence().page_update(id, patch).await? {
        return Err(not_found());
    }

    let page = data
        .persistence()
        .page_find_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<PageInfo>::http_success(page))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let id = path.into_inner();

    if !data.persistence().page_delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(id, admin = %admin.username, "page deleted");

    Ok(response::Result::<()>::http_success(()))
}

pub fn routes() -> Scope {
    web::scope("/api/pages")
        .service(search)
        .service(find_one)
        .service(create)
        .service(update)
        .service(remove)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some(" published ")).unwrap(),
            Some(PublishStatus::Published)
        );
        assert!(parse_status(Some("archived")).is_err());
    }
}
