//! Event admin API

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use validator::Validate;

use mpea_common::{CmsError, DEFAULT_PAGE_NO};
use mpea_persistence::{EventDraft, EventInfo, EventPersistence, Page};

use super::{
    model::{DEFAULT_LIST_PAGE_SIZE, not_blank, validated},
    page::{CreatedResult, parse_status},
};
use crate::{
    error::AppError,
    model::{app_state::AppState, response},
    secured::require_admin,
};

const EVENT_NOT_FOUND: &str = "event not found";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Default, Deserialize, Validate)]
struct SearchParam {
    #[validate(range(min = 1, message = "must be a positive integer"))]
    page: Option<u64>,
    #[validate(range(min = 1, max = 100, message = "must be within 1-100"))]
    limit: Option<u64>,
    #[serde(default)]
    keyword: String,
    status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct EventParam {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    title: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    title_en: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    cover: String,
    #[serde(default)]
    event_date: String,
    content: Option<String>,
    content_en: Option<String>,
    status: Option<String>,
    #[serde(default)]
    sort_order: i32,
}

impl EventParam {
    fn into_draft(self) -> Result<EventDraft, AppError> {
        let event_date = parse_event_date(&self.event_date)?;
        let status = parse_status(self.status.as_deref())?;

        Ok(EventDraft {
            title: self.title.trim().to_string(),
            title_en: self.title_en.trim().to_string(),
            cover: self.cover.trim().to_string(),
            event_date,
            content: self.content.unwrap_or_default(),
            content_en: self.content_en.unwrap_or_default(),
            status: status.unwrap_or_default(),
            sort_order: self.sort_order,
        })
    }
}

/// Parse an ISO 8601 date or date-time. Offsets are converted to UTC; a bare
/// date means midnight.
fn parse_event_date(value: &str) -> Result<NaiveDateTime, AppError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(dt) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(dt);
    }

    Err(CmsError::IllegalArgument("eventDate must be a valid date".to_string()).into())
}

fn not_found() -> AppError {
    CmsError::ResourceNotFound(EVENT_NOT_FOUND.to_string()).into()
}

#[get("")]
async fn search(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SearchParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let params = validated(params.into_inner())?;
    let status = parse_status(params.status.as_deref().filter(|s| !s.trim().is_empty()))?;

    let result = data
        .persistence()
        .event_find_page(
            status,
            params.keyword.trim(),
            params.page.unwrap_or(DEFAULT_PAGE_NO),
            params.limit.unwrap_or(DEFAULT_LIST_PAGE_SIZE),
        )
        .await?;

    Ok(response::Result::<Page<EventInfo>>::http_success(result))
}

#[get("/{id}")]
async fn find_one(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let event = data
        .persistence()
        .event_find_by_id(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<EventInfo>::http_success(event))
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<EventParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let draft = validated(body.into_inner())?.into_draft()?;

    let id = data.persistence().event_create(draft).await?;

    tracing::info!(id, admin = %admin.username, "event created");

    Ok(response::Result::<CreatedResult>::http_success(
        CreatedResult { id },
    ))
}

#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<EventParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let draft = validated(body.into_inner())?.into_draft()?;
    let id = path.into_inner();

    if !data.persistence().event_update(id, draft).await? {
        return Err(not_found());
    }

    let event = data
        .persistence()
        .event_find_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<EventInfo>::http_success(event))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let id = path.into_inner();

    if !data.persistence().event_delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(id, admin = %admin.username, "event deleted");

    Ok(response::Result::<()>::http_success(()))
}

pub fn routes() -> Scope {
    web::scope("/api/events")
        .service(search)
        .service(find_one)
        .service(create)
        .service(update)
        .service(remove)
}
