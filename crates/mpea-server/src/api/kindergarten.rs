//! Recommended kindergarten admin API

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use serde::Deserialize;
use validator::Validate;

use mpea_common::{CmsError, DEFAULT_PAGE_NO, EnableStatus};
use mpea_persistence::{KindergartenDraft, KindergartenInfo, KindergartenPersistence, Page};

use super::{
    model::{DEFAULT_LIST_PAGE_SIZE, not_blank, parse_filter, validated},
    page::CreatedResult,
};
use crate::{
    error::AppError,
    model::{app_state::AppState, response},
    secured::require_admin,
};

const KINDERGARTEN_NOT_FOUND: &str = "kindergarten not found";

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
struct KindergartenParam {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    name: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    name_en: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    address: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    address_en: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    logo: String,
    #[serde(default)]
    sort_order: i32,
    status: Option<String>,
}

impl KindergartenParam {
    fn into_draft(self) -> Result<KindergartenDraft, AppError> {
        let status = parse_filter::<EnableStatus>(self.status.as_deref(), "status")?;

        Ok(KindergartenDraft {
            name: self.name.trim().to_string(),
            name_en: self.name_en.trim().to_string(),
            address: self.address.trim().to_string(),
            address_en: self.address_en.trim().to_string(),
            logo: self.logo.trim().to_string(),
            sort_order: self.sort_order,
            status: status.unwrap_or_default(),
        })
    }
}

fn not_found() -> AppError {
    CmsError::ResourceNotFound(KINDERGARTEN_NOT_FOUND.to_string()).into()
}

#[get("")]
async fn search(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SearchParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let params = validated(params.into_inner())?;
    let status = parse_filter::<EnableStatus>(params.status.as_deref(), "status")?;

    let result = data
        .persistence()
        .kindergarten_find_page(
            status,
            params.keyword.trim(),
            params.page.unwrap_or(DEFAULT_PAGE_NO),
            params.limit.unwrap_or(DEFAULT_LIST_PAGE_SIZE),
        )
        .await?;

    Ok(response::Result::<Page<KindergartenInfo>>::http_success(
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

    let kindergarten = data
        .persistence()
        .kindergarten_find_by_id(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<KindergartenInfo>::http_success(
        kindergarten,
    ))
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<KindergartenParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let draft = validated(body.into_inner())?.into_draft()?;

    let id = data.persistence().kindergarten_create(draft).await?;

    tracing::info!(id, admin = %admin.username, "kindergarten created");

    Ok(response::Result::<CreatedResult>::http_success(
        CreatedResult { id },
    ))
}

#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<KindergartenParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let draft = validated(body.into_inner())?.into_draft()?;
    let id = path.into_inner();

    if !data.persistence().kindergarten_update(id, draft).await? {
        return Err(not_found());
    }

    let kindergarten = data
        .persistence()
        .kindergarten_find_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<KindergartenInfo>::http_success(
        kindergarten,
    ))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let id = path.into_inner();

    if !data.persistence().kindergarten_delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(id, admin = %admin.username, "kindergarten deleted");

    Ok(response::Result::<()>::http_success(()))
}

pub fn routes() -> Scope {
    web::scope("/api/kindergartens")
        .service(search)
        .service(find_one)
        .service(create)
        .service(update)
        .service(remove)
}
