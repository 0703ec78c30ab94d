//! Lecturer admin API

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use serde::Deserialize;
use validator::Validate;

use mpea_common::CmsError;
use mpea_persistence::{LecturerDraft, LecturerInfo, LecturerPersistence, Page};

use super::{
    model::{ListQuery, not_blank, validated},
    page::CreatedResult,
};
use crate::{
    error::AppError,
    model::{app_state::AppState, response},
    secured::require_admin,
};

const LECTURER_NOT_FOUND: &str = "lecturer not found";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct LecturerParam {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "must be at most 100 characters")
    )]
    name: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    name_en: Option<String>,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    photo: String,
    introduction: Option<String>,
    introduction_en: Option<String>,
    #[serde(default)]
    sort_order: i32,
}

impl From<LecturerParam> for LecturerDraft {
    fn from(param: LecturerParam) -> Self {
        LecturerDraft {
            name: param.name.trim().to_string(),
            name_en: param.name_en.unwrap_or_default().trim().to_string(),
            photo: param.photo.trim().to_string(),
            introduction: param.introduction.unwrap_or_default(),
            introduction_en: param.introduction_en.unwrap_or_default(),
            sort_order: param.sort_order,
        }
    }
}

fn not_found() -> AppError {
    CmsError::ResourceNotFound(LECTURER_NOT_FOUND.to_string()).into()
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
        .lecturer_find_page(params.keyword.trim(), params.page_no(), params.page_size())
        .await?;

    Ok(response::Result::<Page<LecturerInfo>>::http_success(result))
}

#[get("/{id}")]
async fn find_one(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let lecturer = data
        .persistence()
        .lecturer_find_by_id(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<LecturerInfo>::http_success(lecturer))
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<LecturerParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let param = validated(body.into_inner())?;

    let id = data.persistence().lecturer_create(param.into()).await?;

    tracing::info!(id, admin = %admin.username, "lecturer created");

    Ok(response::Result::<CreatedResult>::http_success(
        CreatedResult { id },
    ))
}

#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<LecturerParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let param = validated(body.into_inner())?;
    let id = path.into_inner();

    if !data.persistence().lecturer_update(id, param.into()).await? {
        return Err(not_found());
    }

    let lecturer = data
        .persistence()
        .lecturer_find_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<LecturerInfo>::http_success(lecturer))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let id = path.into_inner();

    if !data.persistence().lecturer_delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(id, admin = %admin.username, "lecturer deleted");

    Ok(response::Result::<()>::http_success(()))
}

pub fn routes() -> Scope {
    web::scope("/api/lecturers")
        .service(search)
        .service(find_one)
        .service(create)
        .service(update)
        .service(remove)
}
