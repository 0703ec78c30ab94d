//! Board chair admin API

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use serde::Deserialize;
use validator::Validate;

use mpea_common::CmsError;
use mpea_persistence::{BoardChairDraft, BoardChairInfo, BoardChairPersistence};

use super::{
    model::{not_blank, validated},
    page::CreatedResult,
};
use crate::{
    error::AppError,
    model::{app_state::AppState, response},
    secured::require_admin,
};

const BOARD_CHAIR_NOT_FOUND: &str = "board chair not found";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct BoardChairParam {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "must be at most 100 characters")
    )]
    name: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "must be at most 100 characters")
    )]
    name_en: String,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    position: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    position_en: Option<String>,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    avatar: String,
    #[serde(default)]
    sort_order: i32,
    introduction: Option<String>,
    introduction_en: Option<String>,
}

impl From<BoardChairParam> for BoardChairDraft {
    fn from(param: BoardChairParam) -> Self {
        BoardChairDraft {
            name: param.name.trim().to_string(),
            name_en: param.name_en.trim().to_string(),
            position: param.position.unwrap_or_default().trim().to_string(),
            position_en: param.position_en.unwrap_or_default().trim().to_string(),
            avatar: param.avatar.trim().to_string(),
            sort_order: param.sort_order,
            introduction: param.introduction.unwrap_or_default(),
            introduction_en: param.introduction_en.unwrap_or_default(),
        }
    }
}

fn not_found() -> AppError {
    CmsError::ResourceNotFound(BOARD_CHAIR_NOT_FOUND.to_string()).into()
}

/// Every bio, newest first.
#[get("")]
async fn list(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let items = data.persistence().board_chair_list().await?;

    Ok(response::Result::<Vec<BoardChairInfo>>::http_success(items))
}

#[get("/{id}")]
async fn find_one(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let chair = data
        .persistence()
        .board_chair_find_by_id(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<BoardChairInfo>::http_success(chair))
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<BoardChairParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let param = validated(body.into_inner())?;

    let id = data.persistence().board_chair_create(param.into()).await?;

    tracing::info!(id, admin = %admin.username, "board chair created");

    Ok(response::Result::<CreatedResult>::http_success(
        CreatedResult { id },
    ))
}

#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<BoardChairParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let param = validated(body.into_inner())?;
    let id = path.into_inner();

    if !data.persistence().board_chair_update(id, param.into()).await? {
        return Err(not_found());
    }

    let chair = data
        .persistence()
        .board_chair_find_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<BoardChairInfo>::http_success(chair))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let id = path.into_inner();

    if !data.persistence().board_chair_delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(id, admin = %admin.username, "board chair deleted");

    Ok(response::Result::<()>::http_success(()))
}

pub fn routes() -> Scope {
    web::scope("/api/board-chair")
        .service(list)
        .service(find_one)
        .service(create)
        .service(update)
        .service(remove)
}
