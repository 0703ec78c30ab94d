//! Partner admin API

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use validator::Validate;

use mpea_common::{CmsError, EnableStatus, non_blank};
use mpea_persistence::{Page, PartnerDraft, PartnerInfo, PartnerPersistence};

use super::{
    model::{IdsParam, ListQuery, not_blank, parse_filter, validated},
    page::CreatedResult,
};
use crate::{
    error::AppError,
    model::{app_state::AppState, response},
    secured::require_admin,
};

const PARTNER_NOT_FOUND: &str = "partner not found";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct PartnerParam {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    title: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    image: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    link: Option<String>,
    #[serde(default)]
    sort_order: i32,
    status: Option<String>,
}

impl PartnerParam {
    fn into_draft(self) -> Result<PartnerDraft, AppError> {
        let status = parse_filter::<EnableStatus>(self.status.as_deref(), "status")?;

        Ok(PartnerDraft {
            title: self.title.trim().to_string(),
            image: self.image.trim().to_string(),
            link: non_blank(self.link).map(|v| v.trim().to_string()),
            sort_order: self.sort_order,
            status: status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SortParam {
    sort_order: i32,
}

#[derive(Debug, Serialize)]
struct DeletedResult {
    deleted: u64,
}

fn not_found() -> AppError {
    CmsError::ResourceNotFound(PARTNER_NOT_FOUND.to_string()).into()
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
        .partner_find_page(
            None,
            params.keyword.trim(),
            params.page_no(),
            params.page_size(),
        )
        .await?;

    Ok(response::Result::<Page<PartnerInfo>>::http_success(result))
}

#[get("/{id}")]
async fn find_one(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let partner = data
        .persistence()
        .partner_find_by_id(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<PartnerInfo>::http_success(partner))
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<PartnerParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let draft = validated(body.into_inner())?.into_draft()?;

    let id = data.persistence().partner_create(draft).await?;

    tracing::info!(id, admin = %admin.username, "partner created");

    Ok(response::Result::<CreatedResult>::http_success(
        CreatedResult { id },
    ))
}

#[post("/batch-delete")]
async fn batch_delete(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<IdsParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let param = validated(body.into_inner())?;

    let deleted = data.persistence().partner_delete_many(&param.ids).await?;

    tracing::info!(deleted, admin = %admin.username, "partners deleted");

    Ok(response::Result::<DeletedResult>::http_success(
        DeletedResult { deleted },
    ))
}

#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<PartnerParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let draft = validated(body.into_inner())?.into_draft()?;
    let id = path.into_inner();

    if !data.persistence().partner_update(id, draft).await? {
        return Err(not_found());
    }

    let partner = data
        .persistence()
        .partner_find_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<PartnerInfo>::http_success(partner))
}

#[patch("/{id}/sort")]
async fn update_sort(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<SortParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let id = path.into_inner();

    if !data
        .persistence()
        .partner_update_sort_order(id, body.sort_order)
        .await?
    {
        return Err(not_found());
    }

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

    if !data.persistence().partner_delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(id, admin = %admin.username, "partner deleted");

    Ok(response::Result::<()>::http_success(()))
}

pub fn routes() -> Scope {
    web::scope("/api/partners")
        .service(search)
        .service(batch_delete)
        .service(find_one)
        .service(create)
        .service(update)
        .service(update_sort)
        .service(remove)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_param_defaults() {
        let param: PartnerParam =
            serde_json::from_str(r#"{"title": "Acme", "image": "/logo.png", "link": " "}"#)
                .unwrap();
        let draft = validated(param).unwrap().into_draft().unwrap();
        assert_eq!(draft.status, EnableStatus::Enabled);
        assert_eq!(draft.link, None);
        assert_eq!(draft.sort_order, 0);
    }

    #[test]
    fn test_partner_param_rejects_unknown_status() {
        let param: PartnerParam = serde_json::from_str(
            r#"{"title": "Acme", "image": "/logo.png", "status": "hidden"}"#,
        )
        .unwrap();
        assert!(param.into_draft().is_err());
    }
}
