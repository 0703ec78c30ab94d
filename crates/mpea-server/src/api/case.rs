//! Case study admin API

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use serde::Deserialize;
use validator::Validate;

use mpea_common::CmsError;
use mpea_persistence::{CaseDraft, CaseInfo, CasePersistence, Page};

use super::{
    model::{ListQuery, not_blank, validated},
    page::CreatedResult,
};
use crate::{
    error::AppError,
    model::{app_state::AppState, response},
    secured::require_admin,
};

const CASE_NOT_FOUND: &str = "case not found";

/// Body of both create and full update
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CaseParam {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    title: String,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    title_en: Option<String>,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    professional_photo: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    child_photo: String,
    introduction: Option<String>,
    introduction_en: Option<String>,
    #[serde(default)]
    featured: bool,
}

impl From<CaseParam> for CaseDraft {
    fn from(param: CaseParam) -> Self {
        CaseDraft {
            title: param.title.trim().to_string(),
            title_en: param.title_en.unwrap_or_default().trim().to_string(),
            professional_photo: param.professional_photo.trim().to_string(),
            child_photo: param.child_photo.trim().to_string(),
            introduction: param.introduction.unwrap_or_default(),
            introduction_en: param.introduction_en.unwrap_or_default(),
            featured: param.featured,
        }
    }
}

fn not_found() -> AppError {
    CmsError::ResourceNotFound(CASE_NOT_FOUND.to_string()).into()
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
        .case_find_page(params.keyword.trim(), params.page_no(), params.page_size())
        .await?;

    Ok(response::Result::<Page<CaseInfo>>::http_success(result))
}

#[get("/{id}")]
async fn find_one(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let case = data
        .persistence()
        .case_find_by_id(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<CaseInfo>::http_success(case))
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CaseParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let param = validated(body.into_inner())?;

    let id = data.persistence().case_create(param.into()).await?;

    tracing::info!(id, admin = %admin.username, "case created");

    Ok(response::Result::<CreatedResult>::http_success(
        CreatedResult { id },
    ))
}

#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<CaseParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let param = validated(body.into_inner())?;
    let id = path.into_inner();

    if !data.persistence().case_update(id, param.into()).await? {
        return Err(not_found());
    }

    let case = data
        .persistence()
        .case_find_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<CaseInfo>::http_success(case))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let id = path.into_inner();

    if !data.persistence().case_delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(id, admin = %admin.username, "case deleted");

    Ok(response::Result::<()>::http_success(()))
}

pub fn routes() -> Scope {
    web::scope("/api/cases")
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
    fn test_case_param_requires_photos() {
        let param: CaseParam =
            serde_json::from_str(r#"{"title": "Ann", "professionalPhoto": "/a.jpg"}"#).unwrap();
        assert!(param.validate().is_err());

        let param: CaseParam = serde_json::from_str(
            r#"{"title": "  ", "professionalPhoto": "/a.jpg", "childPhoto": "/b.jpg"}"#,
        )
        .unwrap();
        assert!(param.validate().is_err());
    }

    #[test]
    fn test_case_param_into_draft() {
        let param: CaseParam = serde_json::from_str(
            r#"{"title": " Ann ", "professionalPhoto": "/a.jpg", "childPhoto": "/b.jpg", "featured": true}"#,
        )
        .unwrap();
        assert!(param.validate().is_ok());

        let draft = CaseDraft::from(param);
        assert_eq!(draft.title, "Ann");
        assert_eq!(draft.title_en, "");
        assert_eq!(draft.introduction, "");
        assert!(draft.featured);
    }
}
