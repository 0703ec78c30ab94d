//! Certificate admin API

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use validator::Validate;

use mpea_common::{CmsError, EnableStatus};
use mpea_persistence::{CertificateDraft, CertificateInfo, CertificatePersistence, Page};

use super::{
    model::{IdsParam, ListQuery, not_blank, parse_filter, validated},
    page::CreatedResult,
};
use crate::{
    error::AppError,
    model::{app_state::AppState, response},
    secured::require_admin,
};

const CERTIFICATE_NOT_FOUND: &str = "certificate not found";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CertificateParam {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "must be at most 100 characters")
    )]
    certificate_no: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "must be at most 100 characters")
    )]
    name: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 20, message = "must be at most 20 characters")
    )]
    cert_date: String,
    status: Option<String>,
}

impl CertificateParam {
    fn into_draft(self) -> Result<CertificateDraft, AppError> {
        Ok(CertificateDraft {
            certificate_no: self.certificate_no.trim().to_string(),
            name: self.name.trim().to_string(),
            cert_date: self.cert_date.trim().to_string(),
            status: parse_filter::<EnableStatus>(self.status.as_deref(), "status")?,
        })
    }
}

#[derive(Debug, Serialize)]
struct DeletedResult {
    deleted: u64,
}

fn not_found() -> AppError {
    CmsError::ResourceNotFound(CERTIFICATE_NOT_FOUND.to_string()).into()
}

/// Matches the keyword against certificate number and holder name.
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
        .certificate_find_page(params.keyword.trim(), params.page_no(), params.page_size())
        .await?;

    Ok(response::Result::<Page<CertificateInfo>>::http_success(
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

    let certificate = data
        .persistence()
        .certificate_find_by_id(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<CertificateInfo>::http_success(
        certificate,
    ))
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CertificateParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let draft = validated(body.into_inner())?.into_draft()?;

    let id = data.persistence().certificate_create(draft).await?;

    tracing::info!(id, admin = %admin.username, "certificate created");

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

    let deleted = data
        .persistence()
        .certificate_delete_many(&param.ids)
        .await?;

    tracing::info!(deleted, admin = %admin.username, "certificates deleted");

    Ok(response::Result::<DeletedResult>::http_success(
        DeletedResult { deleted },
    ))
}

/// Status is kept when the body leaves it out.
#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<CertificateParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let draft = validated(body.into_inner())?.into_draft()?;
    let id = path.into_inner();

    if !data.persistence().certificate_update(id, draft).await? {
        return Err(not_found());
    }

    let certificate = data
        .persistence()
        .certificate_find_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(response::Result::<CertificateInfo>::http_success(
        certificate,
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

    if !data.persistence().certificate_delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(id, admin = %admin.username, "certificate deleted");

    Ok(response::Result::<()>::http_success(()))
}

pub fn routes() -> Scope {
    web::scope("/api/certificates")
        .service(search)
        .service(batch_delete)
        .service(find_one)
        .service(create)
        .service(update)
        .service(remove)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_param_keeps_missing_status() {
        let param: CertificateParam = serde_json::from_str(
            r#"{"certificateNo": " No.001 ", "name": "Li Lei", "certDate": "2024-06"}"#,
        )
        .unwrap();
        let draft = validated(param).unwrap().into_draft().unwrap();
        assert_eq!(draft.certificate_no, "No.001");
        assert_eq!(draft.status, None);
    }

    #[test]
    fn test_certificate_param_requires_fields() {
        let param: CertificateParam =
            serde_json::from_str(r#"{"certificateNo": "No.001", "name": "Li Lei"}"#).unwrap();
        assert!(param.validate().is_err());
    }
}
