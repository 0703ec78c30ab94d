//! Translation catalog admin API

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use mpea_auth::model::AdminIdentity;
use mpea_common::{DEFAULT_PAGE_NO, DEFAULT_PAGE_SIZE, MAX_TRANSLATION_PAGE_SIZE};
use mpea_i18n::{
    Attribution, CreateTranslation, ImportSummary, TranslationChanges, is_supported_locale,
    normalize_locale, service,
};
use mpea_persistence::{Page, TranslationEntry, normalize_locale_values};

use super::model::validated;
use crate::{
    error::{AppError, IMPORT_DATA_INVALID, UNSUPPORTED_LOCALE},
    model::{app_state::AppState, response},
    secured::require_admin,
};

#[derive(Debug, Default, Deserialize, Validate)]
struct SearchParam {
    #[validate(range(min = 1, message = "must be a positive integer"))]
    page: Option<u64>,
    #[validate(range(min = 1, max = 10000, message = "must be within 1-10000"))]
    limit: Option<u64>,
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    keyword: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateParam {
    #[serde(default)]
    full_key: String,
    label: Option<String>,
    description: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    sort_order: Option<i32>,
    values: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateParam {
    full_key: Option<String>,
    label: Option<String>,
    description: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    sort_order: Option<i32>,
    values: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize, Validate)]
struct ImportParam {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    locale: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Serialize)]
struct MetaResult {
    locales: Vec<String>,
    namespaces: Vec<String>,
}

fn attribution(admin: &AdminIdentity) -> Attribution {
    Attribution {
        updated_by: Some(admin.username.clone()),
        updated_by_id: Some(admin.id),
    }
}

fn unsupported_locale(locales: &[String]) -> HttpResponse {
    response::Result::<()>::http_response(
        400,
        UNSUPPORTED_LOCALE.code,
        format!("locale must be one of: {}", locales.join(", ")),
        (),
    )
}

#[get("/meta")]
async fn find_meta(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let namespaces = service::namespaces(data.persistence()).await?;

    Ok(response::Result::<MetaResult>::http_success(MetaResult {
        locales: data.locales().to_vec(),
        namespaces,
    }))
}

#[get("")]
async fn search(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SearchParam>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let params = validated(params.into_inner())?;

    let page_no = params.page.unwrap_or(DEFAULT_PAGE_NO);
    let page_size = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_TRANSLATION_PAGE_SIZE);

    let result = service::find_page(
        data.persistence(),
        &params.namespace,
        &params.keyword,
        page_no,
        page_size,
    )
    .await?;

    Ok(response::Result::<Page<TranslationEntry>>::http_success(
        result,
    ))
}

#[get("/export/{locale}")]
async fn export(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let requested = path.into_inner();
    if !is_supported_locale(&requested, data.locales()) {
        return Ok(unsupported_locale(data.locales()));
    }
    let locale = normalize_locale(&requested, data.locales());

    let tree = service::export_locale(data.persistence(), &locale).await?;

    Ok(response::Result::<Value>::http_success(tree))
}

#[get("/{id}")]
async fn find_one(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    let entry = service::find_by_id(data.persistence(), path.into_inner()).await?;

    Ok(response::Result::<TranslationEntry>::http_success(entry))
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let param = validated(body.into_inner())?;

    let input = CreateTranslation {
        full_key: param.full_key,
        label: param.label,
        description: param.description,
        sort_order: param.sort_order,
        values: param.values.as_ref().map(normalize_locale_values),
    };

    let entry = service::create(data.persistence(), input, &attribution(&admin)).await?;

    tracing::info!(id = entry.id, full_key = %entry.full_key, admin = %admin.username, "translation created");

    Ok(response::Result::<TranslationEntry>::http_success(entry))
}

#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let param = validated(body.into_inner())?;

    // An empty label or description clears it
    let changes = TranslationChanges {
        full_key: param.full_key,
        label: param.label.map(Some),
        description: param.description.map(Some),
        sort_order: param.sort_order,
        values: param.values.as_ref().map(normalize_locale_values),
    };

    let entry = service::update(
        data.persistence(),
        path.into_inner(),
        changes,
        &attribution(&admin),
    )
    .await?;

    Ok(response::Result::<TranslationEntry>::http_success(entry))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let id = path.into_inner();

    service::delete(data.persistence(), id).await?;

    tracing::info!(id, admin = %admin.username, "translation deleted");

    Ok(response::Result::<()>::http_success(()))
}

#[post("/import")]
async fn import(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<ImportParam>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&req)?;
    let param = validated(body.into_inner())?;

    if !param.data.is_object() {
        return Ok(response::Result::<()>::http_response(
            400,
            IMPORT_DATA_INVALID.code,
            IMPORT_DATA_INVALID.message.to_string(),
            (),
        ));
    }
    if !is_supported_locale(&param.locale, data.locales()) {
        return Ok(unsupported_locale(data.locales()));
    }
    let locale = normalize_locale(&param.locale, data.locales());

    let summary = service::import_locale(
        data.persistence(),
        &locale,
        &param.data,
        &attribution(&admin),
    )
    .await?;

    Ok(response::Result::<ImportSummary>::http_success(summary))
}

pub fn routes() -> Scope {
    // Literal paths before `/{id}`
    web::scope("/api/translations")
        .service(find_meta)
        .service(search)
        .service(import)
        .service(export)
        .service(find_one)
        .service(create)
        .service(update)
        .service(remove)
}
