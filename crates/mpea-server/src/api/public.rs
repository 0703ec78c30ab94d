//! Public read-only API and contact form submissions
//!
//! No authentication. Content endpoints only ever expose published items;
//! the contact endpoints answer with messages localized by [`MessageLang`].

use actix_web::{HttpRequest, HttpResponse, Scope, get, http::header::USER_AGENT, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use mpea_common::{
    CmsError, ContactType, DEFAULT_PAGE_NO, EnableStatus, PublishStatus, non_blank,
    truncate_chars,
};
use mpea_i18n::{normalize_locale, service};
use mpea_persistence::{
    BoardChairInfo, BoardChairPersistence, CaseInfo, CasePersistence, CertificateInfo,
    CertificatePersistence, ContactPersistence, EventInfo, EventPersistence, KindergartenInfo,
    KindergartenPersistence, LecturerInfo, LecturerPersistence, NewContactMessage, NewsInfo,
    NewsPersistence, Page, PageInfo, PagePersistence, PartnerInfo, PartnerPersistence,
};

use super::model::{
    ListQuery, MessageLang, client_ip, deserialize_lenient_int, not_blank, validated,
};
use crate::{
    error::{AppError, PARAMETER_VALIDATE_ERROR, SERVER_ERROR, TOO_MANY_REQUESTS},
    model::{app_state::AppState, response},
};

const USER_AGENT_MAX_CHARS: usize = 255;

const PARTNER_PAGE_SIZE: u64 = 100;
const KINDERGARTEN_LIMIT: u64 = 12;
const EVENT_LIMIT: u64 = 6;

const CERTIFICATE_NO_PREFIX: &str = "No.";
const CERTIFICATE_NOT_FOUND: &str = "未查询到该证书";

/// Assembled translations plus the locale actually served
#[derive(Debug, Serialize)]
struct LocaleBundle {
    #[serde(flatten)]
    result: response::Result<Value>,
    locale: String,
}

#[derive(Debug, Default, Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
struct LimitQuery {
    #[validate(range(min = 1, max = 100, message = "must be within 1-100"))]
    limit: Option<u64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CertificateQuery {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    certificate_no: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ParentingParam {
    #[serde(default, deserialize_with = "deserialize_lenient_int")]
    #[validate(range(min = 0, max = 30, message = "must be within 0-30"))]
    child_age: Option<i32>,
    #[validate(length(max = 255, message = "is too long"))]
    interest: Option<String>,
    /// Phone or other contact handle
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    contact: String,
    #[validate(length(max = 5000, message = "is too long"))]
    problem: Option<String>,
    lang: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct BusinessParam {
    #[validate(length(max = 255, message = "is too long"))]
    company: Option<String>,
    #[validate(length(max = 255, message = "is too long"))]
    org_type: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    phone: String,
    #[validate(length(max = 5000, message = "is too long"))]
    intention: Option<String>,
    lang: Option<String>,
}

#[get("/i18n/{locale}")]
async fn i18n(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let locale = normalize_locale(&path.into_inner(), data.locales());

    let tree = service::export_locale(data.persistence(), &locale).await?;

    Ok(HttpResponse::Ok().json(LocaleBundle {
        result: response::Result::success(tree),
        locale,
    }))
}

#[get("/pages")]
async fn pages(
    data: web::Data<AppState>,
    params: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let params = validated(params.into_inner())?;

    let result = data
        .persistence()
        .page_find_page(
            Some(PublishStatus::Published),
            params.keyword.trim(),
            params.page_no(),
            params.page_size(),
        )
        .await?;

    Ok(response::Result::<Page<PageInfo>>::http_success(result))
}

#[get("/pages/{id}")]
async fn page(data: web::Data<AppState>, path: web::Path<i32>) -> Result<HttpResponse, AppError> {
    let page = data
        .persistence()
        .page_find_by_id(path.into_inner())
        .await?
        .filter(|p| p.status == PublishStatus::Published.as_str())
        .ok_or_else(|| CmsError::ResourceNotFound("page not found".to_string()))?;

    Ok(response::Result::<PageInfo>::http_success(page))
}

#[get("/news")]
async fn news_list(
    data: web::Data<AppState>,
    params: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let params = validated(params.into_inner())?;

    let result = data
        .persistence()
        .news_find_page(
            Some(PublishStatus::Published),
            params.keyword.trim(),
            params.page_no(),
            params.page_size(),
        )
        .await?;

    Ok(response::Result::<Page<NewsInfo>>::http_success(result))
}

#[get("/news/by-slug/{slug}")]
async fn news_by_slug(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let news = data
        .persistence()
        .news_find_by_slug(path.trim())
        .await?
        .filter(|n| n.status == PublishStatus::Published.as_str())
        .ok_or_else(|| CmsError::ResourceNotFound("news not found".to_string()))?;

    Ok(response::Result::<NewsInfo>::http_success(news))
}

#[get("/cases")]
async fn cases(
    data: web::Data<AppState>,
    params: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let params = validated(params.into_inner())?;

    let result = data
        .persistence()
        .case_find_page(params.keyword.trim(), params.page_no(), params.page_size())
        .await?;

    Ok(response::Result::<Page<CaseInfo>>::http_success(result))
}

#[get("/lecturers")]
async fn lecturers(
    data: web::Data<AppState>,
    params: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let params = validated(params.into_inner())?;

    let result = data
        .persistence()
        .lecturer_find_page(params.keyword.trim(), params.page_no(), params.page_size())
        .await?;

    Ok(response::Result::<Page<LecturerInfo>>::http_success(result))
}

/// Enabled partners only; one page of 100 by default.
#[get("/partners")]
async fn partners(
    data: web::Data<AppState>,
    params: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let params = validated(params.into_inner())?;

    let result = data
        .persistence()
        .partner_find_page(
            Some(EnableStatus::Enabled),
            "",
            params.page.unwrap_or(DEFAULT_PAGE_NO),
            params.limit.unwrap_or(PARTNER_PAGE_SIZE),
        )
        .await?;

    Ok(response::Result::<Page<PartnerInfo>>::http_success(result))
}

#[get("/kindergartens")]
async fn kindergartens(
    data: web::Data<AppState>,
    params: web::Query<LimitQuery>,
) -> Result<HttpResponse, AppError> {
    let params = validated(params.into_inner())?;

    let items = data
        .persistence()
        .kindergarten_list_enabled(params.limit.unwrap_or(KINDERGARTEN_LIMIT))
        .await?;

    Ok(response::Result::<Vec<KindergartenInfo>>::http_success(
        items,
    ))
}

#[get("/board-chair")]
async fn board_chair(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let items = data.persistence().board_chair_list().await?;

    Ok(response::Result::<Vec<BoardChairInfo>>::http_success(items))
}

/// Latest published events first.
#[get("/events")]
async fn events(
    data: web::Data<AppState>,
    params: web::Query<LimitQuery>,
) -> Result<HttpResponse, AppError> {
    let params = validated(params.into_inner())?;

    let items = data
        .persistence()
        .event_list_published(params.limit.unwrap_or(EVENT_LIMIT))
        .await?;

    Ok(response::Result::<Vec<EventInfo>>::http_success(items))
}

#[get("/events/{id}")]
async fn event(data: web::Data<AppState>, path: web::Path<i32>) -> Result<HttpResponse, AppError> {
    let event = data
        .persistence()
        .event_find_by_id(path.into_inner())
        .await?
        .filter(|e| e.status == PublishStatus::Published.as_str())
        .ok_or_else(|| CmsError::ResourceNotFound("event not found".to_string()))?;

    Ok(response::Result::<EventInfo>::http_success(event))
}

/// Certificate numbers to try, in order: the input as typed, then with the
/// `No.` prefix when the input lacks it.
fn certificate_no_candidates(input: &str) -> Vec<String> {
    let input = input.trim();
    let prefixed = input
        .get(..CERTIFICATE_NO_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(CERTIFICATE_NO_PREFIX));

    if prefixed {
        vec![input.to_string()]
    } else {
        vec![input.to_string(), format!("{}{}", CERTIFICATE_NO_PREFIX, input)]
    }
}

/// Holder name plus certificate number lookup over enabled certificates.
/// A miss is still a success, with `data: null`.
#[get("/certificates/search")]
async fn certificate_search(
    data: web::Data<AppState>,
    params: web::Query<CertificateQuery>,
) -> Result<HttpResponse, AppError> {
    let params = validated(params.into_inner())?;
    let name = params.name.trim();

    for certificate_no in certificate_no_candidates(&params.certificate_no) {
        if let Some(certificate) = data
            .persistence()
            .certificate_find_enabled(name, &certificate_no)
            .await?
        {
            return Ok(response::Result::<CertificateInfo>::http_success(
                certificate,
            ));
        }
    }

    Ok(
        response::Result::<Option<CertificateInfo>>::http_success_with_message(
            CERTIFICATE_NOT_FOUND.to_string(),
            None::<CertificateInfo>,
        ),
    )
}

/// Validate, rate limit and store one submission, answering in `lang`.
async fn submit_contact(
    req: &HttpRequest,
    data: &AppState,
    lang: MessageLang,
    valid: bool,
    build: impl FnOnce(String, String) -> NewContactMessage,
) -> HttpResponse {
    if !valid {
        return response::Result::<()>::http_response(
            400,
            PARAMETER_VALIDATE_ERROR.code,
            lang.pick("参数错误", "Invalid parameters").to_string(),
            (),
        );
    }

    let ip = client_ip(req);
    if !data.contact_limiter.try_acquire(&ip) {
        tracing::debug!(client_ip = %ip, "contact submission rate limited");
        return response::Result::<()>::http_response(
            429,
            TOO_MANY_REQUESTS.code,
            lang.pick(
                "提交过于频繁，请稍后再试",
                "Too many requests, please try again later",
            )
            .to_string(),
            (),
        );
    }

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| truncate_chars(v, USER_AGENT_MAX_CHARS))
        .unwrap_or_default();

    let message = build(ip, user_agent);
    let message_type = message.message_type;

    match data.persistence().contact_create(message).await {
        Ok(id) => {
            tracing::info!(id, message_type = %message_type, "contact message received");
            response::Result::<()>::http_success_with_message(
                lang.pick("提交成功", "Submitted successfully").to_string(),
                (),
            )
        }
        Err(e) => {
            tracing::error!(error = ?e, message_type = %message_type, "failed to store contact message");
            response::Result::<()>::http_response(
                500,
                SERVER_ERROR.code,
                lang.pick("提交失败", "Submission failed").to_string(),
                (),
            )
        }
    }
}

#[post("/contact/parenting")]
async fn contact_parenting(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<LangQuery>,
    body: web::Json<ParentingParam>,
) -> HttpResponse {
    let param = body.into_inner();
    let explicit = query.lang.as_deref().or(param.lang.as_deref());
    let lang = MessageLang::from_request(&req, explicit);
    let valid = !param.contact.trim().is_empty() && param.validate().is_ok();

    submit_contact(&req, &data, lang, valid, |ip, user_agent| NewContactMessage {
        message_type: ContactType::Parenting,
        child_age: param.child_age,
        interest: non_blank(param.interest),
        company: None,
        org_type: None,
        phone: param.contact.trim().to_string(),
        intention: None,
        problem: non_blank(param.problem),
        ip: non_blank(Some(ip)),
        user_agent: non_blank(Some(user_agent)),
    })
    .await
}

#[post("/contact/business")]
async fn contact_business(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<LangQuery>,
    body: web::Json<BusinessParam>,
) -> HttpResponse {
    let param = body.into_inner();
    let explicit = query.lang.as_deref().or(param.lang.as_deref());
    let lang = MessageLang::from_request(&req, explicit);
    let valid = !param.phone.trim().is_empty() && param.validate().is_ok();

    submit_contact(&req, &data, lang, valid, |ip, user_agent| NewContactMessage {
        message_type: ContactType::Business,
        child_age: None,
        interest: None,
        company: non_blank(param.company),
        org_type: non_blank(param.org_type),
        phone: param.phone.trim().to_string(),
        intention: non_blank(param.intention),
        problem: None,
        ip: non_blank(Some(ip)),
        user_agent: non_blank(Some(user_agent)),
    })
    .await
}

pub fn routes() -> Scope {
    web::scope("/api/public")
        .service(i18n)
        .service(pages)
        .service(page)
        .service(news_list)
        .service(news_by_slug)
        .service(cases)
        .service(lecturers)
        .service(partners)
        .service(kindergartens)
        .service(board_chair)
        .service(events)
        .service(event)
        .service(certificate_search)
        .service(contact_parenting)
        .service(contact_business)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenting_param_validation() {
        let param: ParentingParam =
            serde_json::from_str(r#"{"childAge": 31, "contact": "13800000000"}"#).unwrap();
        assert!(param.validate().is_err());

        let param: ParentingParam =
            serde_json::from_str(r#"{"childAge": 6, "contact": "13800000000", "lang": "en"}"#)
                .unwrap();
        assert!(param.validate().is_ok());
        assert_eq!(param.lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_parenting_child_age_accepts_numeric_text() {
        let param: ParentingParam =
            serde_json::from_str(r#"{"childAge": " 6 ", "contact": "13800000000"}"#).unwrap();
        assert_eq!(param.child_age, Some(6));
        assert!(param.validate().is_ok());

        let param: ParentingParam =
            serde_json::from_str(r#"{"childAge": "31", "contact": "13800000000"}"#).unwrap();
        assert!(param.validate().is_err());

        let param: ParentingParam =
            serde_json::from_str(r#"{"childAge": "", "contact": "13800000000"}"#).unwrap();
        assert_eq!(param.child_age, None);

        let param: ParentingParam = serde_json::from_str(r#"{"contact": "13800000000"}"#).unwrap();
        assert_eq!(param.child_age, None);

        assert!(
            serde_json::from_str::<ParentingParam>(r#"{"childAge": "six", "contact": "1"}"#)
                .is_err()
        );
    }

    #[test]
    fn test_certificate_no_candidates() {
        assert_eq!(certificate_no_candidates(" 2024001 "), vec!["2024001", "No.2024001"]);
        assert_eq!(certificate_no_candidates("No.2024001"), vec!["No.2024001"]);
        assert_eq!(certificate_no_candidates("no.2024001"), vec!["no.2024001"]);
        assert_eq!(certificate_no_candidates("证书"), vec!["证书", "No.证书"]);
    }

    #[test]
    fn test_certificate_query_requires_both_fields() {
        let query: CertificateQuery = serde_json::from_str(r#"{"name": "Li Lei"}"#).unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_business_param_requires_phone() {
        let param: BusinessParam = serde_json::from_str(r#"{"company": "Acme"}"#).unwrap();
        assert!(param.validate().is_err());
    }

    #[test]
    fn test_locale_bundle_shape() {
        let bundle = LocaleBundle {
            result: response::Result::success(serde_json::json!({"a": "1"})),
            locale: "en".to_string(),
        };
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"]["a"], "1");
        assert_eq!(json["locale"], "en");
    }
}
