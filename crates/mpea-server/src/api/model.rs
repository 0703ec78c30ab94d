//! Request models and helpers shared by the API handlers

use actix_web::HttpRequest;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use mpea_common::{CmsError, DEFAULT_PAGE_NO, MAX_PAGE_SIZE};

use crate::{
    error::{AppError, validation_error},
    model::constants::{ACCEPT_LANGUAGE, X_FORWARDED_FOR},
};

/// Default page size of page, news and contact-message lists
pub const DEFAULT_LIST_PAGE_SIZE: u64 = 10;

/// Run the `validator` rules of `value`, mapping failures to a 400.
pub fn validated<T: Validate>(value: T) -> Result<T, AppError> {
    value.validate().map_err(validation_error)?;
    Ok(value)
}

/// Paging and keyword parameters of the list endpoints
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100, message = "must be within 1-100"))]
    pub limit: Option<u64>,
    #[serde(default)]
    pub keyword: String,
}

impl ListQuery {
    pub fn page_no(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE_NO)
    }

    pub fn page_size(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Ids of a batch delete
#[derive(Debug, Deserialize, Validate)]
pub struct IdsParam {
    #[serde(default)]
    #[validate(length(min = 1, message = "must be a non-empty array"))]
    pub ids: Vec<i32>,
}

/// `validator` rule rejecting whitespace-only text.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Parse a non-empty filter value, rejecting unknown ones.
pub fn parse_filter<T: std::str::FromStr>(
    value: Option<&str>,
    name: &str,
) -> Result<Option<T>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| CmsError::IllegalArgument(format!("{} is invalid", name)).into()),
        None => Ok(None),
    }
}

/// Optional integer sent either as a JSON number or as numeric text.
/// Blank text reads as absent. Use with `#[serde(default)]`.
pub fn deserialize_lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntPayload {
        Int(i32),
        Text(String),
    }

    match Option::<IntPayload>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntPayload::Int(v)) => Ok(Some(v)),
        Some(IntPayload::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse().map(Some).map_err(serde::de::Error::custom)
        }
    }
}

/// Client address: first `X-Forwarded-For` hop, else the peer address.
pub fn client_ip(req: &HttpRequest) -> String {
    let forwarded = req
        .headers()
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match forwarded {
        Some(ip) => ip.to_string(),
        None => req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_default(),
    }
}

/// Language of the public messages: `lang` query parameter, then
/// `Accept-Language`, then Chinese.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLang {
    Zh,
    En,
}

impl MessageLang {
    pub fn from_request(req: &HttpRequest, explicit: Option<&str>) -> Self {
        let lang = explicit
            .filter(|v| !v.is_empty())
            .or_else(|| {
                req.headers()
                    .get(ACCEPT_LANGUAGE)
                    .and_then(|v| v.to_str().ok())
            })
            .unwrap_or_default()
            .to_lowercase();

        if lang.starts_with("en") {
            MessageLang::En
        } else {
            MessageLang::Zh
        }
    }

    pub fn pick(self, zh: &'static str, en: &'static str) -> &'static str {
        match self {
            MessageLang::Zh => zh,
            MessageLang::En => en,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.page_no(), 1);
        assert_eq!(query.page_size(), 10);
        assert!(validated(query).is_ok());
    }

    #[test]
    fn test_list_query_validation() {
        let query = ListQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(validated(query).is_err());

        let query = ListQuery {
            limit: Some(101),
            ..Default::default()
        };
        assert!(validated(query).is_err());
    }

    #[test]
    fn test_ids_param_requires_ids() {
        let param: IdsParam = serde_json::from_str(r#"{"ids": []}"#).unwrap();
        assert!(validated(param).is_err());

        let param: IdsParam = serde_json::from_str("{}").unwrap();
        assert!(validated(param).is_err());

        let param: IdsParam = serde_json::from_str(r#"{"ids": [3, 5]}"#).unwrap();
        assert_eq!(validated(param).unwrap().ids, vec![3, 5]);
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("a").is_ok());
        assert!(not_blank(" \t").is_err());
    }

    #[test]
    fn test_client_ip() {
        let req = TestRequest::default()
            .insert_header((X_FORWARDED_FOR, " 203.0.113.9 , 10.0.0.1"))
            .to_http_request();
        assert_eq!(client_ip(&req), "203.0.113.9");

        let req = TestRequest::default()
            .peer_addr("192.0.2.1:5000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req), "192.0.2.1");
    }

    #[test]
    fn test_message_lang() {
        let req = TestRequest::default()
            .insert_header((ACCEPT_LANGUAGE, "en-US,en;q=0.9"))
            .to_http_request();
        assert_eq!(MessageLang::from_request(&req, None), MessageLang::En);
        assert_eq!(MessageLang::from_request(&req, Some("zh-CN")), MessageLang::Zh);

        let req = TestRequest::default().to_http_request();
        assert_eq!(MessageLang::from_request(&req, None), MessageLang::Zh);
        assert_eq!(MessageLang::En.pick("中", "en"), "en");
    }
}
