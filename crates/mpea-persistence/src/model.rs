//! Domain model types for the persistence abstraction layer
//!
//! These types are used as arguments and return values of the persistence
//! traits, decoupled from specific storage backends.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mpea_common::{EnableStatus, PublishStatus};

use crate::entity::{
    admins, board_chair, cases, certificates, contact_messages, events, kindergartens, lecturers,
    news, pages, partners, translations,
};

/// Locale code -> translated string
pub type LocaleValues = BTreeMap<String, String>;

/// Coerce an arbitrary JSON object into locale values.
///
/// Null entries are dropped, strings are kept as-is and every other value is
/// stored in its JSON text form.
pub fn normalize_locale_values(raw: &Map<String, Value>) -> LocaleValues {
    raw.iter()
        .filter_map(|(locale, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((locale.clone(), s.clone())),
            other => Some((locale.clone(), other.to_string())),
        })
        .collect()
}

/// Decode stored locale values; malformed text yields an empty map.
pub fn decode_locale_values(raw: &str) -> LocaleValues {
    if raw.trim().is_empty() {
        return LocaleValues::new();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => normalize_locale_values(&map),
        Ok(other) => {
            tracing::info!(kind = json_kind(&other), "stored locale values are not an object");
            LocaleValues::new()
        }
        Err(e) => {
            tracing::info!(error = %e, "failed to parse stored locale values");
            LocaleValues::new()
        }
    }
}

pub fn encode_locale_values(values: &LocaleValues) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "{}".to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Translations
// ============================================================================

/// A stored translation entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    pub id: i32,
    pub namespace: String,
    pub full_key: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
    pub values: LocaleValues,
    pub updated_by: Option<String>,
    pub updated_by_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<translations::Model> for TranslationEntry {
    fn from(m: translations::Model) -> Self {
        Self {
            values: decode_locale_values(&m.locale_values),
            id: m.id,
            namespace: m.namespace,
            full_key: m.full_key,
            label: m.label,
            description: m.description,
            sort_order: m.sort_order,
            updated_by: m.updated_by,
            updated_by_id: m.updated_by_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Fields of a translation entry to insert
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewTranslation {
    pub namespace: String,
    pub full_key: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
    pub values: LocaleValues,
    pub updated_by: Option<String>,
    pub updated_by_id: Option<i32>,
}

/// Partial update of a translation entry.
///
/// `None` leaves a column untouched; `Some(None)` clears a nullable column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranslationPatch {
    pub full_key: Option<String>,
    pub namespace: Option<String>,
    pub label: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub values: Option<LocaleValues>,
    pub updated_by: Option<Option<String>>,
    pub updated_by_id: Option<Option<i32>>,
}

// ============================================================================
// Admins
// ============================================================================

/// Administrator account
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfo {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created_at: NaiveDateTime,
}

impl From<admins::Model> for AdminInfo {
    fn from(m: admins::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            password: m.password,
            created_at: m.created_at,
        }
    }
}

// ============================================================================
// Site pages and news
// ============================================================================

/// A CMS page addressed by its site path
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub id: i32,
    pub title: String,
    pub path: String,
    pub content: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<pages::Model> for PageInfo {
    fn from(m: pages::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            path: m.path,
            content: m.content,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// A news article addressed by its slug
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsInfo {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<news::Model> for NewsInfo {
    fn from(m: news::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            content: m.content,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Content shared by pages (`address` = path) and news (`address` = slug)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentDraft {
    pub title: String,
    pub address: String,
    pub content: String,
    pub status: PublishStatus,
}

/// Partial update of a page or news article
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentPatch {
    pub title: Option<String>,
    pub address: Option<String>,
    pub content: Option<String>,
    pub status: Option<PublishStatus>,
}

// ============================================================================
// Contact messages
// ============================================================================

/// A contact form submission
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageInfo {
    pub id: i32,
    #[serde(rename = "type")]
    pub message_type: String,
    pub child_age: Option<i32>,
    pub interest: Option<String>,
    pub company: Option<String>,
    pub org_type: Option<String>,
    pub phone: String,
    pub intention: Option<String>,
    pub problem: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<contact_messages::Model> for ContactMessageInfo {
    fn from(m: contact_messages::Model) -> Self {
        Self {
            id: m.id,
            message_type: m.message_type,
            child_age: m.child_age,
            interest: m.interest,
            company: m.company,
            org_type: m.org_type,
            phone: m.phone,
            intention: m.intention,
            problem: m.problem,
            ip: m.ip,
            user_agent: m.user_agent,
            status: mpea_common::ContactStatus::parse_lenient(&m.status)
                .as_str()
                .to_string(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Fields of a contact message to insert
#[derive(Clone, Debug, PartialEq)]
pub struct NewContactMessage {
    pub message_type: mpea_common::ContactType,
    pub child_age: Option<i32>,
    pub interest: Option<String>,
    pub company: Option<String>,
    pub org_type: Option<String>,
    pub phone: String,
    pub intention: Option<String>,
    pub problem: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Filters for listing contact messages
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactQuery {
    pub message_type: Option<mpea_common::ContactType>,
    pub status: Option<mpea_common::ContactStatus>,
    /// Matched against phone, company and interest
    pub keyword: String,
}

// ============================================================================
// Catalog: cases, lecturers, partners, kindergartens, events, board chair
// and certificates. Updates replace every editable column.
// ============================================================================

/// A parenting case study with its before/after photos
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseInfo {
    pub id: i32,
    pub title: String,
    pub title_en: String,
    pub professional_photo: String,
    pub child_photo: String,
    pub introduction: String,
    pub introduction_en: String,
    pub featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<cases::Model> for CaseInfo {
    fn from(m: cases::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            title_en: m.title_en,
            professional_photo: m.professional_photo,
            child_photo: m.child_photo,
            introduction: m.introduction,
            introduction_en: m.introduction_en,
            featured: m.featured,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaseDraft {
    pub title: String,
    pub title_en: String,
    pub professional_photo: String,
    pub child_photo: String,
    pub introduction: String,
    pub introduction_en: String,
    pub featured: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerInfo {
    pub id: i32,
    pub name: String,
    pub name_en: String,
    pub photo: String,
    pub introduction: String,
    pub introduction_en: String,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<lecturers::Model> for LecturerInfo {
    fn from(m: lecturers::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            name_en: m.name_en,
            photo: m.photo,
            introduction: m.introduction,
            introduction_en: m.introduction_en,
            sort_order: m.sort_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LecturerDraft {
    pub name: String,
    pub name_en: String,
    pub photo: String,
    pub introduction: String,
    pub introduction_en: String,
    pub sort_order: i32,
}

/// A partner logo, optionally linking to the partner's site
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerInfo {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub link: Option<String>,
    pub sort_order: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<partners::Model> for PartnerInfo {
    fn from(m: partners::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            image: m.image,
            link: m.link,
            sort_order: m.sort_order,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartnerDraft {
    pub title: String,
    pub image: String,
    pub link: Option<String>,
    pub sort_order: i32,
    pub status: EnableStatus,
}

/// A recommended kindergarten
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindergartenInfo {
    pub id: i32,
    pub name: String,
    pub name_en: String,
    pub address: String,
    pub address_en: String,
    pub logo: String,
    pub sort_order: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<kindergartens::Model> for KindergartenInfo {
    fn from(m: kindergartens::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            name_en: m.name_en,
            address: m.address,
            address_en: m.address_en,
            logo: m.logo,
            sort_order: m.sort_order,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KindergartenDraft {
    pub name: String,
    pub name_en: String,
    pub address: String,
    pub address_en: String,
    pub logo: String,
    pub sort_order: i32,
    pub status: EnableStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub id: i32,
    pub title: String,
    pub title_en: String,
    pub cover: String,
    pub event_date: NaiveDateTime,
    pub content: String,
    pub content_en: String,
    pub status: String,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<events::Model> for EventInfo {
    fn from(m: events::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            title_en: m.title_en,
            cover: m.cover,
            event_date: m.event_date,
            content: m.content,
            content_en: m.content_en,
            status: m.status,
            sort_order: m.sort_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub title_en: String,
    pub cover: String,
    pub event_date: NaiveDateTime,
    pub content: String,
    pub content_en: String,
    pub status: PublishStatus,
    pub sort_order: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardChairInfo {
    pub id: i32,
    pub name: String,
    pub name_en: String,
    pub position: String,
    pub position_en: String,
    pub avatar: String,
    pub sort_order: i32,
    pub introduction: String,
    pub introduction_en: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<board_chair::Model> for BoardChairInfo {
    fn from(m: board_chair::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            name_en: m.name_en,
            position: m.position,
            position_en: m.position_en,
            avatar: m.avatar,
            sort_order: m.sort_order,
            introduction: m.introduction,
            introduction_en: m.introduction_en,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardChairDraft {
    pub name: String,
    pub name_en: String,
    pub position: String,
    pub position_en: String,
    pub avatar: String,
    pub sort_order: i32,
    pub introduction: String,
    pub introduction_en: String,
}

/// A training certificate, looked up publicly by holder name and number
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfo {
    pub id: i32,
    pub certificate_no: String,
    pub name: String,
    pub cert_date: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<certificates::Model> for CertificateInfo {
    fn from(m: certificates::Model) -> Self {
        Self {
            id: m.id,
            certificate_no: m.certificate_no,
            name: m.name,
            cert_date: m.cert_date,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// `status = None` keeps the stored status on update and means enabled on insert
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CertificateDraft {
    pub certificate_no: String,
    pub name: String,
    pub cert_date: String,
    pub status: Option<EnableStatus>,
}

// ============================================================================
// Shared
// ============================================================================

/// Generic paginated result
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_count: u64,
    pub page_number: u64,
    pub pages_available: u64,
    pub page_items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(total_count: u64, page_number: u64, page_size: u64, page_items: Vec<T>) -> Self {
        Self {
            total_count,
            page_number,
            pages_available: if page_size > 0 {
                total_count.div_ceil(page_size)
            } else {
                0
            },
            page_items,
        }
    }

    pub fn empty() -> Self {
        Self {
            total_count: 0,
            page_number: 0,
            pages_available: 0,
            page_items: Vec::new(),
        }
    }
}

/// Slice one page out of an already filtered and ordered list.
pub(crate) fn paginate<T>(items: Vec<T>, page_no: u64, page_size: u64) -> Page<T> {
    let total_count = items.len() as u64;
    if total_count == 0 {
        return Page::empty();
    }

    let offset = page_no.saturating_sub(1).saturating_mul(page_size) as usize;
    let page_items = items
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();

    Page::new(total_count, page_no, page_size, page_items)
}

/// Storage mode for the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageMode {
    /// External database (MySQL/PostgreSQL via SeaORM)
    ExternalDb,
    /// In-process tables, lost on restart
    Memory,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::ExternalDb => write!(f, "external_db"),
            StorageMode::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "external_db" => Ok(StorageMode::ExternalDb),
            "memory" => Ok(StorageMode::Memory),
            _ => Err(format!("Invalid storage mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_drops_null_and_stringifies() {
        let raw = json!({"zh": "你好", "en": null, "num": 5, "flag": true});
        let values = normalize_locale_values(raw.as_object().unwrap());

        assert_eq!(values.get("zh").map(String::as_str), Some("你好"));
        assert!(!values.contains_key("en"));
        assert_eq!(values.get("num").map(String::as_str), Some("5"));
        assert_eq!(values.get("flag").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_decode_malformed_is_empty() {
        assert!(decode_locale_values("{not json").is_empty());
        assert!(decode_locale_values("[1,2]").is_empty());
        assert!(decode_locale_values("").is_empty());
        assert!(decode_locale_values("\"text\"").is_empty());
    }

    #[test]
    fn test_encode_decode_values() {
        let mut values = LocaleValues::new();
        values.insert("en".to_string(), "Home".to_string());
        values.insert("zh".to_string(), "首页".to_string());

        let raw = encode_locale_values(&values);
        assert_eq!(decode_locale_values(&raw), values);
    }

    #[test]
    fn test_page_new() {
        let page = Page::new(21, 1, 10, vec![1, 2, 3]);
        assert_eq!(page.pages_available, 3);

        let page: Page<i32> = Page::new(5, 1, 0, vec![]);
        assert_eq!(page.pages_available, 0);
    }

    #[test]
    fn test_paginate() {
        let page = paginate((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.page_items, vec![21, 22, 23, 24, 25]);

        let page = paginate(Vec::<i32>::new(), 1, 10);
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn test_contact_unknown_status_reads_as_new() {
        let now = chrono::Utc::now().naive_utc();
        let model = contact_messages::Model {
            id: 1,
            message_type: "business".to_string(),
            child_age: None,
            interest: None,
            company: Some("Acme".to_string()),
            org_type: None,
            phone: "010-1234".to_string(),
            intention: None,
            problem: None,
            ip: None,
            user_agent: None,
            status: "archived".to_string(),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(ContactMessageInfo::from(model).status, "new");
    }

    #[test]
    fn test_storage_mode_parse() {
        assert_eq!("memory".parse::<StorageMode>(), Ok(StorageMode::Memory));
        assert_eq!(StorageMode::ExternalDb.to_string(), "external_db");
        assert!("rocksdb".parse::<StorageMode>().is_err());
    }
}
