//! MPEA Persistence - Database entities and persistence layer
//!
//! This crate provides:
//! - SeaORM entity definitions
//! - Persistence trait abstractions for unified storage
//! - Domain model types for persistence operations
//! - SQL and in-memory backends

pub mod entity;
pub mod memory;
pub mod model;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export entity prelude
pub use entity::prelude::*;

// Re-export persistence traits
pub use traits::{
    AdminPersistence, BoardChairPersistence, CasePersistence, CertificatePersistence,
    ContactPersistence, EventPersistence, KindergartenPersistence, LecturerPersistence,
    NewsPersistence, PagePersistence, PartnerPersistence, PersistenceService,
    TranslationPersistence,
};

// Re-export backends
pub use memory::MemoryPersistService;
pub use sql::ExternalDbPersistService;

// Re-export model types
pub use model::{
    AdminInfo, BoardChairDraft, BoardChairInfo, CaseDraft, CaseInfo, CertificateDraft,
    CertificateInfo, ContactMessageInfo, ContactQuery, ContentDraft, ContentPatch, EventDraft,
    EventInfo, KindergartenDraft, KindergartenInfo, LecturerDraft, LecturerInfo, LocaleValues,
    NewContactMessage, NewTranslation, NewsInfo, Page, PageInfo, PartnerDraft, PartnerInfo,
    StorageMode, TranslationEntry, TranslationPatch, decode_locale_values, encode_locale_values,
    normalize_locale_values,
};

/// Conflict messages for the unique columns
pub const KEY_CONFLICT: &str = "key already exists";
pub const PATH_CONFLICT: &str = "path already exists";
pub const SLUG_CONFLICT: &str = "slug already exists";
pub const CERTIFICATE_NO_CONFLICT: &str = "certificate number already exists";
