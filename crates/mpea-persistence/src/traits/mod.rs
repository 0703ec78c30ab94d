//! Persistence traits for the storage abstraction layer
//!
//! These traits abstract over the storage backends: an external database
//! (MySQL/PostgreSQL) and an in-process memory store.

pub mod admin;
pub mod catalog;
pub mod contact;
pub mod content;
pub mod translation;

pub use admin::AdminPersistence;
pub use catalog::{
    BoardChairPersistence, CasePersistence, CertificatePersistence, EventPersistence,
    KindergartenPersistence, LecturerPersistence, PartnerPersistence,
};
pub use contact::ContactPersistence;
pub use content::{NewsPersistence, PagePersistence};
pub use translation::TranslationPersistence;

use async_trait::async_trait;

use crate::model::StorageMode;

/// Unified persistence service trait
///
/// This is the main interface for all storage operations. Handlers hold it as
/// `Arc<dyn PersistenceService>` regardless of the configured backend.
#[async_trait]
pub trait PersistenceService:
    TranslationPersistence
    + AdminPersistence
    + PagePersistence
    + NewsPersistence
    + ContactPersistence
    + CasePersistence
    + LecturerPersistence
    + PartnerPersistence
    + KindergartenPersistence
    + EventPersistence
    + BoardChairPersistence
    + CertificatePersistence
    + Send
    + Sync
{
    /// Get the current storage mode
    fn storage_mode(&self) -> StorageMode;

    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}
