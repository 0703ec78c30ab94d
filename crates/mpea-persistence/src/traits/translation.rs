//! Translation persistence trait
//!
//! Uniqueness of `full_key` is enforced by the backend: inserts and updates
//! that would duplicate a key fail with `CmsError::ResourceConflict`.

use async_trait::async_trait;

use crate::model::{NewTranslation, Page, TranslationEntry, TranslationPatch};

#[async_trait]
pub trait TranslationPersistence: Send + Sync {
    async fn translation_find_by_id(&self, id: i32) -> anyhow::Result<Option<TranslationEntry>>;

    async fn translation_find_by_full_key(
        &self,
        full_key: &str,
    ) -> anyhow::Result<Option<TranslationEntry>>;

    /// Search entries ordered by namespace, sort order and key.
    ///
    /// An empty `namespace` or `keyword` disables that filter. The keyword is
    /// matched against the key, label and description.
    async fn translation_find_page(
        &self,
        namespace: &str,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<TranslationEntry>>;

    /// Distinct namespaces in ascending order
    async fn translation_namespaces(&self) -> anyhow::Result<Vec<String>>;

    /// All entries ordered by sort order, then key
    async fn translation_list_ordered(&self) -> anyhow::Result<Vec<TranslationEntry>>;

    /// Insert an entry and return its id
    async fn translation_create(&self, entry: NewTranslation) -> anyhow::Result<i32>;

    /// Apply a partial update; returns false if the entry does not exist
    async fn translation_update(&self, id: i32, patch: TranslationPatch) -> anyhow::Result<bool>;

    /// Delete an entry; returns false if the entry does not exist
    async fn translation_delete(&self, id: i32) -> anyhow::Result<bool>;
}
