//! Contact message persistence trait

use async_trait::async_trait;
use mpea_common::ContactStatus;

use crate::model::{ContactMessageInfo, ContactQuery, NewContactMessage, Page};

#[async_trait]
pub trait ContactPersistence: Send + Sync {
    /// Store a submission with status `new` and return its id
    async fn contact_create(&self, message: NewContactMessage) -> anyhow::Result<i32>;

    /// List submissions, newest first
    async fn contact_find_page(
        &self,
        query: &ContactQuery,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<ContactMessageInfo>>;

    async fn contact_find_by_id(&self, id: i32) -> anyhow::Result<Option<ContactMessageInfo>>;

    async fn contact_update_status(&self, id: i32, status: ContactStatus) -> anyhow::Result<bool>;

    async fn contact_delete(&self, id: i32) -> anyhow::Result<bool>;
}
