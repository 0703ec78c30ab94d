//! Site page and news persistence traits
//!
//! Both share the `ContentDraft`/`ContentPatch` shapes; the unique address is
//! a page's path or a news article's slug.

use async_trait::async_trait;
use mpea_common::PublishStatus;

use crate::model::{ContentDraft, ContentPatch, NewsInfo, Page, PageInfo};

#[async_trait]
pub trait PagePersistence: Send + Sync {
    /// List pages, newest first; `status = None` lists every status
    async fn page_find_page(
        &self,
        status: Option<PublishStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<PageInfo>>;

    async fn page_find_by_id(&self, id: i32) -> anyhow::Result<Option<PageInfo>>;

    async fn page_create(&self, draft: ContentDraft) -> anyhow::Result<i32>;

    async fn page_update(&self, id: i32, patch: ContentPatch) -> anyhow::Result<bool>;

    async fn page_delete(&self, id: i32) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait NewsPersistence: Send + Sync {
    /// List news, newest first; `status = None` lists every status
    async fn news_find_page(
        &self,
        status: Option<PublishStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<NewsInfo>>;

    async fn news_find_by_id(&self, id: i32) -> anyhow::Result<Option<NewsInfo>>;

    async fn news_find_by_slug(&self, slug: &str) -> anyhow::Result<Option<NewsInfo>>;

    async fn news_create(&self, draft: ContentDraft) -> anyhow::Result<i32>;

    async fn news_update(&self, id: i32, patch: ContentPatch) -> anyhow::Result<bool>;

    async fn news_delete(&self, id: i32) -> anyhow::Result<bool>;
}
