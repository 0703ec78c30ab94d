//! Catalog persistence traits
//!
//! Cases, lecturers, partners, kindergartens, events, board chair members and
//! certificates. `*_update` replaces every editable column and returns `false`
//! when the row does not exist.

use async_trait::async_trait;
use mpea_common::{EnableStatus, PublishStatus};

use crate::model::{
    BoardChairDraft, BoardChairInfo, CaseDraft, CaseInfo, CertificateDraft, CertificateInfo,
    EventDraft, EventInfo, KindergartenDraft, KindergartenInfo, LecturerDraft, LecturerInfo, Page,
    PartnerDraft, PartnerInfo,
};

#[async_trait]
pub trait CasePersistence: Send + Sync {
    /// Newest first; `keyword` matches either title
    async fn case_find_page(
        &self,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<CaseInfo>>;

    async fn case_find_by_id(&self, id: i32) -> anyhow::Result<Option<CaseInfo>>;

    async fn case_create(&self, draft: CaseDraft) -> anyhow::Result<i32>;

    async fn case_update(&self, id: i32, draft: CaseDraft) -> anyhow::Result<bool>;

    async fn case_delete(&self, id: i32) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait LecturerPersistence: Send + Sync {
    /// Newest first; `keyword` matches the name
    async fn lecturer_find_page(
        &self,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<LecturerInfo>>;

    async fn lecturer_find_by_id(&self, id: i32) -> anyhow::Result<Option<LecturerInfo>>;

    async fn lecturer_create(&self, draft: LecturerDraft) -> anyhow::Result<i32>;

    async fn lecturer_update(&self, id: i32, draft: LecturerDraft) -> anyhow::Result<bool>;

    async fn lecturer_delete(&self, id: i32) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait PartnerPersistence: Send + Sync {
    /// Ordered by `sort_order`, then newest first
    async fn partner_find_page(
        &self,
        status: Option<EnableStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<PartnerInfo>>;

    async fn partner_find_by_id(&self, id: i32) -> anyhow::Result<Option<PartnerInfo>>;

    async fn partner_create(&self, draft: PartnerDraft) -> anyhow::Result<i32>;

    async fn partner_update(&self, id: i32, draft: PartnerDraft) -> anyhow::Result<bool>;

    async fn partner_update_sort_order(&self, id: i32, sort_order: i32) -> anyhow::Result<bool>;

    async fn partner_delete(&self, id: i32) -> anyhow::Result<bool>;

    /// Returns the number of rows removed; unknown ids are ignored
    async fn partner_delete_many(&self, ids: &[i32]) -> anyhow::Result<u64>;
}

#[async_trait]
pub trait KindergartenPersistence: Send + Sync {
    /// Ordered by `sort_order`, then newest first; `keyword` matches names
    /// and addresses in both languages
    async fn kindergarten_find_page(
        &self,
        status: Option<EnableStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<KindergartenInfo>>;

    /// Up to `limit` enabled kindergartens in list order
    async fn kindergarten_list_enabled(&self, limit: u64) -> anyhow::Result<Vec<KindergartenInfo>>;

    async fn kindergarten_find_by_id(&self, id: i32) -> anyhow::Result<Option<KindergartenInfo>>;

    async fn kindergarten_create(&self, draft: KindergartenDraft) -> anyhow::Result<i32>;

    async fn kindergarten_update(&self, id: i32, draft: KindergartenDraft)
    -> anyhow::Result<bool>;

    async fn kindergarten_delete(&self, id: i32) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait EventPersistence: Send + Sync {
    /// Ordered by `sort_order`, event date descending, then newest first
    async fn event_find_page(
        &self,
        status: Option<PublishStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<EventInfo>>;

    /// Up to `limit` published events, latest event date first
    async fn event_list_published(&self, limit: u64) -> anyhow::Result<Vec<EventInfo>>;

    async fn event_find_by_id(&self, id: i32) -> anyhow::Result<Option<EventInfo>>;

    async fn event_create(&self, draft: EventDraft) -> anyhow::Result<i32>;

    async fn event_update(&self, id: i32, draft: EventDraft) -> anyhow::Result<bool>;

    async fn event_delete(&self, id: i32) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait BoardChairPersistence: Send + Sync {
    /// Every member, newest first
    async fn board_chair_list(&self) -> anyhow::Result<Vec<BoardChairInfo>>;

    async fn board_chair_find_by_id(&self, id: i32) -> anyhow::Result<Option<BoardChairInfo>>;

    async fn board_chair_create(&self, draft: BoardChairDraft) -> anyhow::Result<i32>;

    async fn board_chair_update(&self, id: i32, draft: BoardChairDraft) -> anyhow::Result<bool>;

    async fn board_chair_delete(&self, id: i32) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait CertificatePersistence: Send + Sync {
    /// Newest first; `keyword` matches the number or the holder name
    async fn certificate_find_page(
        &self,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<CertificateInfo>>;

    async fn certificate_find_by_id(&self, id: i32) -> anyhow::Result<Option<CertificateInfo>>;

    /// Enabled certificate with exactly this holder name and number
    async fn certificate_find_enabled(
        &self,
        name: &str,
        certificate_no: &str,
    ) -> anyhow::Result<Option<CertificateInfo>>;

    /// Fails with a conflict when the number is taken
    async fn certificate_create(&self, draft: CertificateDraft) -> anyhow::Result<i32>;

    async fn certificate_update(&self, id: i32, draft: CertificateDraft) -> anyhow::Result<bool>;

    async fn certificate_delete(&self, id: i32) -> anyhow::Result<bool>;

    async fn certificate_delete_many(&self, ids: &[i32]) -> anyhow::Result<u64>;
}
