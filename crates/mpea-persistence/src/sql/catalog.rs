//! Catalog tables of the SQL backend

use async_trait::async_trait;
use chrono::Utc;
use mpea_common::{EnableStatus, PublishStatus};
use sea_orm::{prelude::Expr, *};

use super::{ExternalDbPersistService, offset_of, unique_violation};
use crate::CERTIFICATE_NO_CONFLICT;
use crate::entity::{
    board_chair, cases, certificates, events, kindergartens, lecturers, partners,
};
use crate::model::*;
use crate::traits::*;

// ============================================================================
// CasePersistence implementation
// ============================================================================

#[async_trait]
impl CasePersistence for ExternalDbPersistService {
    async fn case_find_page(
        &self,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<CaseInfo>> {
        let mut select = cases::Entity::find();

        if !keyword.is_empty() {
            select = select.filter(
                Condition::any()
                    .add(cases::Column::Title.contains(keyword))
                    .add(cases::Column::TitleEn.contains(keyword)),
            );
        }

        let total_count = select.clone().count(&self.db).await?;
        if total_count == 0 {
            return Ok(Page::empty());
        }

        let items = select
            .order_by_desc(cases::Column::CreatedAt)
            .order_by_desc(cases::Column::Id)
            .offset(offset_of(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(CaseInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    async fn case_find_by_id(&self, id: i32) -> anyhow::Result<Option<CaseInfo>> {
        Ok(cases::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(CaseInfo::from))
    }

    async fn case_create(&self, draft: CaseDraft) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = cases::ActiveModel {
            title: Set(draft.title),
            title_en: Set(draft.title_en),
            professional_photo: Set(draft.professional_photo),
            child_photo: Set(draft.child_photo),
            introduction: Set(draft.introduction),
            introduction_en: Set(draft.introduction_en),
            featured: Set(draft.featured),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = cases::Entity::insert(model).exec(&self.db).await?;
        Ok(result.last_insert_id)
    }

    async fn case_update(&self, id: i32, draft: CaseDraft) -> anyhow::Result<bool> {
        let Some(entity) = cases::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: cases::ActiveModel = entity.into();
        model.title = Set(draft.title);
        model.title_en = Set(draft.title_en);
        model.professional_photo = Set(draft.professional_photo);
        model.child_photo = Set(draft.child_photo);
        model.introduction = Set(draft.introduction);
        model.introduction_en = Set(draft.introduction_en);
        model.featured = Set(draft.featured);
        model.updated_at = Set(Utc::now().naive_utc());
        model.update(&self.db).await?;

        Ok(true)
    }

    async fn case_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = cases::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// LecturerPersistence implementation
// ============================================================================

#[async_trait]
impl LecturerPersistence for ExternalDbPersistService {
    async fn lecturer_find_page(
        &self,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<LecturerInfo>> {
        let mut select = lecturers::Entity::find();

        if !keyword.is_empty() {
            select = select.filter(lecturers::Column::Name.contains(keyword));
        }

        let total_count = select.clone().count(&self.db).await?;
        if total_count == 0 {
            return Ok(Page::empty());
        }

        let items = select
            .order_by_desc(lecturers::Column::CreatedAt)
            .order_by_desc(lecturers::Column::Id)
            .offset(offset_of(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(LecturerInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    async fn lecturer_find_by_id(&self, id: i32) -> anyhow::Result<Option<LecturerInfo>> {
        Ok(lecturers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(LecturerInfo::from))
    }

    async fn lecturer_create(&self, draft: LecturerDraft) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = lecturers::ActiveModel {
            name: Set(draft.name),
            name_en: Set(draft.name_en),
            photo: Set(draft.photo),
            introduction: Set(draft.introduction),
            introduction_en: Set(draft.introduction_en),
            sort_order: Set(draft.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = lecturers::Entity::insert(model).exec(&self.db).await?;
        Ok(result.last_insert_id)
    }

    async fn lecturer_update(&self, id: i32, draft: LecturerDraft) -> anyhow::Result<bool> {
        let Some(entity) = lecturers::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: lecturers::ActiveModel = entity.into();
        model.name = Set(draft.name);
        model.name_en = Set(draft.name_en);
        model.photo = Set(draft.photo);
        model.introduction = Set(draft.introduction);
        model.introduction_en = Set(draft.introduction_en);
        model.sort_order = Set(draft.sort_order);
        model.updated_at = Set(Utc::now().naive_utc());
        model.update(&self.db).await?;

        Ok(true)
    }

    async fn lecturer_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = lecturers::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// PartnerPersistence implementation
// ============================================================================

#[async_trait]
impl PartnerPersistence for ExternalDbPersistService {
    async fn partner_find_page(
        &self,
        status: Option<EnableStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<PartnerInfo>> {
        let mut select = partners::Entity::find();

        if let Some(status) = status {
            select = select.filter(partners::Column::Status.eq(status.as_str()));
        }
        if !keyword.is_empty() {
            select = select.filter(partners::Column::Title.contains(keyword));
        }

        let total_count = select.clone().count(&self.db).await?;
        if total_count == 0 {
            return Ok(Page::empty());
        }

        let items = select
            .order_by_asc(partners::Column::SortOrder)
            .order_by_desc(partners::Column::CreatedAt)
            .order_by_desc(partners::Column::Id)
            .offset(offset_of(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(PartnerInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    async fn partner_find_by_id(&self, id: i32) -> anyhow::Result<Option<PartnerInfo>> {
        Ok(partners::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(PartnerInfo::from))
    }

    async fn partner_create(&self, draft: PartnerDraft) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = partners::ActiveModel {
            title: Set(draft.title),
            image: Set(draft.image),
            link: Set(draft.link),
            sort_order: Set(draft.sort_order),
            status: Set(draft.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = partners::Entity::insert(model).exec(&self.db).await?;
        Ok(result.last_insert_id)
    }

    async fn partner_update(&self, id: i32, draft: PartnerDraft) -> anyhow::Result<bool> {
        let Some(entity) = partners::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: partners::ActiveModel = entity.into();
        model.title = Set(draft.title);
        model.image = Set(draft.image);
        model.link = Set(draft.link);
        model.sort_order = Set(draft.sort_order);
        model.status = Set(draft.status.as_str().to_string());
        model.updated_at = Set(Utc::now().naive_utc());
        model.update(&self.db).await?;

        Ok(true)
    }

    async fn partner_update_sort_order(&self, id: i32, sort_order: i32) -> anyhow::Result<bool> {
        let result = partners::Entity::update_many()
            .col_expr(partners::Column::SortOrder, Expr::value(sort_order))
            .col_expr(partners::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(partners::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn partner_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = partners::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn partner_delete_many(&self, ids: &[i32]) -> anyhow::Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = partners::Entity::delete_many()
            .filter(partners::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

// ============================================================================
// KindergartenPersistence implementation
// ============================================================================

#[async_trait]
impl KindergartenPersistence for ExternalDbPersistService {
    async fn kindergarten_find_page(
        &self,
        status: Option<EnableStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<KindergartenInfo>> {
        let mut select = kindergartens::Entity::find();

        if let Some(status) = status {
            select = select.filter(kindergartens::Column::Status.eq(status.as_str()));
        }
        if !keyword.is_empty() {
            select = select.filter(
                Condition::any()
                    .add(kindergartens::Column::Name.contains(keyword))
                    .add(kindergartens::Column::NameEn.contains(keyword))
                    .add(kindergartens::Column::Address.contains(keyword))
                    .add(kindergartens::Column::AddressEn.contains(keyword)),
            );
        }

        let total_count = select.clone().count(&self.db).await?;
        if total_count == 0 {
            return Ok(Page::empty());
        }

        let items = select
            .order_by_asc(kindergartens::Column::SortOrder)
            .order_by_desc(kindergartens::Column::CreatedAt)
            .order_by_desc(kindergartens::Column::Id)
            .offset(offset_of(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(KindergartenInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    async fn kindergarten_list_enabled(&self, limit: u64) -> anyhow::Result<Vec<KindergartenInfo>> {
        let items = kindergartens::Entity::find()
            .filter(kindergartens::Column::Status.eq(EnableStatus::Enabled.as_str()))
            .order_by_asc(kindergartens::Column::SortOrder)
            .order_by_desc(kindergartens::Column::CreatedAt)
            .order_by_desc(kindergartens::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(KindergartenInfo::from)
            .collect();

        Ok(items)
    }

    async fn kindergarten_find_by_id(&self, id: i32) -> anyhow::Result<Option<KindergartenInfo>> {
        Ok(kindergartens::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(KindergartenInfo::from))
    }

    async fn kindergarten_create(&self, draft: KindergartenDraft) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = kindergartens::ActiveModel {
            name: Set(draft.name),
            name_en: Set(draft.name_en),
            address: Set(draft.address),
            address_en: Set(draft.address_en),
            logo: Set(draft.logo),
            sort_order: Set(draft.sort_order),
            status: Set(draft.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = kindergartens::Entity::insert(model).exec(&self.db).await?;
        Ok(result.last_insert_id)
    }

    async fn kindergarten_update(
        &self,
        id: i32,
        draft: KindergartenDraft,
    ) -> anyhow::Result<bool> {
        let Some(entity) = kindergartens::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: kindergartens::ActiveModel = entity.into();
        model.name = Set(draft.name);
        model.name_en = Set(draft.name_en);
        model.address = Set(draft.address);
        model.address_en = Set(draft.address_en);
        model.logo = Set(draft.logo);
        model.sort_order = Set(draft.sort_order);
        model.status = Set(draft.status.as_str().to_string());
        model.updated_at = Set(Utc::now().naive_utc());
        model.update(&self.db).await?;

        Ok(true)
    }

    async fn kindergarten_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = kindergartens::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// EventPersistence implementation
// ============================================================================

#[async_trait]
impl EventPersistence for ExternalDbPersistService {
    async fn event_find_page(
        &self,
        status: Option<PublishStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<EventInfo>> {
        let mut select = events::Entity::find();

        if let Some(status) = status {
            select = select.filter(events::Column::Status.eq(status.as_str()));
        }
        if !keyword.is_empty() {
            select = select.filter(
                Condition::any()
                    .add(events::Column::Title.contains(keyword))
                    .add(events::Column::TitleEn.contains(keyword))
                    .add(events::Column::Content.contains(keyword))
                    .add(events::Column::ContentEn.contains(keyword)),
            );
        }

        let total_count = select.clone().count(&self.db).await?;
        if total_count == 0 {
            return Ok(Page::empty());
        }

        let items = select
            .order_by_asc(events::Column::SortOrder)
            .order_by_desc(events::Column::EventDate)
            .order_by_desc(events::Column::CreatedAt)
            .order_by_desc(events::Column::Id)
            .offset(offset_of(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(EventInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    async fn event_list_published(&self, limit: u64) -> anyhow::Result<Vec<EventInfo>> {
        let items = events::Entity::find()
            .filter(events::Column::Status.eq(PublishStatus::Published.as_str()))
            .order_by_desc(events::Column::EventDate)
            .order_by_asc(events::Column::SortOrder)
            .order_by_desc(events::Column::CreatedAt)
            .order_by_desc(events::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(EventInfo::from)
            .collect();

        Ok(items)
    }

    async fn event_find_by_id(&self, id: i32) -> anyhow::Result<Option<EventInfo>> {
        Ok(events::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(EventInfo::from))
    }

    async fn event_create(&self, draft: EventDraft) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = events::ActiveModel {
            title: Set(draft.title),
            title_en: Set(draft.title_en),
            cover: Set(draft.cover),
            event_date: Set(draft.event_date),
            content: Set(draft.content),
            content_en: Set(draft.content_en),
            status: Set(draft.status.as_str().to_string()),
            sort_order: Set(draft.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = events::Entity::insert(model).exec(&self.db).await?;
        Ok(result.last_insert_id)
    }

    async fn event_update(&self, id: i32, draft: EventDraft) -> anyhow::Result<bool> {
        let Some(entity) = events::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: events::ActiveModel = entity.into();
        model.title = Set(draft.title);
        model.title_en = Set(draft.title_en);
        model.cover = Set(draft.cover);
        model.event_date = Set(draft.event_date);
        model.content = Set(draft.content);
        model.content_en = Set(draft.content_en);
        model.status = Set(draft.status.as_str().to_string());
        model.sort_order = Set(draft.sort_order);
        model.updated_at = Set(Utc::now().naive_utc());
        model.update(&self.db).await?;

        Ok(true)
    }

    async fn event_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = events::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// BoardChairPersistence implementation
// ============================================================================

#[async_trait]
impl BoardChairPersistence for ExternalDbPersistService {
    async fn board_chair_list(&self) -> anyhow::Result<Vec<BoardChairInfo>> {
        let items = board_chair::Entity::find()
            .order_by_desc(board_chair::Column::CreatedAt)
            .order_by_desc(board_chair::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(BoardChairInfo::from)
            .collect();

        Ok(items)
    }

    async fn board_chair_find_by_id(&self, id: i32) -> anyhow::Result<Option<BoardChairInfo>> {
        Ok(board_chair::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(BoardChairInfo::from))
    }

    async fn board_chair_create(&self, draft: BoardChairDraft) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = board_chair::ActiveModel {
            name: Set(draft.name),
            name_en: Set(draft.name_en),
            position: Set(draft.position),
            position_en: Set(draft.position_en),
            avatar: Set(draft.avatar),
            sort_order: Set(draft.sort_order),
            introduction: Set(draft.introduction),
            introduction_en: Set(draft.introduction_en),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = board_chair::Entity::insert(model).exec(&self.db).await?;
        Ok(result.last_insert_id)
    }

    async fn board_chair_update(&self, id: i32, draft: BoardChairDraft) -> anyhow::Result<bool> {
        let Some(entity) = board_chair::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: board_chair::ActiveModel = entity.into();
        model.name = Set(draft.name);
        model.name_en = Set(draft.name_en);
        model.position = Set(draft.position);
        model.position_en = Set(draft.position_en);
        model.avatar = Set(draft.avatar);
        model.sort_order = Set(draft.sort_order);
        model.introduction = Set(draft.introduction);
        model.introduction_en = Set(draft.introduction_en);
        model.updated_at = Set(Utc::now().naive_utc());
        model.update(&self.db).await?;

        Ok(true)
    }

    async fn board_chair_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = board_chair::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// CertificatePersistence implementation
// ============================================================================

#[async_trait]
impl CertificatePersistence for ExternalDbPersistService {
    async fn certificate_find_page(
        &self,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<CertificateInfo>> {
        let mut select = certificates::Entity::find();

        if !keyword.is_empty() {
            select = select.filter(
                Condition::any()
                    .add(certificates::Column::CertificateNo.contains(keyword))
                    .add(certificates::Column::Name.contains(keyword)),
            );
        }

        let total_count = select.clone().count(&self.db).await?;
        if total_count == 0 {
            return Ok(Page::empty());
        }

        let items = select
            .order_by_desc(certificates::Column::CreatedAt)
            .order_by_desc(certificates::Column::Id)
            .offset(offset_of(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(CertificateInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    async fn certificate_find_by_id(&self, id: i32) -> anyhow::Result<Option<CertificateInfo>> {
        Ok(certificates::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(CertificateInfo::from))
    }

    async fn certificate_find_enabled(
        &self,
        name: &str,
        certificate_no: &str,
    ) -> anyhow::Result<Option<CertificateInfo>> {
        let certificate = certificates::Entity::find()
            .filter(certificates::Column::Name.eq(name))
            .filter(certificates::Column::CertificateNo.eq(certificate_no))
            .filter(certificates::Column::Status.eq(EnableStatus::Enabled.as_str()))
            .one(&self.db)
            .await?
            .map(CertificateInfo::from);

        Ok(certificate)
    }

    async fn certificate_create(&self, draft: CertificateDraft) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = certificates::ActiveModel {
            certificate_no: Set(draft.certificate_no),
            name: Set(draft.name),
            cert_date: Set(draft.cert_date),
            status: Set(draft.status.unwrap_or_default().as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = certificates::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| unique_violation(e, CERTIFICATE_NO_CONFLICT))?;

        Ok(result.last_insert_id)
    }

    async fn certificate_update(&self, id: i32, draft: CertificateDraft) -> anyhow::Result<bool> {
        let Some(entity) = certificates::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: certificates::ActiveModel = entity.into();
        model.certificate_no = Set(draft.certificate_no);
        model.name = Set(draft.name);
        model.cert_date = Set(draft.cert_date);
        if let Some(status) = draft.status {
            model.status = Set(status.as_str().to_string());
        }
        model.updated_at = Set(Utc::now().naive_utc());

        model
            .update(&self.db)
            .await
            .map_err(|e| unique_violation(e, CERTIFICATE_NO_CONFLICT))?;

        Ok(true)
    }

    async fn certificate_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = certificates::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn certificate_delete_many(&self, ids: &[i32]) -> anyhow::Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = certificates::Entity::delete_many()
            .filter(certificates::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
