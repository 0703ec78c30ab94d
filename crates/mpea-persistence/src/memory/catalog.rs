// Catalog tables of the memory backend

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mpea_common::{CmsError, EnableStatus, PublishStatus};

use super::{MemoryPersistService, contains_ci, now};
use crate::CERTIFICATE_NO_CONFLICT;
use crate::model::*;
use crate::traits::*;

/// `(created_at, id)` descending
fn newest_first(a: (NaiveDateTime, i32), b: (NaiveDateTime, i32)) -> Ordering {
    b.cmp(&a)
}

// ============================================================================
// CasePersistence implementation
// ============================================================================

#[async_trait]
impl CasePersistence for MemoryPersistService {
    async fn case_find_page(
        &self,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<CaseInfo>> {
        let keyword = keyword.to_lowercase();
        let mut items: Vec<CaseInfo> = self
            .tables
            .read()
            .cases
            .rows
            .values()
            .filter(|c| {
                keyword.is_empty()
                    || contains_ci(Some(&c.title), &keyword)
                    || contains_ci(Some(&c.title_en), &keyword)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));

        Ok(paginate(items, page_no, page_size))
    }

    async fn case_find_by_id(&self, id: i32) -> anyhow::Result<Option<CaseInfo>> {
        Ok(self.tables.read().cases.rows.get(&id).cloned())
    }

    async fn case_create(&self, draft: CaseDraft) -> anyhow::Result<i32> {
        let ts = now();
        let id = self.tables.write().cases.insert_with(|id| CaseInfo {
            id,
            title: draft.title,
            title_en: draft.title_en,
            professional_photo: draft.professional_photo,
            child_photo: draft.child_photo,
            introduction: draft.introduction,
            introduction_en: draft.introduction_en,
            featured: draft.featured,
            created_at: ts,
            updated_at: ts,
        });

        Ok(id)
    }

    async fn case_update(&self, id: i32, draft: CaseDraft) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        let Some(item) = tables.cases.rows.get_mut(&id) else {
            return Ok(false);
        };
        item.title = draft.title;
        item.title_en = draft.title_en;
        item.professional_photo = draft.professional_photo;
        item.child_photo = draft.child_photo;
        item.introduction = draft.introduction;
        item.introduction_en = draft.introduction_en;
        item.featured = draft.featured;
        item.updated_at = now();

        Ok(true)
    }

    async fn case_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().cases.rows.remove(&id).is_some())
    }
}

// ============================================================================
// LecturerPersistence implementation
// ============================================================================

#[async_trait]
impl LecturerPersistence for MemoryPersistService {
    async fn lecturer_find_page(
        &self,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<LecturerInfo>> {
        let keyword = keyword.to_lowercase();
        let mut items: Vec<LecturerInfo> = self
            .tables
            .read()
            .lecturers
            .rows
            .values()
            .filter(|l| keyword.is_empty() || contains_ci(Some(&l.name), &keyword))
            .cloned()
            .collect();
        items.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));

        Ok(paginate(items, page_no, page_size))
    }

    async fn lecturer_find_by_id(&self, id: i32) -> anyhow::Result<Option<LecturerInfo>> {
        Ok(self.tables.read().lecturers.rows.get(&id).cloned())
    }

    async fn lecturer_create(&self, draft: LecturerDraft) -> anyhow::Result<i32> {
        let ts = now();
        let id = self.tables.write().lecturers.insert_with(|id| LecturerInfo {
            id,
            name: draft.name,
            name_en: draft.name_en,
            photo: draft.photo,
            introduction: draft.introduction,
            introduction_en: draft.introduction_en,
            sort_order: draft.sort_order,
            created_at: ts,
            updated_at: ts,
        });

        Ok(id)
    }

    async fn lecturer_update(&self, id: i32, draft: LecturerDraft) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        let Some(item) = tables.lecturers.rows.get_mut(&id) else {
            return Ok(false);
        };
        item.name = draft.name;
        item.name_en = draft.name_en;
        item.photo = draft.photo;
        item.introduction = draft.introduction;
        item.introduction_en = draft.introduction_en;
        item.sort_order = draft.sort_order;
        item.updated_at = now();

        Ok(true)
    }

    async fn lecturer_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().lecturers.rows.remove(&id).is_some())
    }
}

// ============================================================================
// PartnerPersistence implementation
// ============================================================================

#[async_trait]
impl PartnerPersistence for MemoryPersistService {
    async fn partner_find_page(
        &self,
        status: Option<EnableStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<PartnerInfo>> {
        let keyword = keyword.to_lowercase();
        let mut items: Vec<PartnerInfo> = self
            .tables
            .read()
            .partners
            .rows
            .values()
            .filter(|p| status.is_none_or(|s| p.status == s.as_str()))
            .filter(|p| keyword.is_empty() || contains_ci(Some(&p.title), &keyword))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| newest_first((a.created_at, a.id), (b.created_at, b.id)))
        });

        Ok(paginate(items, page_no, page_size))
    }

    async fn partner_find_by_id(&self, id: i32) -> anyhow::Result<Option<PartnerInfo>> {
        Ok(self.tables.read().partners.rows.get(&id).cloned())
    }

    async fn partner_create(&self, draft: PartnerDraft) -> anyhow::Result<i32> {
        let ts = now();
        let id = self.tables.write().partners.insert_with(|id| PartnerInfo {
            id,
            title: draft.title,
            image: draft.image,
            link: draft.link,
            sort_order: draft.sort_order,
            status: draft.status.as_str().to_string(),
            created_at: ts,
            updated_at: ts,
        });

        Ok(id)
    }

    async fn partner_update(&self, id: i32, draft: PartnerDraft) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        let Some(item) = tables.partners.rows.get_mut(&id) else {
            return Ok(false);
        };
        item.title = draft.title;
        item.image = draft.image;
        item.link = draft.link;
        item.sort_order = draft.sort_order;
        item.status = draft.status.as_str().to_string();
        item.updated_at = now();

        Ok(true)
    }

    async fn partner_update_sort_order(&self, id: i32, sort_order: i32) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        let Some(item) = tables.partners.rows.get_mut(&id) else {
            return Ok(false);
        };
        item.sort_order = sort_order;
        item.updated_at = now();

        Ok(true)
    }

    async fn partner_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().partners.rows.remove(&id).is_some())
    }

    async fn partner_delete_many(&self, ids: &[i32]) -> anyhow::Result<u64> {
        let mut tables = self.tables.write();
        let removed = ids
            .iter()
            .filter(|id| tables.partners.rows.remove(*id).is_some())
            .count();

        Ok(removed as u64)
    }
}

// ============================================================================
// KindergartenPersistence implementation
// ============================================================================

impl MemoryPersistService {
    fn kindergartens_ordered(
        &self,
        status: Option<EnableStatus>,
        keyword: &str,
    ) -> Vec<KindergartenInfo> {
        let keyword = keyword.to_lowercase();
        let mut items: Vec<KindergartenInfo> = self
            .tables
            .read()
            .kindergartens
            .rows
            .values()
            .filter(|k| status.is_none_or(|s| k.status == s.as_str()))
            .filter(|k| {
                keyword.is_empty()
                    || contains_ci(Some(&k.name), &keyword)
                    || contains_ci(Some(&k.name_en), &keyword)
                    || contains_ci(Some(&k.address), &keyword)
                    || contains_ci(Some(&k.address_en), &keyword)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| newest_first((a.created_at, a.id), (b.created_at, b.id)))
        });
        items
    }
}

#[async_trait]
impl KindergartenPersistence for MemoryPersistService {
    async fn kindergarten_find_page(
        &self,
        status: Option<EnableStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<KindergartenInfo>> {
        let items = self.kindergartens_ordered(status, keyword);
        Ok(paginate(items, page_no, page_size))
    }

    async fn kindergarten_list_enabled(&self, limit: u64) -> anyhow::Result<Vec<KindergartenInfo>> {
        let mut items = self.kindergartens_ordered(Some(EnableStatus::Enabled), "");
        items.truncate(limit as usize);
        Ok(items)
    }

    async fn kindergarten_find_by_id(&self, id: i32) -> anyhow::Result<Option<KindergartenInfo>> {
        Ok(self.tables.read().kindergartens.rows.get(&id).cloned())
    }

    async fn kindergarten_create(&self, draft: KindergartenDraft) -> anyhow::Result<i32> {
        let ts = now();
        let id = self
            .tables
            .write()
            .kindergartens
            .insert_with(|id| KindergartenInfo {
                id,
                name: draft.name,
                name_en: draft.name_en,
                address: draft.address,
                address_en: draft.address_en,
                logo: draft.logo,
                sort_order: draft.sort_order,
                status: draft.status.as_str().to_string(),
                created_at: ts,
                updated_at: ts,
            });

        Ok(id)
    }

    async fn kindergarten_update(
        &self,
        id: i32,
        draft: KindergartenDraft,
    ) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        let Some(item) = tables.kindergartens.rows.get_mut(&id) else {
            return Ok(false);
        };
        item.name = draft.name;
        item.name_en = draft.name_en;
        item.address = draft.address;
        item.address_en = draft.address_en;
        item.logo = draft.logo;
        item.sort_order = draft.sort_order;
        item.status = draft.status.as_str().to_string();
        item.updated_at = now();

        Ok(true)
    }

    async fn kindergarten_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().kindergartens.rows.remove(&id).is_some())
    }
}

// ============================================================================
// EventPersistence implementation
// ============================================================================

#[async_trait]
impl EventPersistence for MemoryPersistService {
    async fn event_find_page(
        &self,
        status: Option<PublishStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<EventInfo>> {
        let keyword = keyword.to_lowercase();
        let mut items: Vec<EventInfo> = self
            .tables
            .read()
            .events
            .rows
            .values()
            .filter(|e| status.is_none_or(|s| e.status == s.as_str()))
            .filter(|e| {
                keyword.is_empty()
                    || contains_ci(Some(&e.title), &keyword)
                    || contains_ci(Some(&e.title_en), &keyword)
                    || contains_ci(Some(&e.content), &keyword)
                    || contains_ci(Some(&e.content_en), &keyword)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| b.event_date.cmp(&a.event_date))
                .then_with(|| newest_first((a.created_at, a.id), (b.created_at, b.id)))
        });

        Ok(paginate(items, page_no, page_size))
    }

    async fn event_list_published(&self, limit: u64) -> anyhow::Result<Vec<EventInfo>> {
        let mut items: Vec<EventInfo> = self
            .tables
            .read()
            .events
            .rows
            .values()
            .filter(|e| e.status == PublishStatus::Published.as_str())
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.event_date
                .cmp(&a.event_date)
                .then_with(|| a.sort_order.cmp(&b.sort_order))
                .then_with(|| newest_first((a.created_at, a.id), (b.created_at, b.id)))
        });
        items.truncate(limit as usize);

        Ok(items)
    }

    async fn event_find_by_id(&self, id: i32) -> anyhow::Result<Option<EventInfo>> {
        Ok(self.tables.read().events.rows.get(&id).cloned())
    }

    async fn event_create(&self, draft: EventDraft) -> anyhow::Result<i32> {
        let ts = now();
        let id = self.tables.write().events.insert_with(|id| EventInfo {
            id,
            title: draft.title,
            title_en: draft.title_en,
            cover: draft.cover,
            event_date: draft.event_date,
            content: draft.content,
            content_en: draft.content_en,
            status: draft.status.as_str().to_string(),
            sort_order: draft.sort_order,
            created_at: ts,
            updated_at: ts,
        });

        Ok(id)
    }

    async fn event_update(&self, id: i32, draft: EventDraft) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        let Some(item) = tables.events.rows.get_mut(&id) else {
            return Ok(false);
        };
        item.title = draft.title;
        item.title_en = draft.title_en;
        item.cover = draft.cover;
        item.event_date = draft.event_date;
        item.content = draft.content;
        item.content_en = draft.content_en;
        item.status = draft.status.as_str().to_string();
        item.sort_order = draft.sort_order;
        item.updated_at = now();

        Ok(true)
    }

    async fn event_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().events.rows.remove(&id).is_some())
    }
}

// ============================================================================
// BoardChairPersistence implementation
// ============================================================================

#[async_trait]
impl BoardChairPersistence for MemoryPersistService {
    async fn board_chair_list(&self) -> anyhow::Result<Vec<BoardChairInfo>> {
        let mut items: Vec<BoardChairInfo> =
            self.tables.read().board_chair.rows.values().cloned().collect();
        items.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));

        Ok(items)
    }

    async fn board_chair_find_by_id(&self, id: i32) -> anyhow::Result<Option<BoardChairInfo>> {
        Ok(self.tables.read().board_chair.rows.get(&id).cloned())
    }

    async fn board_chair_create(&self, draft: BoardChairDraft) -> anyhow::Result<i32> {
        let ts = now();
        let id = self.tables.write().board_chair.insert_with(|id| BoardChairInfo {
            id,
            name: draft.name,
            name_en: draft.name_en,
            position: draft.position,
            position_en: draft.position_en,
            avatar: draft.avatar,
            sort_order: draft.sort_order,
            introduction: draft.introduction,
            introduction_en: draft.introduction_en,
            created_at: ts,
            updated_at: ts,
        });

        Ok(id)
    }

    async fn board_chair_update(&self, id: i32, draft: BoardChairDraft) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        let Some(item) = tables.board_chair.rows.get_mut(&id) else {
            return Ok(false);
        };
        item.name = draft.name;
        item.name_en = draft.name_en;
        item.position = draft.position;
        item.position_en = draft.position_en;
        item.avatar = draft.avatar;
        item.sort_order = draft.sort_order;
        item.introduction = draft.introduction;
        item.introduction_en = draft.introduction_en;
        item.updated_at = now();

        Ok(true)
    }

    async fn board_chair_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().board_chair.rows.remove(&id).is_some())
    }
}

// ============================================================================
// CertificatePersistence implementation
// ============================================================================

#[async_trait]
impl CertificatePersistence for MemoryPersistService {
    async fn certificate_find_page(
        &self,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<CertificateInfo>> {
        let keyword = keyword.to_lowercase();
        let mut items: Vec<CertificateInfo> = self
            .tables
            .read()
            .certificates
            .rows
            .values()
            .filter(|c| {
                keyword.is_empty()
                    || contains_ci(Some(&c.certificate_no), &keyword)
                    || contains_ci(Some(&c.name), &keyword)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));

        Ok(paginate(items, page_no, page_size))
    }

    async fn certificate_find_by_id(&self, id: i32) -> anyhow::Result<Option<CertificateInfo>> {
        Ok(self.tables.read().certificates.rows.get(&id).cloned())
    }

    async fn certificate_find_enabled(
        &self,
        name: &str,
        certificate_no: &str,
    ) -> anyhow::Result<Option<CertificateInfo>> {
        let tables = self.tables.read();
        Ok(tables
            .certificates
            .rows
            .values()
            .find(|c| {
                c.name == name
                    && c.certificate_no == certificate_no
                    && c.status == EnableStatus::Enabled.as_str()
            })
            .cloned())
    }

    async fn certificate_create(&self, draft: CertificateDraft) -> anyhow::Result<i32> {
        let mut tables = self.tables.write();
        if tables
            .certificates
            .rows
            .values()
            .any(|c| c.certificate_no == draft.certificate_no)
        {
            return Err(CmsError::ResourceConflict(CERTIFICATE_NO_CONFLICT.to_string()).into());
        }

        let ts = now();
        let id = tables.certificates.insert_with(|id| CertificateInfo {
            id,
            certificate_no: draft.certificate_no,
            name: draft.name,
            cert_date: draft.cert_date,
            status: draft.status.unwrap_or_default().as_str().to_string(),
            created_at: ts,
            updated_at: ts,
        });

        Ok(id)
    }

    async fn certificate_update(&self, id: i32, draft: CertificateDraft) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        if tables
            .certificates
            .rows
            .values()
            .any(|c| c.id != id && c.certificate_no == draft.certificate_no)
        {
            return Err(CmsError::ResourceConflict(CERTIFICATE_NO_CONFLICT.to_string()).into());
        }

        let Some(item) = tables.certificates.rows.get_mut(&id) else {
            return Ok(false);
        };
        item.certificate_no = draft.certificate_no;
        item.name = draft.name;
        item.cert_date = draft.cert_date;
        if let Some(status) = draft.status {
            item.status = status.as_str().to_string();
        }
        item.updated_at = now();

        Ok(true)
    }

    async fn certificate_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().certificates.rows.remove(&id).is_some())
    }

    async fn certificate_delete_many(&self, ids: &[i32]) -> anyhow::Result<u64> {
        let mut tables = self.tables.write();
        let removed = ids
            .iter()
            .filter(|id| tables.certificates.rows.remove(*id).is_some())
            .count();

        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(title: &str, day: u32, sort_order: i32, status: PublishStatus) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            title_en: title.to_string(),
            cover: "/uploads/cover.jpg".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 3, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            content: String::new(),
            content_en: String::new(),
            status,
            sort_order,
        }
    }

    #[tokio::test]
    async fn test_event_orders() {
        let svc = MemoryPersistService::new();
        svc.event_create(event("early", 1, 0, PublishStatus::Published)).await.unwrap();
        svc.event_create(event("late", 20, 5, PublishStatus::Published)).await.unwrap();
        svc.event_create(event("hidden", 25, 0, PublishStatus::Draft)).await.unwrap();

        let titles = |items: Vec<EventInfo>| items.into_iter().map(|e| e.title).collect::<Vec<_>>();

        // Admin list puts sort order before the date
        let page = svc.event_find_page(None, "", 1, 10).await.unwrap();
        assert_eq!(titles(page.page_items), vec!["hidden", "early", "late"]);

        // Public list only shows published events, latest date first
        let published = svc.event_list_published(10).await.unwrap();
        assert_eq!(titles(published), vec!["late", "early"]);
        assert_eq!(svc.event_list_published(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_partner_sort_and_batch_delete() {
        let svc = MemoryPersistService::new();
        let mut ids = Vec::new();
        for (title, sort_order, status) in [
            ("b", 2, EnableStatus::Enabled),
            ("a", 1, EnableStatus::Enabled),
            ("off", 0, EnableStatus::Disabled),
        ] {
            let draft = PartnerDraft {
                title: title.to_string(),
                image: "/logo.png".to_string(),
                sort_order,
                status,
                ..Default::default()
            };
            ids.push(svc.partner_create(draft).await.unwrap());
        }

        let enabled = svc
            .partner_find_page(Some(EnableStatus::Enabled), "", 1, 100)
            .await
            .unwrap();
        let titles: Vec<&str> = enabled.page_items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);

        assert!(svc.partner_update_sort_order(ids[0], 0).await.unwrap());
        let enabled = svc
            .partner_find_page(Some(EnableStatus::Enabled), "", 1, 100)
            .await
            .unwrap();
        assert_eq!(enabled.page_items[0].title, "b");

        assert_eq!(svc.partner_delete_many(&[ids[0], ids[2], 999]).await.unwrap(), 2);
        assert_eq!(svc.partner_find_page(None, "", 1, 10).await.unwrap().total_count, 1);
    }

    #[tokio::test]
    async fn test_certificate_lookup_and_conflict() {
        let svc = MemoryPersistService::new();
        let draft = CertificateDraft {
            certificate_no: "No.2024001".to_string(),
            name: "张三".to_string(),
            cert_date: "2024-06".to_string(),
            status: None,
        };
        let id = svc.certificate_create(draft.clone()).await.unwrap();

        let err = svc.certificate_create(draft.clone()).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<CmsError>(),
            Some(&CmsError::ResourceConflict(CERTIFICATE_NO_CONFLICT.to_string()))
        );

        let found = svc.certificate_find_enabled("张三", "No.2024001").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(id));
        assert!(svc.certificate_find_enabled("李四", "No.2024001").await.unwrap().is_none());

        // Disabled certificates are hidden from the lookup; omitted status is kept
        let disable = CertificateDraft {
            status: Some(EnableStatus::Disabled),
            ..draft.clone()
        };
        assert!(svc.certificate_update(id, disable).await.unwrap());
        assert!(svc.certificate_update(id, draft).await.unwrap());
        let stored = svc.certificate_find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, "disabled");
        assert!(svc.certificate_find_enabled("张三", "No.2024001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_kindergarten_keyword_matches_english_address() {
        let svc = MemoryPersistService::new();
        svc.kindergarten_create(KindergartenDraft {
            name: "阳光幼儿园".to_string(),
            name_en: "Sunshine Kindergarten".to_string(),
            address: "北京市".to_string(),
            address_en: "Beijing".to_string(),
            logo: "/logo.png".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

        let page = svc.kindergarten_find_page(None, "BEIJING", 1, 10).await.unwrap();
        assert_eq!(page.total_count, 1);
        let page = svc
            .kindergarten_find_page(Some(EnableStatus::Disabled), "", 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
    }
}
