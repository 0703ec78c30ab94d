// In-process persistence backend
// Keeps every table in ordered maps behind a single lock; nothing survives a restart.

mod catalog;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use mpea_common::{CmsError, ContactStatus, PublishStatus};
use parking_lot::RwLock;

use crate::model::*;
use crate::traits::*;
use crate::{KEY_CONFLICT, PATH_CONFLICT, SLUG_CONFLICT};

/// Rows of one table plus its auto-increment counter
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, build(id));
        id
    }
}

#[derive(Default)]
struct Tables {
    admins: Table<AdminInfo>,
    translations: Table<TranslationEntry>,
    pages: Table<PageInfo>,
    news: Table<NewsInfo>,
    contacts: Table<ContactMessageInfo>,
    cases: Table<CaseInfo>,
    lecturers: Table<LecturerInfo>,
    partners: Table<PartnerInfo>,
    kindergartens: Table<KindergartenInfo>,
    events: Table<EventInfo>,
    board_chair: Table<BoardChairInfo>,
    certificates: Table<CertificateInfo>,
}

/// Memory-backed persistence service
///
/// Enforces the same unique keys as the SQL schema (`full_key`, page `path`,
/// news `slug`, admin `username`, `certificate_no`).
#[derive(Default)]
pub struct MemoryPersistService {
    tables: RwLock<Tables>,
}

impl MemoryPersistService {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle_lower))
}

#[async_trait]
impl PersistenceService for MemoryPersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::Memory
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

// ============================================================================
// TranslationPersistence implementation
// ============================================================================

#[async_trait]
impl TranslationPersistence for MemoryPersistService {
    async fn translation_find_by_id(&self, id: i32) -> anyhow::Result<Option<TranslationEntry>> {
        Ok(self.tables.read().translations.rows.get(&id).cloned())
    }

    async fn translation_find_by_full_key(
        &self,
        full_key: &str,
    ) -> anyhow::Result<Option<TranslationEntry>> {
        let tables = self.tables.read();
        let entry = tables
            .translations
            .rows
            .values()
            .find(|e| e.full_key == full_key)
            .cloned();

        Ok(entry)
    }

    async fn translation_find_page(
        &self,
        namespace: &str,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<TranslationEntry>> {
        let keyword = keyword.to_lowercase();
        let mut items: Vec<TranslationEntry> = self
            .tables
            .read()
            .translations
            .rows
            .values()
            .filter(|e| namespace.is_empty() || e.namespace == namespace)
            .filter(|e| {
                keyword.is_empty()
                    || contains_ci(Some(&e.full_key), &keyword)
                    || contains_ci(e.label.as_deref(), &keyword)
                    || contains_ci(e.description.as_deref(), &keyword)
            })
            .cloned()
            .collect();

        items.sort_by(|a, b| {
            (&a.namespace, a.sort_order, &a.full_key).cmp(&(&b.namespace, b.sort_order, &b.full_key))
        });

        Ok(paginate(items, page_no, page_size))
    }

    async fn translation_namespaces(&self) -> anyhow::Result<Vec<String>> {
        let mut namespaces: Vec<String> = self
            .tables
            .read()
            .translations
            .rows
            .values()
            .map(|e| e.namespace.clone())
            .collect();
        namespaces.sort();
        namespaces.dedup();

        Ok(namespaces)
    }

    async fn translation_list_ordered(&self) -> anyhow::Result<Vec<TranslationEntry>> {
        let mut entries: Vec<TranslationEntry> = self
            .tables
            .read()
            .translations
            .rows
            .values()
            .cloned()
            .collect();
        entries.sort_by(|a, b| (a.sort_order, &a.full_key).cmp(&(b.sort_order, &b.full_key)));

        Ok(entries)
    }

    async fn translation_create(&self, entry: NewTranslation) -> anyhow::Result<i32> {
        let mut tables = self.tables.write();
        if tables
            .translations
            .rows
            .values()
            .any(|e| e.full_key == entry.full_key)
        {
            return Err(CmsError::ResourceConflict(KEY_CONFLICT.to_string()).into());
        }

        let ts = now();
        let id = tables.translations.insert_with(|id| TranslationEntry {
            id,
            namespace: entry.namespace,
            full_key: entry.full_key,
            label: entry.label,
            description: entry.description,
            sort_order: entry.sort_order,
            values: entry.values,
            updated_by: entry.updated_by,
            updated_by_id: entry.updated_by_id,
            created_at: ts,
            updated_at: ts,
        });

        Ok(id)
    }

    async fn translation_update(&self, id: i32, patch: TranslationPatch) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();

        if let Some(full_key) = &patch.full_key {
            if tables
                .translations
                .rows
                .values()
                .any(|e| e.id != id && &e.full_key == full_key)
            {
                return Err(CmsError::ResourceConflict(KEY_CONFLICT.to_string()).into());
            }
        }

        let Some(entry) = tables.translations.rows.get_mut(&id) else {
            return Ok(false);
        };

        if let Some(full_key) = patch.full_key {
            entry.full_key = full_key;
        }
        if let Some(namespace) = patch.namespace {
            entry.namespace = namespace;
        }
        if let Some(label) = patch.label {
            entry.label = label;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(sort_order) = patch.sort_order {
            entry.sort_order = sort_order;
        }
        if let Some(values) = patch.values {
            entry.values = values;
        }
        if let Some(updated_by) = patch.updated_by {
            entry.updated_by = updated_by;
        }
        if let Some(updated_by_id) = patch.updated_by_id {
            entry.updated_by_id = updated_by_id;
        }
        entry.updated_at = now();

        Ok(true)
    }

    async fn translation_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().translations.rows.remove(&id).is_some())
    }
}

// ============================================================================
// AdminPersistence implementation
// ============================================================================

#[async_trait]
impl AdminPersistence for MemoryPersistService {
    async fn admin_find_by_username(&self, username: &str) -> anyhow::Result<Option<AdminInfo>> {
        let tables = self.tables.read();
        Ok(tables
            .admins
            .rows
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn admin_find_by_id(&self, id: i32) -> anyhow::Result<Option<AdminInfo>> {
        Ok(self.tables.read().admins.rows.get(&id).cloned())
    }

    async fn admin_create(&self, username: &str, password_hash: &str) -> anyhow::Result<i32> {
        let mut tables = self.tables.write();
        if tables.admins.rows.values().any(|a| a.username == username) {
            return Err(CmsError::ResourceConflict("username already exists".to_string()).into());
        }

        let id = tables.admins.insert_with(|id| AdminInfo {
            id,
            username: username.to_string(),
            password: password_hash.to_string(),
            created_at: now(),
        });

        Ok(id)
    }
}

// ============================================================================
// PagePersistence implementation
// ============================================================================

#[async_trait]
impl PagePersistence for MemoryPersistService {
    async fn page_find_page(
        &self,
        status: Option<PublishStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<PageInfo>> {
        let keyword = keyword.to_lowercase();
        let mut items: Vec<PageInfo> = self
            .tables
            .read()
            .pages
            .rows
            .values()
            .filter(|p| status.is_none_or(|s| p.status == s.as_str()))
            .filter(|p| {
                keyword.is_empty()
                    || contains_ci(Some(&p.title), &keyword)
                    || contains_ci(Some(&p.path), &keyword)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));

        Ok(paginate(items, page_no, page_size))
    }

    async fn page_find_by_id(&self, id: i32) -> anyhow::Result<Option<PageInfo>> {
        Ok(self.tables.read().pages.rows.get(&id).cloned())
    }

    async fn page_create(&self, draft: ContentDraft) -> anyhow::Result<i32> {
        let mut tables = self.tables.write();
        if tables.pages.rows.values().any(|p| p.path == draft.address) {
            return Err(CmsError::ResourceConflict(PATH_CONFLICT.to_string()).into());
        }

        let ts = now();
        let id = tables.pages.insert_with(|id| PageInfo {
            id,
            title: draft.title,
            path: draft.address,
            content: draft.content,
            status: draft.status.as_str().to_string(),
            created_at: ts,
            updated_at: ts,
        });

        Ok(id)
    }

    async fn page_update(&self, id: i32, patch: ContentPatch) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        if let Some(path) = &patch.address
            && tables.pages.rows.values().any(|p| p.id != id && &p.path == path)
        {
            return Err(CmsError::ResourceConflict(PATH_CONFLICT.to_string()).into());
        }

        let Some(page) = tables.pages.rows.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(title) = patch.title {
            page.title = title;
        }
        if let Some(path) = patch.address {
            page.path = path;
        }
        if let Some(content) = patch.content {
            page.content = content;
        }
        if let Some(status) = patch.status {
            page.status = status.as_str().to_string();
        }
        page.updated_at = now();

        Ok(true)
    }

    async fn page_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().pages.rows.remove(&id).is_some())
    }
}

// ============================================================================
// NewsPersistence implementation
// ============================================================================

#[async_trait]
impl NewsPersistence for MemoryPersistService {
    async fn news_find_page(
        &self,
        status: Option<PublishStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<NewsInfo>> {
        let keyword = keyword.to_lowercase();
        let mut items: Vec<NewsInfo> = self
            .tables
            .read()
            .news
            .rows
            .values()
            .filter(|n| status.is_none_or(|s| n.status == s.as_str()))
            .filter(|n| {
                keyword.is_empty()
                    || contains_ci(Some(&n.title), &keyword)
                    || contains_ci(Some(&n.slug), &keyword)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(paginate(items, page_no, page_size))
    }

    async fn news_find_by_id(&self, id: i32) -> anyhow::Result<Option<NewsInfo>> {
        Ok(self.tables.read().news.rows.get(&id).cloned())
    }

    async fn news_find_by_slug(&self, slug: &str) -> anyhow::Result<Option<NewsInfo>> {
        let tables = self.tables.read();
        Ok(tables.news.rows.values().find(|n| n.slug == slug).cloned())
    }

    async fn news_create(&self, draft: ContentDraft) -> anyhow::Result<i32> {
        let mut tables = self.tables.write();
        if tables.news.rows.values().any(|n| n.slug == draft.address) {
            return Err(CmsError::ResourceConflict(SLUG_CONFLICT.to_string()).into());
        }

        let ts = now();
        let id = tables.news.insert_with(|id| NewsInfo {
            id,
            title: draft.title,
            slug: draft.address,
            content: draft.content,
            status: draft.status.as_str().to_string(),
            created_at: ts,
            updated_at: ts,
        });

        Ok(id)
    }

    async fn news_update(&self, id: i32, patch: ContentPatch) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        if let Some(slug) = &patch.address
            && tables.news.rows.values().any(|n| n.id != id && &n.slug == slug)
        {
            return Err(CmsError::ResourceConflict(SLUG_CONFLICT.to_string()).into());
        }

        let Some(item) = tables.news.rows.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(slug) = patch.address {
            item.slug = slug;
        }
        if let Some(content) = patch.content {
            item.content = content;
        }
        if let Some(status) = patch.status {
            item.status = status.as_str().to_string();
        }
        item.updated_at = now();

        Ok(true)
    }

    async fn news_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().news.rows.remove(&id).is_some())
    }
}

// ============================================================================
// ContactPersistence implementation
// ============================================================================

#[async_trait]
impl ContactPersistence for MemoryPersistService {
    async fn contact_create(&self, message: NewContactMessage) -> anyhow::Result<i32> {
        let ts = now();
        let id = self.tables.write().contacts.insert_with(|id| ContactMessageInfo {
            id,
            message_type: message.message_type.as_str().to_string(),
            child_age: message.child_age,
            interest: message.interest,
            company: message.company,
            org_type: message.org_type,
            phone: message.phone,
            intention: message.intention,
            problem: message.problem,
            ip: message.ip,
            user_agent: message.user_agent,
            status: ContactStatus::New.as_str().to_string(),
            created_at: ts,
            updated_at: ts,
        });

        Ok(id)
    }

    async fn contact_find_page(
        &self,
        query: &ContactQuery,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<ContactMessageInfo>> {
        let keyword = query.keyword.to_lowercase();
        let mut items: Vec<ContactMessageInfo> = self
            .tables
            .read()
            .contacts
            .rows
            .values()
            .filter(|m| query.message_type.is_none_or(|t| m.message_type == t.as_str()))
            .filter(|m| query.status.is_none_or(|s| m.status == s.as_str()))
            .filter(|m| {
                keyword.is_empty()
                    || contains_ci(Some(&m.phone), &keyword)
                    || contains_ci(m.company.as_deref(), &keyword)
                    || contains_ci(m.interest.as_deref(), &keyword)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(paginate(items, page_no, page_size))
    }

    async fn contact_find_by_id(&self, id: i32) -> anyhow::Result<Option<ContactMessageInfo>> {
        Ok(self.tables.read().contacts.rows.get(&id).cloned())
    }

    async fn contact_update_status(&self, id: i32, status: ContactStatus) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        let Some(message) = tables.contacts.rows.get_mut(&id) else {
            return Ok(false);
        };
        message.status = status.as_str().to_string();
        message.updated_at = now();

        Ok(true)
    }

    async fn contact_delete(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.tables.write().contacts.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_translation(full_key: &str, sort_order: i32) -> NewTranslation {
        NewTranslation {
            namespace: full_key.split('.').next().unwrap_or_default().to_string(),
            full_key: full_key.to_string(),
            sort_order,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_translation_unique_full_key() {
        let svc = MemoryPersistService::new();
        svc.translation_create(new_translation("home.title", 0))
            .await
            .unwrap();

        let err = svc
            .translation_create(new_translation("home.title", 1))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CmsError>(),
            Some(&CmsError::ResourceConflict(KEY_CONFLICT.to_string()))
        );
    }

    #[tokio::test]
    async fn test_translation_update_rename_conflict() {
        let svc = MemoryPersistService::new();
        svc.translation_create(new_translation("a.x", 0)).await.unwrap();
        let id = svc.translation_create(new_translation("a.y", 0)).await.unwrap();

        let patch = TranslationPatch {
            full_key: Some("a.x".to_string()),
            ..Default::default()
        };
        assert!(svc.translation_update(id, patch).await.is_err());

        // Renaming onto its own key is not a conflict
        let patch = TranslationPatch {
            full_key: Some("a.y".to_string()),
            ..Default::default()
        };
        assert!(svc.translation_update(id, patch).await.unwrap());
        assert!(!svc.translation_update(999, TranslationPatch::default()).await.unwrap());
    }

    #[tokio::test]
    async fn test_translation_list_ordered() {
        let svc = MemoryPersistService::new();
        svc.translation_create(new_translation("b.key", 1)).await.unwrap();
        svc.translation_create(new_translation("a.key", 1)).await.unwrap();
        svc.translation_create(new_translation("z.key", 0)).await.unwrap();

        let keys: Vec<String> = svc
            .translation_list_ordered()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.full_key)
            .collect();
        assert_eq!(keys, vec!["z.key", "a.key", "b.key"]);
    }

    #[tokio::test]
    async fn test_translation_find_page_filters() {
        let svc = MemoryPersistService::new();
        svc.translation_create(new_translation("home.title", 0)).await.unwrap();
        svc.translation_create(new_translation("home.subtitle", 1)).await.unwrap();
        svc.translation_create(new_translation("nav.home", 0)).await.unwrap();

        let page = svc.translation_find_page("home", "", 1, 10).await.unwrap();
        assert_eq!(page.total_count, 2);

        let page = svc.translation_find_page("", "HOME", 1, 10).await.unwrap();
        assert_eq!(page.total_count, 3);

        let page = svc.translation_find_page("", "sub", 1, 10).await.unwrap();
        assert_eq!(page.page_items[0].full_key, "home.subtitle");

        assert_eq!(
            svc.translation_namespaces().await.unwrap(),
            vec!["home".to_string(), "nav".to_string()]
        );
    }

    #[tokio::test]
    async fn test_page_path_conflict_and_status_filter() {
        let svc = MemoryPersistService::new();
        let draft = ContentDraft {
            title: "About".to_string(),
            address: "/about".to_string(),
            content: String::new(),
            status: PublishStatus::Published,
        };
        svc.page_create(draft.clone()).await.unwrap();
        assert!(svc.page_create(draft).await.is_err());

        svc.page_create(ContentDraft {
            title: "Draft".to_string(),
            address: "/draft".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

        let published = svc
            .page_find_page(Some(PublishStatus::Published), "", 1, 10)
            .await
            .unwrap();
        assert_eq!(published.total_count, 1);
        let all = svc.page_find_page(None, "", 1, 10).await.unwrap();
        assert_eq!(all.total_count, 2);
    }

    #[tokio::test]
    async fn test_contact_status_update() {
        let svc = MemoryPersistService::new();
        let id = svc
            .contact_create(NewContactMessage {
                message_type: mpea_common::ContactType::Business,
                child_age: None,
                interest: None,
                company: Some("ACME".to_string()),
                org_type: None,
                phone: "13800000000".to_string(),
                intention: None,
                problem: None,
                ip: None,
                user_agent: None,
            })
            .await
            .unwrap();

        let stored = svc.contact_find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, "new");

        assert!(svc.contact_update_status(id, ContactStatus::Spam).await.unwrap());
        let query = ContactQuery {
            status: Some(ContactStatus::Spam),
            ..Default::default()
        };
        assert_eq!(svc.contact_find_page(&query, 1, 10).await.unwrap().total_count, 1);
        assert!(svc.contact_delete(id).await.unwrap());
        assert!(!svc.contact_delete(id).await.unwrap());
    }
}
