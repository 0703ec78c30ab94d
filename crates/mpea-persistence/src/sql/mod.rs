//! SQL-based persistence backend (MySQL/PostgreSQL via SeaORM)
//!
//! This module implements the persistence traits with direct SeaORM queries.
//! Unique-index violations surface as `CmsError::ResourceConflict`.

mod catalog;

use async_trait::async_trait;
use chrono::Utc;
use mpea_common::{CmsError, ContactStatus, PublishStatus};
use sea_orm::{prelude::Expr, *};

use crate::entity::{admins, contact_messages, news, pages, translations};
use crate::model::*;
use crate::traits::*;
use crate::{KEY_CONFLICT, PATH_CONFLICT, SLUG_CONFLICT};

/// External database persistence service
///
/// Wraps a SeaORM `DatabaseConnection` and implements all persistence traits
/// by issuing queries against it.
pub struct ExternalDbPersistService {
    db: DatabaseConnection,
}

impl ExternalDbPersistService {
    /// Create a new ExternalDbPersistService with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Map a unique-constraint violation to a conflict, pass anything else through.
fn unique_violation(err: DbErr, message: &str) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(%detail, "unique constraint violation");
            CmsError::ResourceConflict(message.to_string()).into()
        }
        _ => err.into(),
    }
}

#[inline]
fn offset_of(page_no: u64, page_size: u64) -> u64 {
    page_no.saturating_sub(1).saturating_mul(page_size)
}

// ============================================================================
// PersistenceService implementation
// ============================================================================

#[async_trait]
impl PersistenceService for ExternalDbPersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::ExternalDb
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        admins::Entity::find()
            .select_only()
            .column_as(Expr::cust("1"), "health")
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;
        Ok(())
    }
}

// ============================================================================
// TranslationPersistence implementation
// ============================================================================

#[async_trait]
impl TranslationPersistence for ExternalDbPersistService {
    async fn translation_find_by_id(&self, id: i32) -> anyhow::Result<Option<TranslationEntry>> {
        let entry = translations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(TranslationEntry::from);

        Ok(entry)
    }

    async fn translation_find_by_full_key(
        &self,
        full_key: &str,
    ) -> anyhow::Result<Option<TranslationEntry>> {
        let entry = translations::Entity::find()
            .filter(translations::Column::FullKey.eq(full_key))
            .one(&self.db)
            .await?
            .map(TranslationEntry::from);

        Ok(entry)
    }

    async fn translation_find_page(
        &self,
        namespace: &str,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<TranslationEntry>> {
        let mut select = translations::Entity::find();

        if !namespace.is_empty() {
            select = select.filter(translations::Column::Namespace.eq(namespace));
        }
        if !keyword.is_empty() {
            select = select.filter(
                Condition::any()
                    .add(translations::Column::FullKey.contains(keyword))
                    .add(translations::Column::Label.contains(keyword))
                    .add(translations::Column::Description.contains(keyword)),
            );
        }

        let total_count = select.clone().count(&self.db).await?;
        if total_count == 0 {
            return Ok(Page::empty());
        }

        let items = select
            .order_by_asc(translations::Column::Namespace)
            .order_by_asc(translations::Column::SortOrder)
            .order_by_asc(translations::Column::FullKey)
            .offset(offset_of(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(TranslationEntry::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    async fn translation_namespaces(&self) -> anyhow::Result<Vec<String>> {
        let namespaces = translations::Entity::find()
            .select_only()
            .column(translations::Column::Namespace)
            .distinct()
            .order_by_asc(translations::Column::Namespace)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        Ok(namespaces)
    }

    async fn translation_list_ordered(&self) -> anyhow::Result<Vec<TranslationEntry>> {
        let entries = translations::Entity::find()
            .order_by_asc(translations::Column::SortOrder)
            .order_by_asc(translations::Column::FullKey)
            .all(&self.db)
            .await?
            .into_iter()
            .map(TranslationEntry::from)
            .collect();

        Ok(entries)
    }

    async fn translation_create(&self, entry: NewTranslation) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = translations::ActiveModel {
            namespace: Set(entry.namespace),
            full_key: Set(entry.full_key),
            label: Set(entry.label),
            description: Set(entry.description),
            sort_order: Set(entry.sort_order),
            locale_values: Set(encode_locale_values(&entry.values)),
            updated_by: Set(entry.updated_by),
            updated_by_id: Set(entry.updated_by_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = translations::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| unique_violation(e, KEY_CONFLICT))?;

        Ok(result.last_insert_id)
    }

    async fn translation_update(&self, id: i32, patch: TranslationPatch) -> anyhow::Result<bool> {
        let Some(entity) = translations::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: translations::ActiveModel = entity.into();
        if let Some(full_key) = patch.full_key {
            model.full_key = Set(full_key);
        }
        if let Some(namespace) = patch.namespace {
            model.namespace = Set(namespace);
        }
        if let Some(label) = patch.label {
            model.label = Set(label);
        }
        if let Some(description) = patch.description {
            model.description = Set(description);
        }
        if let Some(sort_order) = patch.sort_order {
            model.sort_order = Set(sort_order);
        }
        if let Some(values) = patch.values {
            model.locale_values = Set(encode_locale_values(&values));
        }
        if let Some(updated_by) = patch.updated_by {
            model.updated_by = Set(updated_by);
        }
        if let Some(updated_by_id) = patch.updated_by_id {
            model.updated_by_id = Set(updated_by_id);
        }
        model.updated_at = Set(Utc::now().naive_utc());

        model
            .update(&self.db)
            .await
            .map_err(|e| unique_violation(e, KEY_CONFLICT))?;

        Ok(true)
    }

    async fn translation_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = translations::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// AdminPersistence implementation
// ============================================================================

#[async_trait]
impl AdminPersistence for ExternalDbPersistService {
    async fn admin_find_by_username(&self, username: &str) -> anyhow::Result<Option<AdminInfo>> {
        let admin = admins::Entity::find()
            .filter(admins::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(AdminInfo::from);

        Ok(admin)
    }

    async fn admin_find_by_id(&self, id: i32) -> anyhow::Result<Option<AdminInfo>> {
        let admin = admins::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(AdminInfo::from);

        Ok(admin)
    }

    async fn admin_create(&self, username: &str, password_hash: &str) -> anyhow::Result<i32> {
        let entity = admins::ActiveModel {
            username: Set(username.to_string()),
            password: Set(password_hash.to_string()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let result = admins::Entity::insert(entity)
            .exec(&self.db)
            .await
            .map_err(|e| unique_violation(e, "username already exists"))?;

        Ok(result.last_insert_id)
    }
}

// ============================================================================
// PagePersistence implementation
// ============================================================================

#[async_trait]
impl PagePersistence for ExternalDbPersistService {
    async fn page_find_page(
        &self,
        status: Option<PublishStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<PageInfo>> {
        let mut select = pages::Entity::find();

        if let Some(status) = status {
            select = select.filter(pages::Column::Status.eq(status.as_str()));
        }
        if !keyword.is_empty() {
            select = select.filter(
                Condition::any()
                    .add(pages::Column::Title.contains(keyword))
                    .add(pages::Column::Path.contains(keyword)),
            );
        }

        let total_count = select.clone().count(&self.db).await?;
        if total_count == 0 {
            return Ok(Page::empty());
        }

        let items = select
            .order_by_desc(pages::Column::UpdatedAt)
            .order_by_desc(pages::Column::Id)
            .offset(offset_of(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(PageInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    async fn page_find_by_id(&self, id: i32) -> anyhow::Result<Option<PageInfo>> {
        let page = pages::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(PageInfo::from);

        Ok(page)
    }

    async fn page_create(&self, draft: ContentDraft) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = pages::ActiveModel {
            title: Set(draft.title),
            path: Set(draft.address),
            content: Set(draft.content),
            status: Set(draft.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = pages::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| unique_violation(e, PATH_CONFLICT))?;

        Ok(result.last_insert_id)
    }

    async fn page_update(&self, id: i32, patch: ContentPatch) -> anyhow::Result<bool> {
        let Some(entity) = pages::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: pages::ActiveModel = entity.into();
        if let Some(title) = patch.title {
            model.title = Set(title);
        }
        if let Some(path) = patch.address {
            model.path = Set(path);
        }
        if let Some(content) = patch.content {
            model.content = Set(content);
        }
        if let Some(status) = patch.status {
            model.status = Set(status.as_str().to_string());
        }
        model.updated_at = Set(Utc::now().naive_utc());

        model
            .update(&self.db)
            .await
            .map_err(|e| unique_violation(e, PATH_CONFLICT))?;

        Ok(true)
    }

    async fn page_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = pages::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// NewsPersistence implementation
// ============================================================================

#[async_trait]
impl NewsPersistence for ExternalDbPersistService {
    async fn news_find_page(
        &self,
        status: Option<PublishStatus>,
        keyword: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<NewsInfo>> {
        let mut select = news::Entity::find();

        if let Some(status) = status {
            select = select.filter(news::Column::Status.eq(status.as_str()));
        }
        if !keyword.is_empty() {
            select = select.filter(
                Condition::any()
                    .add(news::Column::Title.contains(keyword))
                    .add(news::Column::Slug.contains(keyword)),
            );
        }

        let total_count = select.clone().count(&self.db).await?;
        if total_count == 0 {
            return Ok(Page::empty());
        }

        let items = select
            .order_by_desc(news::Column::CreatedAt)
            .order_by_desc(news::Column::Id)
            .offset(offset_of(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(NewsInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    async fn news_find_by_id(&self, id: i32) -> anyhow::Result<Option<NewsInfo>> {
        let item = news::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(NewsInfo::from);

        Ok(item)
    }

    async fn news_find_by_slug(&self, slug: &str) -> anyhow::Result<Option<NewsInfo>> {
        let item = news::Entity::find()
            .filter(news::Column::Slug.eq(slug))
            .one(&self.db)
            .await?
            .map(NewsInfo::from);

        Ok(item)
    }

    async fn news_create(&self, draft: ContentDraft) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = news::ActiveModel {
            title: Set(draft.title),
            slug: Set(draft.address),
            content: Set(draft.content),
            status: Set(draft.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = news::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| unique_violation(e, SLUG_CONFLICT))?;

        Ok(result.last_insert_id)
    }

    async fn news_update(&self, id: i32, patch: ContentPatch) -> anyhow::Result<bool> {
        let Some(entity) = news::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: news::ActiveModel = entity.into();
        if let Some(title) = patch.title {
            model.title = Set(title);
        }
        if let Some(slug) = patch.address {
            model.slug = Set(slug);
        }
        if let Some(content) = patch.content {
            model.content = Set(content);
        }
        if let Some(status) = patch.status {
            model.status = Set(status.as_str().to_string());
        }
        model.updated_at = Set(Utc::now().naive_utc());

        model
            .update(&self.db)
            .await
            .map_err(|e| unique_violation(e, SLUG_CONFLICT))?;

        Ok(true)
    }

    async fn news_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = news::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// ContactPersistence implementation
// ============================================================================

#[async_trait]
impl ContactPersistence for ExternalDbPersistService {
    async fn contact_create(&self, message: NewContactMessage) -> anyhow::Result<i32> {
        let now = Utc::now().naive_utc();
        let model = contact_messages::ActiveModel {
            message_type: Set(message.message_type.as_str().to_string()),
            child_age: Set(message.child_age),
            interest: Set(message.interest),
            company: Set(message.company),
            org_type: Set(message.org_type),
            phone: Set(message.phone),
            intention: Set(message.intention),
            problem: Set(message.problem),
            ip: Set(message.ip),
            user_agent: Set(message.user_agent),
            status: Set(ContactStatus::New.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = contact_messages::Entity::insert(model)
            .exec(&self.db)
            .await?;

        Ok(result.last_insert_id)
    }

    async fn contact_find_page(
        &self,
        query: &ContactQuery,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<ContactMessageInfo>> {
        let mut select = contact_messages::Entity::find();

        if let Some(message_type) = query.message_type {
            select = select.filter(contact_messages::Column::MessageType.eq(message_type.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(contact_messages::Column::Status.eq(status.as_str()));
        }
        if !query.keyword.is_empty() {
            select = select.filter(
                Condition::any()
                    .add(contact_messages::Column::Phone.contains(&query.keyword))
                    .add(contact_messages::Column::Company.contains(&query.keyword))
                    .add(contact_messages::Column::Interest.contains(&query.keyword)),
            );
        }

        let total_count = select.clone().count(&self.db).await?;
        if total_count == 0 {
            return Ok(Page::empty());
        }

        let items = select
            .order_by_desc(contact_messages::Column::CreatedAt)
            .order_by_desc(contact_messages::Column::Id)
            .offset(offset_of(page_no, page_size))
            .limit(page_size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(ContactMessageInfo::from)
            .collect();

        Ok(Page::new(total_count, page_no, page_size, items))
    }

    async fn contact_find_by_id(&self, id: i32) -> anyhow::Result<Option<ContactMessageInfo>> {
        let message = contact_messages::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(ContactMessageInfo::from);

        Ok(message)
    }

    async fn contact_update_status(&self, id: i32, status: ContactStatus) -> anyhow::Result<bool> {
        let Some(entity) = contact_messages::Entity::find_by_id(id)
            .one(&self.db)
            .await?
        else {
            return Ok(false);
        };

        let mut model: contact_messages::ActiveModel = entity.into();
        model.status = Set(status.as_str().to_string());
        model.updated_at = Set(Utc::now().naive_utc());
        model.update(&self.db).await?;

        Ok(true)
    }

    async fn contact_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = contact_messages::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of() {
        assert_eq!(offset_of(1, 20), 0);
        assert_eq!(offset_of(3, 20), 40);
        assert_eq!(offset_of(0, 20), 0);
    }

    #[test]
    fn test_unique_violation_passes_other_errors() {
        let err = unique_violation(DbErr::Custom("boom".to_string()), KEY_CONFLICT);
        assert!(err.downcast_ref::<CmsError>().is_none());
        assert!(err.to_string().contains("boom"));
    }
}
