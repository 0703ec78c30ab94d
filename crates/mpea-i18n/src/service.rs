//! Translation catalog operations over a [`TranslationPersistence`] backend.
//!
//! Creation and updates keep `namespace` derived from the sanitized key. Locale
//! import is a sequence of independent upserts (find, merge, write) with no
//! surrounding transaction: concurrent imports touching the same key resolve
//! last-writer-wins, and a failing key does not stop the keys after it.

use mpea_common::{CmsError, non_blank};
use mpea_persistence::{
    LocaleValues, NewTranslation, Page, TranslationEntry, TranslationPatch, TranslationPersistence,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::assemble::{assign, parse_segments};
use crate::flatten::{FlatEntry, flatten};
use crate::key::{derive_namespace, require_full_key};

const TRANSLATION_NOT_FOUND: &str = "translation not found";

/// Who performed a write
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attribution {
    pub updated_by: Option<String>,
    pub updated_by_id: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateTranslation {
    pub full_key: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub values: Option<LocaleValues>,
}

/// Partial update; `None` fields are left untouched
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranslationChanges {
    pub full_key: Option<String>,
    pub label: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub values: Option<LocaleValues>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(i32),
    Updated(i32),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    pub full_key: String,
    pub reason: String,
}

/// Result of a locale import; `count` is the number of keys written
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub count: usize,
    pub failed: Vec<ImportFailure>,
}

fn not_found() -> anyhow::Error {
    CmsError::ResourceNotFound(TRANSLATION_NOT_FOUND.to_string()).into()
}

fn key_conflict() -> anyhow::Error {
    CmsError::ResourceConflict(mpea_persistence::KEY_CONFLICT.to_string()).into()
}

pub async fn find_by_id<P>(persistence: &P, id: i32) -> anyhow::Result<TranslationEntry>
where
    P: TranslationPersistence + ?Sized,
{
    persistence
        .translation_find_by_id(id)
        .await?
        .ok_or_else(not_found)
}

pub async fn find_page<P>(
    persistence: &P,
    namespace: &str,
    keyword: &str,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<TranslationEntry>>
where
    P: TranslationPersistence + ?Sized,
{
    persistence
        .translation_find_page(namespace.trim(), keyword.trim(), page_no, page_size)
        .await
}

pub async fn namespaces<P>(persistence: &P) -> anyhow::Result<Vec<String>>
where
    P: TranslationPersistence + ?Sized,
{
    persistence.translation_namespaces().await
}

/// Create an entry. Fails on a blank key or an existing key.
pub async fn create<P>(
    persistence: &P,
    input: CreateTranslation,
    attribution: &Attribution,
) -> anyhow::Result<TranslationEntry>
where
    P: TranslationPersistence + ?Sized,
{
    let full_key = require_full_key(&input.full_key)?;

    if persistence
        .translation_find_by_full_key(&full_key)
        .await?
        .is_some()
    {
        return Err(key_conflict());
    }

    let id = persistence
        .translation_create(NewTranslation {
            namespace: derive_namespace(&full_key),
            full_key,
            label: non_blank(input.label),
            description: non_blank(input.description),
            sort_order: input.sort_order.unwrap_or(0),
            values: input.values.unwrap_or_default(),
            updated_by: attribution.updated_by.clone(),
            updated_by_id: attribution.updated_by_id,
        })
        .await?;

    debug!(id, "translation created");
    find_by_id(persistence, id).await
}

/// Apply a partial update. A changed key is sanitized and re-namespaced.
pub async fn update<P>(
    persistence: &P,
    id: i32,
    changes: TranslationChanges,
    attribution: &Attribution,
) -> anyhow::Result<TranslationEntry>
where
    P: TranslationPersistence + ?Sized,
{
    let current = find_by_id(persistence, id).await?;

    let mut patch = TranslationPatch {
        label: changes.label.map(non_blank),
        description: changes.description.map(non_blank),
        sort_order: changes.sort_order,
        values: changes.values,
        updated_by: Some(attribution.updated_by.clone()),
        updated_by_id: Some(attribution.updated_by_id),
        ..Default::default()
    };

    if let Some(raw) = changes.full_key {
        let full_key = require_full_key(&raw)?;
        if full_key != current.full_key
            && let Some(other) = persistence.translation_find_by_full_key(&full_key).await?
            && other.id != id
        {
            return Err(key_conflict());
        }
        patch.namespace = Some(derive_namespace(&full_key));
        patch.full_key = Some(full_key);
    }

    if !persistence.translation_update(id, patch).await? {
        return Err(not_found());
    }

    find_by_id(persistence, id).await
}

pub async fn delete<P>(persistence: &P, id: i32) -> anyhow::Result<()>
where
    P: TranslationPersistence + ?Sized,
{
    if !persistence.translation_delete(id).await? {
        return Err(not_found());
    }
    debug!(id, "translation deleted");
    Ok(())
}

/// Write one flattened leaf for `locale`.
///
/// An existing entry keeps its other locales and description; its label, sort
/// order and attribution are replaced. A missing entry is created with only
/// this locale.
pub async fn upsert_locale_entry<P>(
    persistence: &P,
    locale: &str,
    entry: &FlatEntry,
    sort_order: i32,
    attribution: &Attribution,
) -> anyhow::Result<UpsertOutcome>
where
    P: TranslationPersistence + ?Sized,
{
    let full_key = require_full_key(&entry.full_key)?;
    let label = non_blank(Some(entry.label.clone()));

    match persistence.translation_find_by_full_key(&full_key).await? {
        Some(existing) => {
            let mut values = existing.values;
            values.insert(locale.to_string(), entry.value.clone());

            let patch = TranslationPatch {
                label: Some(label),
                sort_order: Some(sort_order),
                values: Some(values),
                updated_by: Some(attribution.updated_by.clone()),
                updated_by_id: Some(attribution.updated_by_id),
                ..Default::default()
            };
            if !persistence.translation_update(existing.id, patch).await? {
                return Err(not_found());
            }
            Ok(UpsertOutcome::Updated(existing.id))
        }
        None => {
            let mut values = LocaleValues::new();
            values.insert(locale.to_string(), entry.value.clone());

            let id = persistence
                .translation_create(NewTranslation {
                    namespace: derive_namespace(&full_key),
                    full_key,
                    label,
                    description: None,
                    sort_order,
                    values,
                    updated_by: attribution.updated_by.clone(),
                    updated_by_id: attribution.updated_by_id,
                })
                .await?;
            Ok(UpsertOutcome::Created(id))
        }
    }
}

/// Flatten `payload` and upsert every leaf under `locale`, in document order.
///
/// Each leaf's position in the flattened sequence becomes its sort order.
pub async fn import_locale<P>(
    persistence: &P,
    locale: &str,
    payload: &Value,
    attribution: &Attribution,
) -> anyhow::Result<ImportSummary>
where
    P: TranslationPersistence + ?Sized,
{
    let locale = locale.trim();
    if locale.is_empty() {
        return Err(CmsError::IllegalArgument("locale is required".to_string()).into());
    }

    let leaves = flatten(payload);
    let mut summary = ImportSummary::default();

    for (idx, leaf) in leaves.iter().enumerate() {
        let sort_order = i32::try_from(idx).unwrap_or(i32::MAX);
        match upsert_locale_entry(persistence, locale, leaf, sort_order, attribution).await {
            Ok(_) => summary.count += 1,
            Err(e) => {
                warn!(locale, full_key = %leaf.full_key, error = %e, "failed to import translation key");
                summary.failed.push(ImportFailure {
                    full_key: leaf.full_key.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        locale,
        total = leaves.len(),
        imported = summary.count,
        failed = summary.failed.len(),
        "locale import finished"
    );

    Ok(summary)
}

/// Assemble every stored value of `locale` into one nested document.
///
/// Entries are applied in (sort order, key) order, so later entries win where
/// paths collide. Entries without this locale are skipped.
pub async fn export_locale<P>(persistence: &P, locale: &str) -> anyhow::Result<Value>
where
    P: TranslationPersistence + ?Sized,
{
    let entries = persistence.translation_list_ordered().await?;

    let tree = entries
        .iter()
        .filter_map(|entry| {
            let value = entry.values.get(locale)?;
            let segments = parse_segments(&entry.full_key);
            (!segments.is_empty()).then(|| (segments, value))
        })
        .fold(Value::Object(Default::default()), |tree, (segments, value)| {
            assign(tree, &segments, Value::String(value.clone()))
        });

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpea_persistence::MemoryPersistService;
    use serde_json::json;

    fn admin() -> Attribution {
        Attribution {
            updated_by: Some("admin".to_string()),
            updated_by_id: Some(1),
        }
    }

    #[tokio::test]
    async fn test_create_derives_namespace_and_sanitizes() {
        let store = MemoryPersistService::new();
        let entry = create(
            &store,
            CreateTranslation {
                full_key: " home . hero.title ".to_string(),
                ..Default::default()
            },
            &admin(),
        )
        .await
        .unwrap();

        assert_eq!(entry.full_key, "home.hero.title");
        assert_eq!(entry.namespace, "home");
        assert_eq!(entry.sort_order, 0);
        assert_eq!(entry.updated_by.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_create_blank_key_writes_nothing() {
        let store = MemoryPersistService::new();
        let err = create(
            &store,
            CreateTranslation {
                full_key: "   ".to_string(),
                ..Default::default()
            },
            &admin(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CmsError>(),
            Some(CmsError::IllegalArgument(_))
        ));
        assert!(store.translation_list_ordered().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let store = MemoryPersistService::new();
        let input = CreateTranslation {
            full_key: "nav.home".to_string(),
            ..Default::default()
        };
        create(&store, input.clone(), &admin()).await.unwrap();

        let err = create(&store, input, &admin()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CmsError>(),
            Some(CmsError::ResourceConflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rekeys_namespace() {
        let store = MemoryPersistService::new();
        let entry = create(
            &store,
            CreateTranslation {
                full_key: "home.title".to_string(),
                label: Some("title".to_string()),
                ..Default::default()
            },
            &Attribution::default(),
        )
        .await
        .unwrap();

        let updated = update(
            &store,
            entry.id,
            TranslationChanges {
                full_key: Some("about.title".to_string()),
                label: Some(None),
                ..Default::default()
            },
            &admin(),
        )
        .await
        .unwrap();

        assert_eq!(updated.namespace, "about");
        assert_eq!(updated.label, None);
        assert_eq!(updated.updated_by_id, Some(1));

        let err = update(
            &store,
            entry.id,
            TranslationChanges {
                full_key: Some(" ".to_string()),
                ..Default::default()
            },
            &admin(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CmsError>(),
            Some(CmsError::IllegalArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = MemoryPersistService::new();
        let err = update(&store, 42, TranslationChanges::default(), &admin())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CmsError>(),
            Some(CmsError::ResourceNotFound(_))
        ));
        assert!(delete(&store, 42).await.is_err());
    }

    #[tokio::test]
    async fn test_import_preserves_other_locales() {
        let store = MemoryPersistService::new();
        import_locale(&store, "zh", &json!({"a": {"b": "X"}}), &admin())
            .await
            .unwrap();
        import_locale(&store, "en", &json!({"a": {"b": "Y"}}), &admin())
            .await
            .unwrap();

        let entry = store.translation_find_by_full_key("a.b").await.unwrap().unwrap();
        assert_eq!(entry.values.get("zh").map(String::as_str), Some("X"));
        assert_eq!(entry.values.get("en").map(String::as_str), Some("Y"));
        assert_eq!(entry.namespace, "a");
        assert_eq!(entry.label.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_import_assigns_flatten_order() {
        let store = MemoryPersistService::new();
        let summary = import_locale(
            &store,
            "en",
            &json!({"z": "last-key-first", "m": ["one", "two"], "a": "third"}),
            &admin(),
        )
        .await
        .unwrap();
        assert_eq!(summary.count, 4);
        assert!(summary.failed.is_empty());

        let orders: Vec<(String, i32)> = store
            .translation_list_ordered()
            .await
            .unwrap()
            .into_iter()
            .map(|e| (e.full_key, e.sort_order))
            .collect();
        assert_eq!(
            orders,
            vec![
                ("z".to_string(), 0),
                ("m.0".to_string(), 1),
                ("m.1".to_string(), 2),
                ("a".to_string(), 3)
            ]
        );
    }

    #[tokio::test]
    async fn test_import_continues_past_bad_keys() {
        let store = MemoryPersistService::new();
        let summary = import_locale(
            &store,
            "en",
            &json!({"ok": "1", " ": "blank key", "also": "2"}),
            &admin(),
        )
        .await
        .unwrap();

        assert_eq!(summary.count, 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].full_key, " ");
        assert!(store.translation_find_by_full_key("also").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_import_requires_locale() {
        let store = MemoryPersistService::new();
        assert!(import_locale(&store, " ", &json!({"a": "b"}), &admin()).await.is_err());
    }

    #[tokio::test]
    async fn test_export_skips_missing_locale() {
        let store = MemoryPersistService::new();
        import_locale(&store, "zh", &json!({"a": "甲", "b": "乙"}), &admin())
            .await
            .unwrap();
        import_locale(&store, "en", &json!({"a": "A"}), &admin())
            .await
            .unwrap();

        assert_eq!(export_locale(&store, "en").await.unwrap(), json!({"a": "A"}));
        assert_eq!(
            export_locale(&store, "zh").await.unwrap(),
            json!({"a": "甲", "b": "乙"})
        );
        assert_eq!(export_locale(&store, "fr").await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_import_export_round_trip() {
        let store = MemoryPersistService::new();
        let doc = json!({
            "nav": {"home": "Home", "about": "About"},
            "hero": {"slides": [{"title": "One"}, {"title": "Two"}]},
            "footer": "© MPEA"
        });

        import_locale(&store, "en", &doc, &admin()).await.unwrap();
        assert_eq!(export_locale(&store, "en").await.unwrap(), doc);
    }
}
