//! Admin account service

use mpea_common::CmsError;
use mpea_persistence::{AdminInfo, AdminPersistence};

use crate::model::BCRYPT_COST;

/// Check a username/password pair; `None` means the credentials are wrong.
pub async fn authenticate<P>(
    persistence: &P,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<AdminInfo>>
where
    P: AdminPersistence + ?Sized,
{
    let Some(admin) = persistence.admin_find_by_username(username).await? else {
        return Ok(None);
    };

    match bcrypt::verify(password, &admin.password) {
        Ok(true) => Ok(Some(admin)),
        Ok(false) => Ok(None),
        Err(e) => {
            tracing::warn!(username, error = %e, "stored password hash is unreadable");
            Ok(None)
        }
    }
}

/// Create an admin account. Fails if either field is blank or the username is taken.
pub async fn create<P>(persistence: &P, username: &str, password: &str) -> anyhow::Result<i32>
where
    P: AdminPersistence + ?Sized,
{
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(
            CmsError::IllegalArgument("username and password are required".to_string()).into(),
        );
    }

    if persistence.admin_find_by_username(username).await?.is_some() {
        return Err(CmsError::ResourceConflict(format!("admin '{}' already exists", username)).into());
    }

    let hashed_password = bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let id = persistence.admin_create(username, &hashed_password).await?;
    tracing::info!(id, username, "admin created");

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpea_persistence::MemoryPersistService;

    #[tokio::test]
    async fn test_create_and_authenticate() {
        let store = MemoryPersistService::new();
        let id = create(&store, " admin ", "s3cret").await.unwrap();

        let admin = authenticate(&store, "admin", "s3cret").await.unwrap().unwrap();
        assert_eq!(admin.id, id);
        assert_ne!(admin.password, "s3cret");

        assert!(authenticate(&store, "admin", "wrong").await.unwrap().is_none());
        assert!(authenticate(&store, "ghost", "s3cret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_and_duplicate() {
        let store = MemoryPersistService::new();
        assert!(create(&store, "  ", "pw").await.is_err());
        assert!(create(&store, "admin", "").await.is_err());

        create(&store, "admin", "pw").await.unwrap();
        let err = create(&store, "admin", "pw2").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CmsError>(),
            Some(CmsError::ResourceConflict(_))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_hash_fails_closed() {
        let store = MemoryPersistService::new();
        store.admin_create("legacy", "not-a-bcrypt-hash").await.unwrap();
        assert!(authenticate(&store, "legacy", "anything").await.unwrap().is_none());
    }
}
