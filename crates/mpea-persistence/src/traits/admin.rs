//! Admin account persistence trait

use async_trait::async_trait;

use crate::model::AdminInfo;

#[async_trait]
pub trait AdminPersistence: Send + Sync {
    /// Find an admin by username
    async fn admin_find_by_username(&self, username: &str) -> anyhow::Result<Option<AdminInfo>>;

    async fn admin_find_by_id(&self, id: i32) -> anyhow::Result<Option<AdminInfo>>;

    /// Create an admin with an already hashed password and return its id
    async fn admin_create(&self, username: &str, password_hash: &str) -> anyhow::Result<i32>;
}
