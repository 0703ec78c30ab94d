//! Contact form submissions from the public site.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// parenting | business
    #[sea_orm(column_name = "type")]
    pub message_type: String,
    pub child_age: Option<i32>,
    pub interest: Option<String>,
    pub company: Option<String>,
    pub org_type: Option<String>,
    pub phone: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub intention: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub problem: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    /// new | processed | spam
    pub status: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
