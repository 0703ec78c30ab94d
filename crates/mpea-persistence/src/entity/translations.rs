//! Translation catalog entries keyed by a dotted full key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "translations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// First segment of `full_key`, or `root`
    pub namespace: String,
    #[sea_orm(unique)]
    pub full_key: String,
    pub label: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub sort_order: i32,
    /// JSON object of locale -> string, stored as text
    #[sea_orm(column_type = "Text")]
    pub locale_values: String,
    pub updated_by: Option<String>,
    pub updated_by_id: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
