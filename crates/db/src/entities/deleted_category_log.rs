//! Archive of permanently deleted categories.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::category::FilterType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deleted_categories_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Id the category had while live.
    #[sea_orm(indexed)]
    pub category_id: i64,

    pub name: String,

    pub sort_order: i32,

    pub filter_type: FilterType,

    #[sea_orm(column_type = "Text", nullable)]
    pub filter_tags: Option<String>,

    pub is_system: bool,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,

    pub deleted_at: DateTimeUtc,

    /// When the row was physically removed.
    pub purged_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
