//! Photo category entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a category selects its photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Photos whose `category` field names this category.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Photos carrying any of `filter_tags`.
    #[sea_orm(string_value = "tag")]
    Tag,
    #[sea_orm(string_value = "both")]
    Both,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Unique among rows where `deleted_at` is null.
    pub name: String,

    #[sea_orm(default_value = 0)]
    pub sort_order: i32,

    pub filter_type: FilterType,

    /// Comma-joined tags, used by `tag` and `both`.
    #[sea_orm(column_type = "Text", nullable)]
    pub filter_tags: Option<String>,

    /// System categories cannot be permanently deleted.
    #[sea_orm(default_value = false)]
    pub is_system: bool,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

impl Model {
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
