//! Photo entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Review state of a photo.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PhotoStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl PhotoStatus {
    /// Column value for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(default_value = "")]
    pub title: String,

    /// Free-text category name.
    #[sea_orm(nullable, indexed)]
    pub category: Option<String>,

    /// Comma-joined tags.
    #[sea_orm(column_type = "Text", nullable)]
    pub tags: Option<String>,

    /// 1-10 when present.
    #[sea_orm(nullable)]
    pub rating: Option<i32>,

    // Location
    #[sea_orm(nullable)]
    pub location_province: Option<String>,
    #[sea_orm(nullable)]
    pub location_city: Option<String>,
    #[sea_orm(nullable)]
    pub location_country: Option<String>,
    #[sea_orm(nullable)]
    pub lat: Option<f64>,
    #[sea_orm(nullable)]
    pub lng: Option<f64>,

    // Camera metadata
    #[sea_orm(nullable)]
    pub focal_length: Option<String>,
    #[sea_orm(nullable)]
    pub aperture: Option<String>,
    #[sea_orm(nullable)]
    pub shutter_speed: Option<String>,
    #[sea_orm(nullable)]
    pub iso: Option<String>,
    #[sea_orm(nullable)]
    pub camera: Option<String>,
    #[sea_orm(nullable)]
    pub lens: Option<String>,

    /// Object key of the original asset.
    pub oss_key: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub oss_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub thumbnail_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub preview_url: Option<String>,

    #[sea_orm(indexed)]
    pub status: PhotoStatus,

    /// Only meaningful while rejected.
    #[sea_orm(column_type = "Text", nullable)]
    pub reject_reason: Option<String>,

    /// Approved but kept out of public listings.
    #[sea_orm(nullable)]
    pub hidden: Option<bool>,

    #[sea_orm(default_value = 0)]
    pub likes: i32,

    #[sea_orm(default_value = 0)]
    pub views: i32,

    #[sea_orm(nullable)]
    pub uploader_id: Option<i64>,

    /// Capture date supplied by the uploader.
    #[sea_orm(nullable)]
    pub shot_date: Option<Date>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Whether anonymous visitors may see this photo.
    #[must_use]
    pub fn is_publicly_visible(&self) -> bool {
        self.status == PhotoStatus::Approved && !self.hidden.unwrap_or(false)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::photo_comment::Entity")]
    Comments,
}

impl Related<super::photo_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
