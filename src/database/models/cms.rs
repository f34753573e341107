use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "page_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CmsPage {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub meta_title: Option<String>,
    pub status: PageStatus,
    pub sitemap_enabled: bool,
    pub preview_token: Option<Uuid>,
    pub preview_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CmsSection {
    pub id: Uuid,
    pub page_id: Uuid,
    pub page_slug: String,
    pub section_key: String,
    pub title: Option<String>,
    pub content: Value,
    pub order_index: i32,
    pub is_enabled: bool,
}

/// Immutable snapshot of a page at save time, including the field
/// schemas that were active then. Restoring renders with that schema,
/// not today's.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CmsPageVersion {
    pub id: Uuid,
    pub page_id: Uuid,
    pub version_number: i32,
    pub version_name: Option<String>,
    pub meta_snapshot: Value,
    pub content_snapshot: Value,
    pub schema_snapshot: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CmsBlockDefinition {
    pub id: Uuid,
    pub block_type: String,
    pub friendly_name: String,
    pub field_schema: Value,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NavigationItem {
    pub id: Uuid,
    pub label: String,
    pub href: String,
    pub page_id: Option<Uuid>,
    pub order_index: i32,
    pub is_visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FooterLink {
    pub id: Uuid,
    pub label: String,
    pub href: String,
    pub page_id: Option<Uuid>,
    pub order_index: i32,
    pub is_visible: bool,
}
