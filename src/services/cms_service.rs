use std::collections::HashSet;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{
    CmsBlockDefinition, CmsPage, CmsPageVersion, CmsSection, PageStatus,
};

use super::{audit, layout_cache, ServiceError, ServiceResult};

pub async fn list_pages() -> ServiceResult<Vec<CmsPage>> {
    let pool = DatabaseManager::pool().await?;
    let pages = sqlx::query_as::<_, CmsPage>("SELECT * FROM cms_pages ORDER BY updated_at DESC")
        .fetch_all(&pool)
        .await?;
    Ok(pages)
}

/// Everything the page editor needs in one payload.
#[derive(Debug, Serialize)]
pub struct PageEditor {
    pub page: CmsPage,
    pub sections: Vec<CmsSection>,
    pub versions: Vec<CmsPageVersion>,
    pub block_definitions: Vec<CmsBlockDefinition>,
}

pub async fn page_editor(page_id: Uuid) -> ServiceResult<PageEditor> {
    let pool = DatabaseManager::pool().await?;

    let page = sqlx::query_as::<_, CmsPage>("SELECT * FROM cms_pages WHERE id = $1")
        .bind(page_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Page not found".to_string()))?;

    let sections = sqlx::query_as::<_, CmsSection>(
        "SELECT * FROM cms_sections WHERE page_id = $1 ORDER BY order_index",
    )
    .bind(page_id)
    .fetch_all(&pool)
    .await?;

    let versions = sqlx::query_as::<_, CmsPageVersion>(
        "SELECT * FROM cms_page_versions WHERE page_id = $1 ORDER BY version_number DESC",
    )
    .bind(page_id)
    .fetch_all(&pool)
    .await?;

    let block_definitions = sqlx::query_as::<_, CmsBlockDefinition>(
        "SELECT * FROM cms_block_definitions WHERE is_active = true ORDER BY friendly_name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(PageEditor {
        page,
        sections,
        versions,
        block_definitions,
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SectionInput {
    pub section_key: String,
    pub title: Option<String>,
    pub content: Value,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct SavePage {
    pub title: String,
    pub slug: String,
    pub meta_title: Option<String>,
    pub status: PageStatus,
    #[serde(default)]
    pub sitemap_enabled: bool,
    pub sections: Vec<SectionInput>,
    /// Force a version snapshot even for draft saves.
    #[serde(default)]
    pub snapshot: bool,
    pub version_name: Option<String>,
}

/// Field schemas of exactly the block types the sections use, keyed by
/// block type. Captured into the version snapshot so a restore renders
/// with the schema that was live at save time, not today's.
fn build_schema_snapshot(
    definitions: &[CmsBlockDefinition],
    sections: &[SectionInput],
) -> Map<String, Value> {
    let used: HashSet<&str> = sections.iter().map(|s| s.section_key.as_str()).collect();
    definitions
        .iter()
        .filter(|d| used.contains(d.block_type.as_str()))
        .map(|d| (d.block_type.clone(), d.field_schema.clone()))
        .collect()
}

/// Full-page save: meta update, section replacement, and a version
/// snapshot when publishing (or when the editor asks for one). The
/// snapshot records the field schemas of the block types used at save
/// time, so restores render against the schema that was live then, not
/// today's. Everything runs in one transaction.
pub async fn save_page(actor: Uuid, page_id: Uuid, input: SavePage) -> ServiceResult<CmsPage> {
    if input.slug.trim().is_empty() {
        return Err(ServiceError::Validation("Page slug is required".to_string()));
    }

    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    let page = sqlx::query_as::<_, CmsPage>(
        "UPDATE cms_pages
         SET title = $2, slug = $3, meta_title = $4, status = $5,
             sitemap_enabled = $6, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(page_id)
    .bind(input.title.trim())
    .bind(input.slug.trim())
    .bind(&input.meta_title)
    .bind(input.status)
    .bind(input.sitemap_enabled)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ServiceError::NotFound("Page not found".to_string()))?;

    // Sections are replaced wholesale; order comes from array position.
    sqlx::query("DELETE FROM cms_sections WHERE page_id = $1")
        .bind(page_id)
        .execute(&mut *tx)
        .await?;

    for (index, section) in input.sections.iter().enumerate() {
        sqlx::query(
            "INSERT INTO cms_sections
                 (page_id, page_slug, section_key, title, content, order_index, is_enabled)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(page_id)
        .bind(&page.slug)
        .bind(&section.section_key)
        .bind(&section.title)
        .bind(&section.content)
        .bind(index as i32)
        .bind(section.is_enabled)
        .execute(&mut *tx)
        .await?;
    }

    if input.status == PageStatus::Published || input.snapshot {
        let used_types: Vec<String> = input
            .sections
            .iter()
            .map(|s| s.section_key.clone())
            .collect();

        let definitions = sqlx::query_as::<_, CmsBlockDefinition>(
            "SELECT * FROM cms_block_definitions WHERE block_type = ANY($1)",
        )
        .bind(&used_types)
        .fetch_all(&mut *tx)
        .await?;

        let schema_snapshot = build_schema_snapshot(&definitions, &input.sections);

        let next_version: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(version_number), 0) + 1 FROM cms_page_versions WHERE page_id = $1",
        )
        .bind(page_id)
        .fetch_one(&mut *tx)
        .await?;

        let meta_snapshot = json!({
            "title": page.title,
            "slug": page.slug,
            "meta_title": page.meta_title,
            "status": page.status,
            "sitemap_enabled": page.sitemap_enabled,
        });

        sqlx::query(
            "INSERT INTO cms_page_versions
                 (page_id, version_number, version_name, meta_snapshot, content_snapshot, schema_snapshot)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(page_id)
        .bind(next_version)
        .bind(&input.version_name)
        .bind(meta_snapshot)
        .bind(serde_json::to_value(&input.sections).unwrap_or(Value::Null))
        .bind(Value::Object(schema_snapshot))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    audit::append(
        Some(actor),
        "CMS_PAGE_SAVED",
        "cms_pages",
        Some(page_id.to_string()),
        json!({ "status": page.status, "slug": page.slug }),
    );

    if page.status == PageStatus::Published {
        layout_cache::purge_background();
    }

    Ok(page)
}

/// Restore hands the editor the snapshot to load into its form; the
/// user still has to save. Nothing is written here.
pub async fn restore_payload(page_id: Uuid, version_id: Uuid) -> ServiceResult<CmsPageVersion> {
    let pool = DatabaseManager::pool().await?;
    sqlx::query_as::<_, CmsPageVersion>(
        "SELECT * FROM cms_page_versions WHERE id = $1 AND page_id = $2",
    )
    .bind(version_id)
    .bind(page_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound("Version not found".to_string()))
}

#[derive(Debug, Serialize)]
pub struct PreviewGrant {
    pub preview_token: Uuid,
    pub expires_at: chrono::DateTime<Utc>,
    pub preview_url: String,
}

/// Mint a share link for an unpublished page. Tokens last one hour and
/// each mint replaces the previous token.
pub async fn mint_preview_token(actor: Uuid, page_id: Uuid) -> ServiceResult<PreviewGrant> {
    let token = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(1);

    let pool = DatabaseManager::pool().await?;
    let page = sqlx::query_as::<_, CmsPage>(
        "UPDATE cms_pages SET preview_token = $2, preview_token_expires_at = $3
         WHERE id = $1
         RETURNING *",
    )
    .bind(page_id)
    .bind(token)
    .bind(expires_at)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound("Page not found".to_string()))?;

    audit::append(
        Some(actor),
        "CMS_PREVIEW_MINTED",
        "cms_pages",
        Some(page_id.to_string()),
        json!({ "expires_at": expires_at }),
    );

    Ok(PreviewGrant {
        preview_token: token,
        expires_at,
        preview_url: format!(
            "{}/{}?preview={}",
            crate::config::config().site.base_url,
            page.slug,
            token
        ),
    })
}

/// A rendered public page: meta plus its enabled sections in order.
#[derive(Debug, Serialize)]
pub struct PublicPage {
    pub page: CmsPage,
    pub sections: Vec<CmsSection>,
}

/// Resolve a page for the public site. Published pages are always
/// served; a draft is served only with a live preview token.
pub async fn public_page(slug: &str, preview_token: Option<Uuid>) -> ServiceResult<PublicPage> {
    let pool = DatabaseManager::pool().await?;

    let page = sqlx::query_as::<_, CmsPage>("SELECT * FROM cms_pages WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Page not found".to_string()))?;

    if page.status != PageStatus::Published {
        let authorized = match (preview_token, page.preview_token, page.preview_token_expires_at) {
            (Some(given), Some(stored), Some(expires)) => given == stored && expires > Utc::now(),
            _ => false,
        };
        if !authorized {
            return Err(ServiceError::NotFound("Page not found".to_string()));
        }
    }

    let sections = sqlx::query_as::<_, CmsSection>(
        "SELECT * FROM cms_sections
         WHERE page_id = $1 AND is_enabled = true
         ORDER BY order_index",
    )
    .bind(page.id)
    .fetch_all(&pool)
    .await?;

    Ok(PublicPage { page, sections })
}

#[derive(Debug, Deserialize)]
pub struct CreatePage {
    pub title: String,
    pub slug: String,
}

pub async fn create_page(actor: Uuid, input: CreatePage) -> ServiceResult<CmsPage> {
    let slug = input.slug.trim().to_lowercase();
    if slug.is_empty() {
        return Err(ServiceError::Validation("Page slug is required".to_string()));
    }

    let pool = DatabaseManager::pool().await?;
    let page = sqlx::query_as::<_, CmsPage>(
        "INSERT INTO cms_pages (title, slug, status) VALUES ($1, $2, 'DRAFT') RETURNING *",
    )
    .bind(input.title.trim())
    .bind(&slug)
    .fetch_one(&pool)
    .await
    .map_err(|e| super::conflict_on_unique(e, "A page with this slug already exists"))?;

    audit::append(
        Some(actor),
        "CMS_PAGE_CREATED",
        "cms_pages",
        Some(page.id.to_string()),
        json!({ "slug": slug }),
    );

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(block_type: &str, field_schema: Value) -> CmsBlockDefinition {
        CmsBlockDefinition {
            id: Uuid::new_v4(),
            block_type: block_type.to_string(),
            friendly_name: block_type.to_uppercase(),
            field_schema,
            is_active: true,
        }
    }

    fn section(key: &str) -> SectionInput {
        SectionInput {
            section_key: key.to_string(),
            title: None,
            content: json!({}),
            is_enabled: true,
        }
    }

    #[test]
    fn snapshot_keys_only_the_block_types_in_use() {
        let definitions = vec![
            definition("hero", json!({ "fields": ["headline", "image"] })),
            definition("faq", json!({ "fields": ["items"] })),
            definition("cta", json!({ "fields": ["label", "href"] })),
        ];
        let sections = vec![section("hero"), section("faq")];

        let snapshot = build_schema_snapshot(&definitions, &sections);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["hero"], json!({ "fields": ["headline", "image"] }));
        assert_eq!(snapshot["faq"], json!({ "fields": ["items"] }));
        assert!(!snapshot.contains_key("cta"));
    }

    #[test]
    fn snapshot_survives_later_definition_changes() {
        let sections = vec![section("hero")];

        let v1 = vec![definition("hero", json!({ "fields": ["headline"] }))];
        let snapshot = build_schema_snapshot(&v1, &sections);

        // The block definition evolves after the save; the captured
        // snapshot must keep rendering with the old schema.
        let v2 = vec![definition("hero", json!({ "fields": ["headline", "video"] }))];
        let later = build_schema_snapshot(&v2, &sections);

        assert_eq!(snapshot["hero"], json!({ "fields": ["headline"] }));
        assert_eq!(later["hero"], json!({ "fields": ["headline", "video"] }));
        assert_ne!(snapshot["hero"], later["hero"]);
    }

    #[test]
    fn repeated_sections_of_one_type_collapse_to_one_entry() {
        let definitions = vec![definition("faq", json!({ "fields": ["items"] }))];
        let sections = vec![section("faq"), section("faq")];

        let snapshot = build_schema_snapshot(&definitions, &sections);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn sections_without_a_definition_are_omitted() {
        let definitions = vec![definition("hero", json!({}))];
        let sections = vec![section("hero"), section("retired_block")];

        let snapshot = build_schema_snapshot(&definitions, &sections);
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("hero"));
    }
}
