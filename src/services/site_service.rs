use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{FooterLink, LegalDocument, NavigationItem, PlatformSettings};

use super::{audit, layout_cache, ServiceError, ServiceResult};

pub async fn visible_navigation() -> ServiceResult<Vec<NavigationItem>> {
    let pool = DatabaseManager::pool().await?;
    let items = sqlx::query_as::<_, NavigationItem>(
        "SELECT * FROM cms_navigation WHERE is_visible = true ORDER BY order_index",
    )
    .fetch_all(&pool)
    .await?;
    Ok(items)
}

pub async fn visible_footer_links() -> ServiceResult<Vec<FooterLink>> {
    let pool = DatabaseManager::pool().await?;
    let links = sqlx::query_as::<_, FooterLink>(
        "SELECT * FROM cms_footer_links WHERE is_visible = true ORDER BY order_index",
    )
    .fetch_all(&pool)
    .await?;
    Ok(links)
}

pub async fn all_navigation() -> ServiceResult<Vec<NavigationItem>> {
    let pool = DatabaseManager::pool().await?;
    let items =
        sqlx::query_as::<_, NavigationItem>("SELECT * FROM cms_navigation ORDER BY order_index")
            .fetch_all(&pool)
            .await?;
    Ok(items)
}

/// Missing singleton row degrades to defaults rather than a 500; the
/// public site must render before the admin has ever saved settings.
pub async fn platform_settings() -> ServiceResult<PlatformSettings> {
    let pool = DatabaseManager::pool().await?;
    let settings =
        sqlx::query_as::<_, PlatformSettings>("SELECT * FROM platform_settings WHERE id = 1")
            .fetch_optional(&pool)
            .await?;
    Ok(settings.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct SettingsInput {
    pub site_name: String,
    pub meta_title: String,
    pub meta_description: String,
    pub base_url: String,
}

pub async fn save_platform_settings(
    actor: Uuid,
    input: SettingsInput,
) -> ServiceResult<PlatformSettings> {
    let pool = DatabaseManager::pool().await?;
    let settings = sqlx::query_as::<_, PlatformSettings>(
        "INSERT INTO platform_settings (id, site_name, meta_title, meta_description, base_url)
         VALUES (1, $1, $2, $3, $4)
         ON CONFLICT (id) DO UPDATE SET
             site_name = $1, meta_title = $2, meta_description = $3,
             base_url = $4, updated_at = now()
         RETURNING *",
    )
    .bind(&input.site_name)
    .bind(&input.meta_title)
    .bind(&input.meta_description)
    .bind(&input.base_url)
    .fetch_one(&pool)
    .await?;

    audit::append(Some(actor), "SETTINGS_SAVED", "platform_settings", None, json!({}));
    layout_cache::purge_background();

    Ok(settings)
}

#[derive(Debug, Deserialize)]
pub struct NavigationInput {
    pub id: Option<Uuid>,
    pub label: String,
    pub href: String,
    pub page_id: Option<Uuid>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

/// Replace the header navigation wholesale; order comes from array
/// position. The layout cache is purged so the public site picks the
/// change up on the next request.
pub async fn save_navigation(
    actor: Uuid,
    items: Vec<NavigationInput>,
) -> ServiceResult<Vec<NavigationItem>> {
    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM cms_navigation").execute(&mut *tx).await?;

    for (index, item) in items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO cms_navigation (id, label, href, page_id, order_index, is_visible)
             VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4, $5, $6)",
        )
        .bind(item.id)
        .bind(&item.label)
        .bind(&item.href)
        .bind(item.page_id)
        .bind(index as i32)
        .bind(item.is_visible)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    audit::append(
        Some(actor),
        "NAVIGATION_SAVED",
        "cms_navigation",
        None,
        json!({ "items": items.len() }),
    );
    layout_cache::purge_background();

    all_navigation().await
}

pub async fn all_footer_links() -> ServiceResult<Vec<FooterLink>> {
    let pool = DatabaseManager::pool().await?;
    let links =
        sqlx::query_as::<_, FooterLink>("SELECT * FROM cms_footer_links ORDER BY order_index")
            .fetch_all(&pool)
            .await?;
    Ok(links)
}

/// Footer counterpart of save_navigation.
pub async fn save_footer_links(
    actor: Uuid,
    items: Vec<NavigationInput>,
) -> ServiceResult<Vec<FooterLink>> {
    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM cms_footer_links").execute(&mut *tx).await?;

    for (index, item) in items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO cms_footer_links (id, label, href, page_id, order_index, is_visible)
             VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4, $5, $6)",
        )
        .bind(item.id)
        .bind(&item.label)
        .bind(&item.href)
        .bind(item.page_id)
        .bind(index as i32)
        .bind(item.is_visible)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    audit::append(
        Some(actor),
        "FOOTER_SAVED",
        "cms_footer_links",
        None,
        json!({ "items": items.len() }),
    );
    layout_cache::purge_background();

    all_footer_links().await
}

pub async fn legal_documents() -> ServiceResult<Vec<LegalDocument>> {
    let pool = DatabaseManager::pool().await?;
    let docs = sqlx::query_as::<_, LegalDocument>(
        "SELECT * FROM legal_documents ORDER BY doc_type, version DESC",
    )
    .fetch_all(&pool)
    .await?;
    Ok(docs)
}

pub async fn active_legal_document(doc_type: &str) -> ServiceResult<LegalDocument> {
    let pool = DatabaseManager::pool().await?;
    sqlx::query_as::<_, LegalDocument>(
        "SELECT * FROM legal_documents WHERE doc_type = $1 AND is_active = true",
    )
    .bind(doc_type)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound("Document not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct LegalInput {
    pub doc_type: String,
    pub title: String,
    pub content: String,
}

/// Publishing a legal document supersedes the previous active version
/// of the same type. Exactly one version per type is active, enforced
/// by doing both writes in one transaction.
pub async fn publish_legal_document(actor: Uuid, input: LegalInput) -> ServiceResult<LegalDocument> {
    if input.content.trim().is_empty() {
        return Err(ServiceError::Validation("Document content is required".to_string()));
    }

    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE legal_documents SET is_active = false WHERE doc_type = $1 AND is_active = true")
        .bind(&input.doc_type)
        .execute(&mut *tx)
        .await?;

    let next_version: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(version), 0) + 1 FROM legal_documents WHERE doc_type = $1",
    )
    .bind(&input.doc_type)
    .fetch_one(&mut *tx)
    .await?;

    let doc = sqlx::query_as::<_, LegalDocument>(
        "INSERT INTO legal_documents (doc_type, title, content, version, is_active)
         VALUES ($1, $2, $3, $4, true)
         RETURNING *",
    )
    .bind(&input.doc_type)
    .bind(&input.title)
    .bind(&input.content)
    .bind(next_version)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    audit::append(
        Some(actor),
        "LEGAL_PUBLISHED",
        "legal_documents",
        Some(doc.id.to_string()),
        json!({ "doc_type": doc.doc_type, "version": doc.version }),
    );

    Ok(doc)
}

const STATIC_SITEMAP_ROUTES: &[&str] = &["", "/marketplace", "/auth/login", "/auth/register"];

/// Assemble the sitemap from the fixed public routes plus every
/// published page that opted in.
pub async fn sitemap_xml() -> ServiceResult<String> {
    let pool = DatabaseManager::pool().await?;
    let slugs: Vec<String> = sqlx::query_scalar(
        "SELECT slug FROM cms_pages
         WHERE status = 'PUBLISHED' AND sitemap_enabled = true
         ORDER BY slug",
    )
    .fetch_all(&pool)
    .await?;

    let base = crate::config::config().site.base_url.trim_end_matches('/').to_string();
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for route in STATIC_SITEMAP_ROUTES {
        xml.push_str(&format!("  <url><loc>{}{}</loc></url>\n", base, route));
    }
    for slug in &slugs {
        xml.push_str(&format!("  <url><loc>{}/{}</loc></url>\n", base, slug));
    }
    xml.push_str("</urlset>\n");
    Ok(xml)
}
