use once_cell::sync::Lazy;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::database::models::{FooterLink, NavigationItem, PlatformSettings};

use super::{site_service, ServiceResult};

/// The layout-level data (header navigation, footer links, site
/// settings) served with every public page. Cached in-process and
/// purged by POST /api/revalidate.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub navigation: Vec<NavigationItem>,
    pub footer_links: Vec<FooterLink>,
    pub settings: PlatformSettings,
}

static CACHE: Lazy<RwLock<Option<Layout>>> = Lazy::new(|| RwLock::new(None));

/// Fetch the layout, populating the cache on miss.
pub async fn layout() -> ServiceResult<Layout> {
    {
        let cached = CACHE.read().await;
        if let Some(layout) = cached.as_ref() {
            return Ok(layout.clone());
        }
    }

    let navigation = site_service::visible_navigation().await?;
    let footer_links = site_service::visible_footer_links().await?;
    let settings = site_service::platform_settings().await?;

    let layout = Layout {
        navigation,
        footer_links,
        settings,
    };

    {
        let mut cached = CACHE.write().await;
        *cached = Some(layout.clone());
    }

    Ok(layout)
}

/// Drop the cached layout; the next read repopulates it.
pub async fn purge() {
    let mut cached = CACHE.write().await;
    *cached = None;
    tracing::info!("layout cache purged");
}

/// Best-effort purge used by CMS publish: never fails the save.
pub fn purge_background() {
    tokio::spawn(async {
        purge().await;
    });
}
