use std::sync::Arc;

use invito_core::render::RenderOptions;
use invito_db::store::PageStore;

use crate::cache::RenderCache;
use crate::config::ServerConfig;
use crate::uploads::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Page, guestbook and RSVP persistence.
    pub store: Arc<dyn PageStore>,
    /// Destination for uploaded files.
    pub uploads: Arc<dyn UploadStore>,
    /// Rendered HTML keyed by slug or page id.
    pub render_cache: Arc<RenderCache>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            allow_scripts: self.config.allow_slide_scripts,
            ..RenderOptions::default()
        }
    }
}
