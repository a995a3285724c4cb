//! Page entity model and DTOs.

use invito_core::page::{self, Font};
use invito_core::slide::{self, Slide};
use invito_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A page row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Slide list as stored. Use [`Page::slides`] to read it.
    pub content: serde_json::Value,
    pub is_published: bool,
    pub fonts: serde_json::Value,
    /// Bumped on every content save.
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Page {
    /// Parsed slides. Malformed content reads as an empty list.
    pub fn slides(&self) -> Vec<Slide> {
        match slide::parse_slides(&self.content) {
            Ok(slides) => slides,
            Err(e) => {
                tracing::warn!(page_id = self.id, error = %e, "Stored page content is malformed");
                Vec::new()
            }
        }
    }

    /// Parsed custom fonts. Malformed data reads as an empty list.
    pub fn font_list(&self) -> Vec<Font> {
        page::parse_fonts(&self.fonts)
    }

    /// Whether the page may be served at its public slug.
    pub fn is_visible(&self, preview: bool) -> bool {
        self.is_published || preview
    }
}

/// A page with its content decoded, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct PageDetail {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub slides: Vec<Slide>,
    pub is_published: bool,
    pub fonts: Vec<Font>,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Page> for PageDetail {
    fn from(page: Page) -> Self {
        let slides = page.slides();
        let fonts = page.font_list();
        Self {
            id: page.id,
            slug: page.slug,
            title: page.title,
            description: page.description,
            slides,
            is_published: page.is_published,
            fonts,
            version: page.version,
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

/// DTO for creating a new page. Content starts empty.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

/// DTO for the page settings form.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePageMetadata {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_published: bool,
}

/// DTO for an editor save. Replaces content, publish flag and fonts.
///
/// Without `expected_version` the save always wins. With it, the save is
/// rejected when the stored version has moved on.
#[derive(Debug, Clone, Deserialize)]
pub struct SavePageContent {
    pub slides: Vec<Slide>,
    pub is_published: bool,
    #[serde(default)]
    pub fonts: Vec<Font>,
    pub expected_version: Option<i64>,
}
