//! Page-level validation and content helpers.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::slide::Slide;
use crate::tree;

/// Maximum slug length (characters).
pub const MAX_SLUG_LENGTH: usize = 100;

/// Maximum title length (characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Slugs taken by server routes. `GET /{slug}` would never reach a page
/// with one of these.
pub const RESERVED_SLUGS: &[&str] = &["api", "health", "uploads"];

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));

/// A custom font registered on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    pub name: String,
    pub url: String,
}

/// Validate a URL slug: lowercase letters, digits and hyphens only, and
/// none of [`RESERVED_SLUGS`].
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    validate_slug_with_reserved(slug, &[])
}

/// [`validate_slug`], also rejecting the route segments in `extra`, such as
/// a configured upload prefix.
pub fn validate_slug_with_reserved(slug: &str, extra: &[&str]) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug is required".into()));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Slug exceeds maximum length of {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and hyphens only"
        )));
    }
    if RESERVED_SLUGS.contains(&slug) || extra.contains(&slug) {
        return Err(CoreError::Validation(format!("Slug '{slug}' is reserved")));
    }
    Ok(())
}

/// Validate a page title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title is required".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the custom font list.
pub fn validate_fonts(fonts: &[Font]) -> Result<(), CoreError> {
    for font in fonts {
        if font.name.trim().is_empty() || font.url.trim().is_empty() {
            return Err(CoreError::Validation(
                "Each font needs a name and a url".into(),
            ));
        }
    }
    Ok(())
}

/// Validate a slide sequence before it is saved.
///
/// Slide ids must be unique, and element ids must be unique across the
/// whole page since the editor resolves a selected element by id alone.
pub fn validate_content(slides: &[Slide]) -> Result<(), CoreError> {
    let mut slide_ids = HashSet::new();
    for slide in slides {
        if slide.id.is_empty() {
            return Err(CoreError::Validation("Slide id must not be empty".into()));
        }
        if !slide_ids.insert(slide.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate slide id '{}'",
                slide.id
            )));
        }
    }

    let duplicates = tree::duplicate_ids(slides.iter().map(|s| s.elements.as_slice()));
    if !duplicates.is_empty() {
        return Err(CoreError::Validation(format!(
            "Duplicate element ids: {}",
            duplicates.join(", ")
        )));
    }
    Ok(())
}

/// Parse a stored font list. Anything malformed yields an empty list.
pub fn parse_fonts(value: &serde_json::Value) -> Vec<Font> {
    Vec::<Font>::deserialize(value).unwrap_or_default()
}
