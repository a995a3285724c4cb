//! Handlers for published pages.
//!
//! `GET /{slug}` serves the rendered invitation; `GET /api/v1/public/pages/{slug}`
//! serves the same page as JSON. Both hide unpublished pages unless
//! `?preview=true` is given.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use invito_core::error::CoreError;
use invito_core::render::not_found_document;
use invito_db::models::page::{Page, PageDetail};
use serde::Deserialize;

use crate::cache::{CacheKey, Lookup};
use crate::error::{AppError, AppResult};
use crate::handlers::pages::render_stored_page;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub preview: bool,
}

/// GET /{slug}
///
/// Published renders are cached by slug. Previews of unpublished pages are
/// rendered on every request.
pub async fn render_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Response> {
    let key = CacheKey::Public(slug.clone());
    let generation = if query.preview {
        None
    } else {
        match state.render_cache.lookup(&key).await {
            Lookup::Hit(html) => return Ok(Html(html).into_response()),
            Lookup::Miss(generation) => Some(generation),
        }
    };

    let Some(page) = find_visible(&state, &slug, query.preview).await? else {
        tracing::debug!(slug = %slug, "No visible page for slug");
        let body = not_found_document("This invitation does not exist or is not published.");
        return Ok((StatusCode::NOT_FOUND, Html(body)).into_response());
    };

    let html = render_stored_page(&state, &page);
    if let Some(generation) = generation.filter(|_| page.is_published) {
        state
            .render_cache
            .insert_if_fresh(key, generation, html.clone())
            .await;
    }
    Ok(Html(html).into_response())
}

/// GET /api/v1/public/pages/{slug}
pub async fn get_public_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Json<DataResponse<PageDetail>>> {
    let page = find_visible(&state, &slug, query.preview)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", &slug)))?;

    Ok(Json(DataResponse {
        data: PageDetail::from(page),
    }))
}

async fn find_visible(state: &AppState, slug: &str, preview: bool) -> AppResult<Option<Page>> {
    let page = state.store.get_page_by_slug(slug).await?;
    Ok(page.filter(|p| p.is_visible(preview)))
}
