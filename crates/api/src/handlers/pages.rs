//! Handlers for the `/pages` resource.
//!
//! Dashboard CRUD for pages plus the editor save, the server-side edit
//! batch and the cached editor preview. Every write that changes what a
//! page looks like invalidates its cached renders.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use invito_core::editor::{EditCommand, PageEditor};
use invito_core::error::CoreError;
use invito_core::page::{
    validate_content, validate_fonts, validate_slug_with_reserved, validate_title,
};
use invito_core::render::{render_page, RenderPage};
use invito_core::slide::assign_missing_ids;
use invito_core::types::DbId;
use invito_db::models::page::{CreatePage, Page, PageDetail, SavePageContent, UpdatePageMetadata};
use serde::Deserialize;

use crate::cache::{CacheKey, Lookup};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /pages/{id}/edits`.
#[derive(Debug, Deserialize)]
pub struct ApplyEdits {
    pub commands: Vec<EditCommand>,
    /// Publish flag to save with. Keeps the stored flag when absent.
    pub is_published: Option<bool>,
    pub expected_version: Option<i64>,
}

/// GET /api/v1/pages
pub async fn list_pages(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Page>>>> {
    let pages = state.store.list_pages().await?;
    Ok(Json(DataResponse { data: pages }))
}

/// POST /api/v1/pages
pub async fn create_page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePage>,
) -> AppResult<(StatusCode, Json<DataResponse<PageDetail>>)> {
    validate_title(&input.title)?;
    validate_page_slug(&state, &input.slug)?;

    let page = state.store.create_page(&input).await?;
    tracing::info!(page_id = page.id, slug = %page.slug, user_id = %user.user_id, "Page created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PageDetail::from(page),
        }),
    ))
}

/// GET /api/v1/pages/{id}
pub async fn get_page(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PageDetail>>> {
    let page = ensure_page_exists(&state, id).await?;
    Ok(Json(DataResponse {
        data: PageDetail::from(page),
    }))
}

/// PUT /api/v1/pages/{id}/metadata
///
/// Title, slug, description and publish flag. A slug change invalidates the
/// renders cached under both the old and the new slug.
pub async fn update_metadata(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePageMetadata>,
) -> AppResult<Json<DataResponse<PageDetail>>> {
    validate_title(&input.title)?;
    validate_page_slug(&state, &input.slug)?;

    let existing = ensure_page_exists(&state, id).await?;
    let page = state
        .store
        .update_page_metadata(id, &input)
        .await?
        .ok_or_else(|| page_not_found(id))?;

    state.render_cache.invalidate_page(id, &existing.slug).await;
    if existing.slug != page.slug {
        state.render_cache.invalidate_page(id, &page.slug).await;
    }

    tracing::info!(page_id = id, slug = %page.slug, "Page metadata updated");
    Ok(Json(DataResponse {
        data: PageDetail::from(page),
    }))
}

/// PUT /api/v1/pages/{id}/content
///
/// Editor save. Without `expected_version` the last save wins; with it a
/// stale save is rejected with 409. Slides sent without an id get the
/// positional one they would have on read.
pub async fn save_content(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<SavePageContent>,
) -> AppResult<Json<DataResponse<PageDetail>>> {
    assign_missing_ids(&mut input.slides);
    let page = persist_content(&state, id, &input).await?;
    Ok(Json(DataResponse {
        data: PageDetail::from(page),
    }))
}

/// POST /api/v1/pages/{id}/edits
///
/// Apply a batch of editor commands to the stored slides, then save.
pub async fn apply_edits(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApplyEdits>,
) -> AppResult<Json<DataResponse<PageDetail>>> {
    let page = ensure_page_exists(&state, id).await?;

    let command_count = input.commands.len();
    let mut editor = PageEditor::new(page.slides());
    for command in input.commands {
        editor.apply(command);
    }

    let save = SavePageContent {
        slides: editor.into_slides(),
        is_published: input.is_published.unwrap_or(page.is_published),
        fonts: page.font_list(),
        expected_version: input.expected_version,
    };
    let page = persist_content(&state, id, &save).await?;

    tracing::debug!(page_id = id, command_count, "Applied edit batch");
    Ok(Json(DataResponse {
        data: PageDetail::from(page),
    }))
}

/// GET /api/v1/pages/{id}/preview
///
/// The page rendered as it will be published, regardless of its publish
/// flag. Cached until the next write to the page.
pub async fn preview(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Html<String>> {
    let key = CacheKey::Preview(id);
    let generation = match state.render_cache.lookup(&key).await {
        Lookup::Hit(html) => return Ok(Html(html)),
        Lookup::Miss(generation) => generation,
    };

    let page = ensure_page_exists(&state, id).await?;
    let html = render_stored_page(&state, &page);
    state
        .render_cache
        .insert_if_fresh(key, generation, html.clone())
        .await;
    Ok(Html(html))
}

/// DELETE /api/v1/pages/{id}
pub async fn delete_page(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let page = ensure_page_exists(&state, id).await?;
    if !state.store.delete_page(id).await? {
        return Err(page_not_found(id));
    }
    state.render_cache.invalidate_page(id, &page.slug).await;

    tracing::info!(page_id = id, slug = %page.slug, "Page deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a page or fail with 404.
pub(crate) async fn ensure_page_exists(state: &AppState, id: DbId) -> AppResult<Page> {
    state
        .store
        .get_page_by_id(id)
        .await?
        .ok_or_else(|| page_not_found(id))
}

/// Load a page guests may interact with. Unpublished pages are 404, the
/// same as at their public slug.
pub(crate) async fn ensure_page_published(state: &AppState, id: DbId) -> AppResult<Page> {
    let page = ensure_page_exists(state, id).await?;
    if !page.is_visible(false) {
        return Err(page_not_found(id));
    }
    Ok(page)
}

/// Slugs must not shadow a server route, including the configured upload
/// prefix.
fn validate_page_slug(state: &AppState, slug: &str) -> Result<(), CoreError> {
    let upload_segment = state
        .config
        .upload_url_prefix
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default();
    validate_slug_with_reserved(slug, &[upload_segment])
}

pub(crate) fn page_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Page", id))
}

/// Render a stored page with the server's render options.
pub(crate) fn render_stored_page(state: &AppState, page: &Page) -> String {
    let slides = page.slides();
    let fonts = page.font_list();
    render_page(
        &RenderPage {
            page_id: page.id,
            title: &page.title,
            slides: &slides,
            fonts: &fonts,
        },
        &state.render_options(),
    )
}

async fn persist_content(state: &AppState, id: DbId, input: &SavePageContent) -> AppResult<Page> {
    validate_content(&input.slides)?;
    validate_fonts(&input.fonts)?;

    let page = state
        .store
        .replace_page_content(id, input)
        .await?
        .ok_or_else(|| page_not_found(id))?;
    state.render_cache.invalidate_page(id, &page.slug).await;

    tracing::info!(
        page_id = id,
        version = page.version,
        slide_count = input.slides.len(),
        "Page content saved"
    );
    Ok(page)
}
