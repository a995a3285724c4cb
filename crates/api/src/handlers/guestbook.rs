//! Handlers for guestbook entries and likes.
//!
//! These endpoints are called by the guestbook widget on public pages, so
//! they take no [`AuthUser`](crate::middleware::auth::AuthUser) and return
//! bare JSON rather than the `{ "data": ... }` envelope. Pages that are not
//! published have no guestbook as far as guests can tell.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use invito_core::error::CoreError;
use invito_core::guestbook::{build_threads, validate_entry, Thread};
use invito_core::types::DbId;
use invito_db::models::guestbook::{CreateGuestbookEntry, GuestbookEntry, LikeToggle};

use crate::error::AppResult;
use crate::handlers::pages::ensure_page_published;
use crate::middleware::session::GuestSession;
use crate::state::AppState;

/// GET /api/v1/guestbook/{page_id}
///
/// Entries of the page as reply threads, oldest first at every level.
pub async fn list_threads(
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<Json<Vec<Thread<GuestbookEntry>>>> {
    ensure_page_published(&state, page_id).await?;
    let entries = state.store.list_guestbook_entries(page_id).await?;
    Ok(Json(build_threads(entries)))
}

/// POST /api/v1/guestbook/{page_id}
///
/// A reply's parent must belong to the same page.
pub async fn create_entry(
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<CreateGuestbookEntry>,
) -> AppResult<(StatusCode, Json<GuestbookEntry>)> {
    let (name, message) = validate_entry(&input.name, &input.message)?;
    ensure_page_published(&state, page_id).await?;

    if let Some(parent_id) = input.parent_id {
        let parent = state.store.find_guestbook_entry(parent_id).await?;
        match parent {
            Some(parent) if parent.page_id == page_id => {}
            Some(_) => {
                return Err(CoreError::Validation(
                    "Parent entry belongs to a different page".into(),
                )
                .into())
            }
            None => return Err(CoreError::not_found("GuestbookEntry", parent_id).into()),
        }
    }

    let entry = state
        .store
        .create_guestbook_entry(
            page_id,
            &CreateGuestbookEntry {
                name,
                message,
                parent_id: input.parent_id,
            },
        )
        .await?;

    tracing::info!(
        page_id,
        entry_id = entry.id,
        parent_id = ?entry.parent_id,
        "Guestbook entry created"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/v1/guestbook-like/{id}
///
/// Toggle the guest's like on an entry. Issues the session cookie on the
/// guest's first like.
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    session: GuestSession,
) -> AppResult<(GuestSession, Json<LikeToggle>)> {
    let entry = state.store.find_guestbook_entry(id).await?;
    let page = match entry {
        Some(entry) => state.store.get_page_by_id(entry.page_id).await?,
        None => None,
    };
    if !page.is_some_and(|page| page.is_visible(false)) {
        return Err(CoreError::not_found("GuestbookEntry", id).into());
    }

    let toggle = state.store.toggle_like(id, &session.id).await?;
    tracing::debug!(entry_id = id, liked = toggle.liked, "Guestbook like toggled");
    Ok((session, Json(toggle)))
}
