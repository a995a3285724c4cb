use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{pages, rsvp};
use crate::state::AppState;

/// Routes mounted at `/pages`.
///
/// ```text
/// GET, POST          /                list, create
/// GET, DELETE        /{id}            get, delete
/// PUT                /{id}/metadata   update title, slug, description, publish flag
/// PUT                /{id}/content    editor save
/// POST               /{id}/edits      apply an edit batch
/// GET                /{id}/preview    rendered HTML preview
/// GET, POST          /{id}/rsvps      list, submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::list_pages).post(pages::create_page))
        .route("/{id}", get(pages::get_page).delete(pages::delete_page))
        .route("/{id}/metadata", put(pages::update_metadata))
        .route("/{id}/content", put(pages::save_content))
        .route("/{id}/edits", post(pages::apply_edits))
        .route("/{id}/preview", get(pages::preview))
        .route("/{id}/rsvps", get(rsvp::list_rsvps).post(rsvp::create_rsvp))
}
