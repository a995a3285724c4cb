pub mod guestbook;
pub mod health;
pub mod pages;
pub mod public;
pub mod upload;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /pages                                   list, create (dashboard)
/// /pages/{id}                              get, delete
/// /pages/{id}/metadata                     update settings (PUT)
/// /pages/{id}/content                      save content (PUT)
/// /pages/{id}/edits                        apply edit batch (POST)
/// /pages/{id}/preview                      rendered preview (GET)
/// /pages/{id}/rsvps                        list (dashboard), submit (public)
///
/// /public/pages/{slug}                     published page JSON
///
/// /guestbook/{page_id}                     threads, post entry (public)
/// /guestbook-like/{id}                     toggle like (public)
///
/// /upload                                  multipart file upload
/// ```
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/pages", pages::router())
        .nest("/public", public::api_router())
        .merge(guestbook::router())
        .merge(upload::router(max_upload_bytes))
}
