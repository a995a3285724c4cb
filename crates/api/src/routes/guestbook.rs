use axum::routing::{get, post};
use axum::Router;

use crate::handlers::guestbook;
use crate::state::AppState;

/// Guestbook routes, mounted directly under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/guestbook/{page_id}",
            get(guestbook::list_threads).post(guestbook::create_entry),
        )
        .route("/guestbook-like/{id}", post(guestbook::toggle_like))
}
