use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Rendered pages at the site root: `GET /{slug}`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}", get(public::render_by_slug))
}

/// Routes mounted at `/public`.
pub fn api_router() -> Router<AppState> {
    Router::new().route("/pages/{slug}", get(public::get_public_page))
}
