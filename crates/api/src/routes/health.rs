//! Liveness endpoint for load balancers and uptime checks.
//!
//! Mounted at the root, beside the rendered pages, so it answers even when
//! the `/api/v1` tree is proxied elsewhere. `health` is a reserved slug for
//! the same reason.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    /// `ok`, or `degraded` while the page store is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    /// `postgres` or `memory`.
    pub store: &'static str,
    pub store_reachable: bool,
}

async fn service_health(State(state): State<AppState>) -> Json<ServiceHealth> {
    let store_reachable = state.store.health_check().await;
    let store = if state.config.database_url.is_some() {
        "postgres"
    } else {
        "memory"
    };

    Json(ServiceHealth {
        status: if store_reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store,
        store_reachable,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(service_health))
}
