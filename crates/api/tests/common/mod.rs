#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use invito_api::cache::RenderCache;
use invito_api::config::ServerConfig;
use invito_api::router::build_app_router;
use invito_api::state::AppState;
use invito_api::uploads::LocalUploadStore;
use invito_db::store::MemoryStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir,
        upload_url_prefix: "/uploads".to_string(),
        max_upload_bytes: 1024 * 1024,
        allow_slide_scripts: false,
        database_url: None,
    }
}

/// The application under test plus the temporary upload directory it
/// writes into. The directory is removed when this is dropped.
pub struct TestApp {
    router: Router,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router on an in-memory store.
///
/// Uses [`build_app_router`], so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app() -> TestApp {
    build_test_app_with(|_| {})
}

/// Like [`build_test_app`], with a hook to adjust the configuration.
pub fn build_test_app_with(configure: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let mut config = test_config(upload_dir.path().to_path_buf());
    configure(&mut config);

    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        uploads: Arc::new(LocalUploadStore::new(
            &config.upload_dir,
            config.upload_url_prefix.clone(),
        )),
        render_cache: Arc::new(RenderCache::new()),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        upload_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a page through the API and return its JSON representation.
pub async fn create_page(app: Router, slug: &str, is_published: bool) -> Value {
    let response = post_json(
        app,
        "/api/v1/pages",
        json!({
            "title": format!("Page {slug}"),
            "slug": slug,
            "description": null,
            "is_published": is_published,
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "creating page {slug}");
    body_json(response).await["data"].clone()
}

/// One slide holding a heading text element and a container with a button.
pub fn sample_slides() -> Value {
    json!([
        {
            "id": "s1",
            "name": "Welcome",
            "background": "#fdf6e3",
            "transition": "fade",
            "elements": [
                {
                    "id": "t1",
                    "type": "text",
                    "props": { "content": "You are invited", "fontSize": "32px" }
                },
                {
                    "id": "c1",
                    "type": "container",
                    "props": { "layout": "grid", "columns": 2 },
                    "children": [
                        {
                            "id": "b1",
                            "type": "button",
                            "props": { "text": "Say yes", "link": "#rsvp" }
                        }
                    ]
                }
            ]
        }
    ])
}

/// Save `slides` as the content of page `id`.
pub async fn save_slides(app: Router, id: i64, slides: Value, is_published: bool) -> Value {
    let response = put_json(
        app,
        &format!("/api/v1/pages/{id}/content"),
        json!({ "slides": slides, "is_published": is_published, "fonts": [] }),
    )
    .await;
    assert_eq!(response.status(), 200, "saving content of page {id}");
    body_json(response).await["data"].clone()
}
