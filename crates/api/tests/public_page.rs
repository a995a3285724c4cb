//! Integration tests for rendered pages at `/{slug}` and the public page JSON.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, create_page, get, sample_slides, save_slides};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: a published page renders as HTML
// ---------------------------------------------------------------------------

#[tokio::test]
async fn published_page_renders_html() {
    let app = common::build_test_app();
    let id = create_page(app.router(), "gala", false).await["id"]
        .as_i64()
        .unwrap();
    save_slides(app.router(), id, sample_slides(), true).await;

    let response = get(app.router(), "/gala").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains("<title>Page gala</title>"));
    assert!(html.contains("data-element-id=\"b1\""));
    assert!(html.contains("Say yes"));
}

// ---------------------------------------------------------------------------
// Test: unpublished pages are hidden unless previewed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unpublished_page_is_404_without_preview() {
    let app = common::build_test_app();
    let id = create_page(app.router(), "secret", false).await["id"]
        .as_i64()
        .unwrap();
    save_slides(app.router(), id, sample_slides(), false).await;

    let response = get(app.router(), "/secret").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(!html.contains("You are invited"));

    let response = get(app.router(), "/secret?preview=true").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("You are invited"));
}

// ---------------------------------------------------------------------------
// Test: unknown slug renders the HTML 404 page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_slug_returns_html_404() {
    let app = common::build_test_app();

    let response = get(app.router(), "/nobody-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("<h1>404</h1>"));
}

// ---------------------------------------------------------------------------
// Test: cached public render is replaced after a save
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_invalidates_cached_public_render() {
    let app = common::build_test_app();
    let id = create_page(app.router(), "cached", false).await["id"]
        .as_i64()
        .unwrap();
    save_slides(app.router(), id, sample_slides(), true).await;

    let first = body_text(get(app.router(), "/cached").await).await;
    assert!(first.contains("You are invited"));

    let mut slides = sample_slides();
    slides[0]["elements"][0]["props"]["content"] = json!("New date announced");
    save_slides(app.router(), id, slides, true).await;

    let second = body_text(get(app.router(), "/cached").await).await;
    assert!(second.contains("New date announced"));

    // Unpublishing hides the page even though it was cached.
    save_slides(app.router(), id, sample_slides(), false).await;
    assert_eq!(get(app.router(), "/cached").await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: slide scripts follow the server switch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slide_scripts_are_emitted_only_when_enabled() {
    let mut slides = sample_slides();
    slides[0]["script"] = json!("document.body.dataset.ready = '1';");

    let disabled = common::build_test_app();
    let id = create_page(disabled.router(), "plain", false).await["id"]
        .as_i64()
        .unwrap();
    save_slides(disabled.router(), id, slides.clone(), true).await;
    let html = body_text(get(disabled.router(), "/plain").await).await;
    assert!(!html.contains("dataset.ready"));

    let enabled = common::build_test_app_with(|config| config.allow_slide_scripts = true);
    let id = create_page(enabled.router(), "scripted", false).await["id"]
        .as_i64()
        .unwrap();
    save_slides(enabled.router(), id, slides, true).await;
    let html = body_text(get(enabled.router(), "/scripted").await).await;
    assert!(html.contains("dataset.ready"));
}

// ---------------------------------------------------------------------------
// Test: public page JSON follows the same publish gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn public_page_json_respects_publish_flag() {
    let app = common::build_test_app();
    let id = create_page(app.router(), "json-page", false).await["id"]
        .as_i64()
        .unwrap();
    save_slides(app.router(), id, sample_slides(), false).await;

    let response = get(app.router(), "/api/v1/public/pages/json-page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app.router(), "/api/v1/public/pages/json-page?preview=true").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["id"], id);
    assert_eq!(page["slides"][0]["id"], "s1");
}

// ---------------------------------------------------------------------------
// Test: countdown and guestbook come with the widget script and its hooks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn widgets_render_with_their_client_script() {
    let app = common::build_test_app();
    let id = create_page(app.router(), "live", false).await["id"]
        .as_i64()
        .unwrap();
    let slides = json!([{
        "id": "s1",
        "name": "Live",
        "elements": [
            { "id": "cd", "type": "countdown", "props": { "targetDate": "2099-01-01T00:00" } },
            { "id": "gb", "type": "guestbook", "props": { "title": "Wishes" } }
        ]
    }]);
    save_slides(app.router(), id, slides, true).await;

    let html = body_text(get(app.router(), "/live").await).await;
    assert!(html.contains("data-target=\"2099-01-01T00:00:00\""));
    assert!(html.contains(&format!("data-endpoint=\"/api/v1/guestbook/{id}\"")));
    assert!(html.contains("data-like-endpoint=\"/api/v1/guestbook-like\""));
    assert_eq!(html.matches("<script data-widgets").count(), 1);

    // The endpoint the widget reads from answers for this page.
    let response = get(app.router(), &format!("/api/v1/guestbook/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}
