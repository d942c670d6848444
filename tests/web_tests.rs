//! HTTP API tests
//!
//! Requests are sent straight to the router without binding a socket.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use fragment_matcher::utils::validation::{MAX_ANNOTATION_BYTES, MAX_REQUEST_SIGNS};
use fragment_matcher::web::server::create_router;
use fragment_matcher::CorpusStore;

fn app() -> Router {
    create_router(CorpusStore::load_embedded().expect("embedded corpus loads"))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn search_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

#[tokio::test]
async fn test_healthz() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}

#[tokio::test]
async fn test_search_scores_annotation() {
    let body = serde_json::json!({ "id": "K.1", "signs": "LUD LUD X BEL\nME QI" });
    let (status, json) = send(app(), search_request(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fragment_id"], "K.1");
    assert_eq!(json["sign_count"], 5);
    assert_eq!(json["candidates"][0]["chapter_id"], "L.1.2-SB-I");
    assert_eq!(json["candidates"][0]["text_name"], "Ludlul bēl nēmeqi");
}

#[tokio::test]
async fn test_search_outside_bounds_is_skipped() {
    let body = serde_json::json!({ "signs": "LUD LUD BEL", "min_signs": 4 });
    let (status, json) = send(app(), search_request(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "fragment_id": "query", "notes": "" }));
}

#[tokio::test]
async fn test_search_rejects_inverted_bounds() {
    let body = serde_json::json!({ "signs": "LUD", "min_signs": 5, "max_signs": 1 });
    let (status, json) = send(app(), search_request(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_configuration");
}

#[tokio::test]
async fn test_search_rejects_max_signs_above_server_limit() {
    let body = serde_json::json!({ "signs": "LUD LUD BEL", "max_signs": 1_000_000 });
    let (status, json) = send(app(), search_request(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_configuration");

    let body = serde_json::json!({ "signs": "LUD LUD BEL", "max_signs": MAX_REQUEST_SIGNS });
    let (status, _) = send(app(), search_request(&body)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_search_rejects_control_characters() {
    let body = serde_json::json!({ "signs": "LUD\u{0}BEL" });
    let (status, json) = send(app(), search_request(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_annotation");
}

#[tokio::test]
async fn test_search_rejects_oversized_annotation() {
    let signs = "A ".repeat(MAX_ANNOTATION_BYTES / 2 + 1);
    let body = serde_json::json!({ "signs": signs });
    let (status, json) = send(app(), search_request(&body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error_type"], "invalid_annotation");
}

#[tokio::test]
async fn test_search_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"signs\": "))
        .unwrap();
    let (status, _) = send(app(), request).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_corpus_summary() {
    let request = Request::builder()
        .uri("/api/corpus")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 5);
    assert_eq!(json["texts"].as_array().unwrap().len(), 3);
    assert_eq!(json["texts"][0]["id"], "I.1");
}
