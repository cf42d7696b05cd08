//! REST router tests over in-process requests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use almanac::{create_router, ApiState, IngestionPipeline, MemoryStore, RestApiConfig};

fn test_router() -> Router {
    let store = Arc::new(MemoryStore::new());
    let pipeline = IngestionPipeline::with_reference_date(
        store.clone(),
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), // a Wednesday
    );
    let state = Arc::new(ApiState::new(pipeline, store));
    create_router(state, &RestApiConfig::default())
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_parse_creates_event() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/parse",
            json!({"text": "Team meeting Thursday at 2pm"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert!(body["event"]["title"]
        .as_str()
        .unwrap()
        .contains("meeting"));
    assert_eq!(body["event"]["allDay"], json!(false));
    assert!(body["message"].as_str().unwrap().starts_with("Added"));

    // The event shows up in the listing.
    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let events = response_json(response).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_parse_without_date_is_bad_request() {
    let response = test_router()
        .oneshot(json_request(
            Method::POST,
            "/api/parse",
            json!({"text": "asdf qwerty"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("date"));
    assert!(body["suggestion"].as_str().unwrap().contains("specific"));
}

#[tokio::test]
async fn test_parse_without_text_is_bad_request() {
    let response = test_router()
        .oneshot(json_request(Method::POST, "/api/parse", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("text is required"));
}

#[tokio::test]
async fn test_parse_conflict_returns_409_and_persists_nothing() {
    let router = test_router();

    router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/parse",
            json!({"text": "Standup Thursday 2pm to 3pm"}),
        ))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/parse",
            json!({"text": "Dentist Thursday at 2:30pm"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("Time conflict"));
    assert_eq!(body["conflicts"].as_array().unwrap().len(), 1);
    assert_eq!(body["suggestedEvent"]["title"], json!("Dentist"));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let events = response_json(response).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_parse_with_force_overrides_conflict() {
    let router = test_router();

    router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/parse",
            json!({"text": "Standup Thursday 2pm to 3pm"}),
        ))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/parse",
            json!({"text": "Dentist Thursday at 2:30pm", "force": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_direct_create_and_delete() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/events",
            json!({
                "title": "Board meeting",
                "start": "2024-01-11T14:00:00Z",
                "end": "2024-01-11T15:00:00Z",
                "allDay": false
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["title"], json!("Board meeting"));

    let response = router
        .clone()
        .oneshot(json_request(
            Method::DELETE,
            "/api/events",
            json!({"id": id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], json!("Event deleted"));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let events = response_json(response).await;
    assert!(events.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_by_legacy_composite_id() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/events",
            json!({
                "title": "Legacy",
                "start": "2024-01-11T14:00:00Z",
                "end": "2024-01-11T15:00:00Z",
                "allDay": false
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::DELETE,
            "/api/events",
            json!({"id": "2024-01-11T14:00:00Z-Legacy"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let events = response_json(response).await;
    assert!(events.as_array().unwrap().is_empty());
}
