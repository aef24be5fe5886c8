//! HTTP API Tests
//!
//! Router-level tests through `tower::ServiceExt::oneshot`, plus one
//! end-to-end WebSocket test against a bound listener.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use futures_util::StreamExt;
use formflow::core::FormService;
use formflow::http_server::{HttpServer, HttpServerConfig, CALLER_HEADER};
use formflow::schema::{FieldSchema, Form};
use formflow::store::MemFormStore;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (Arc<FormService>, Router) {
    let service = Arc::new(FormService::new(Arc::new(MemFormStore::new())));
    let router = HttpServer::with_config(HttpServerConfig::default(), service.clone()).router();
    (service, router)
}

fn published_form(service: &FormService) -> Form {
    let form = Form::new(
        "Feedback",
        vec![
            FieldSchema::text("name", "Name").required(),
            FieldSchema::rating("score", "Score"),
        ],
    )
    .owned_by("alice")
    .published();
    service.store().save_form(&form).unwrap();
    form
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, caller: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(caller) = caller {
        builder = builder.header(CALLER_HEADER, caller);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, caller: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(caller) = caller {
        builder = builder.header(CALLER_HEADER, caller);
    }
    builder.body(Body::empty()).unwrap()
}

// =============================================================================
// Health & Metrics
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (_, router) = setup();
    let (status, body) = send(&router, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_metrics_reflect_submissions() {
    let (service, router) = setup();
    let form = published_form(&service);
    let uri = format!("/api/forms/{}/responses", form.id);
    send(&router, json_request("POST", &uri, None, json!({"answers": {"name": "Ann"}}))).await;
    send(&router, json_request("POST", &uri, None, json!({"answers": {}}))).await;

    let (status, body) = send(&router, get("/observability/metrics", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submissions_accepted"], 1);
    assert_eq!(body["submissions_rejected"], 1);
}

#[tokio::test]
async fn test_cors_preflight_from_local_frontend() {
    let (_, router) = setup();
    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/forms")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", CALLER_HEADER)
            .body(Body::empty())
            .unwrap()
    };

    let response = router
        .clone()
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );

    let response = router
        .clone()
        .oneshot(preflight("http://evil.example"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

// =============================================================================
// Submissions
// =============================================================================

#[tokio::test]
async fn test_submit_accepted() {
    let (service, router) = setup();
    let form = published_form(&service);

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            &format!("/api/forms/{}/responses", form.id),
            None,
            json!({"answers": {"name": "Ann", "score": 4}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["formId"], form.id);
    assert_eq!(body["answers"]["score"], 4);
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn test_submit_errors() {
    let (service, router) = setup();
    let form = published_form(&service);
    let uri = format!("/api/forms/{}/responses", form.id);

    let (status, body) = send(
        &router,
        json_request("POST", &uri, None, json!({"answers": {"name": "Ann", "score": 9}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FORM_OUT_OF_RANGE");
    assert_eq!(body["status"], 400);

    let (status, body) = send(
        &router,
        json_request("POST", "/api/forms/nope/responses", None, json!({"answers": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "FORM_NOT_FOUND");

    let request = Request::builder()
        .method("POST")
        .uri(&uri)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_BODY");
}

// =============================================================================
// Form Lifecycle
// =============================================================================

#[tokio::test]
async fn test_form_lifecycle() {
    let (_, router) = setup();
    let draft = json!({
        "title": "Event signup",
        "fields": [
            {"id": "email", "label": "Email", "type": "text", "required": true, "isPII": true},
            {"id": "track", "label": "Track", "type": "single_choice", "required": true, "options": ["web", "systems"]}
        ]
    });

    let (status, _) = send(&router, json_request("POST", "/api/forms", None, draft.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = send(&router, json_request("POST", "/api/forms", Some("alice"), draft)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "draft");
    assert_eq!(created["ownerId"], "alice");
    let id = created["id"].as_str().unwrap().to_string();

    // Drafts do not accept submissions
    let (status, body) = send(
        &router,
        json_request(
            "POST",
            &format!("/api/forms/{}/responses", id),
            None,
            json!({"answers": {"email": "a@b.c", "track": "web"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FORM_NOT_PUBLISHED");

    let (status, updated) = send(
        &router,
        json_request("PUT", &format!("/api/forms/{}", id), Some("alice"), json!({"status": "published"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "published");

    let (status, body) = send(
        &router,
        json_request(
            "PUT",
            &format!("/api/forms/{}", id),
            Some("alice"),
            json!({"fields": [{"id": "x", "label": "X", "type": "text", "required": true}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "FORM_IMMUTABLE");

    let (status, list) = send(&router, get("/api/forms", Some("alice"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, list) = send(&router, get("/api/forms", Some("bob"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_definition_rejected() {
    let (_, router) = setup();
    let draft = json!({
        "title": "Untitled Form",
        "fields": [{"id": "q", "label": "Q", "type": "text", "required": true}]
    });
    let (status, body) = send(&router, json_request("POST", "/api/forms", Some("alice"), draft)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FORM_INVALID_DEFINITION");
}

// =============================================================================
// Analytics
// =============================================================================

#[tokio::test]
async fn test_analytics_owner_only() {
    let (service, router) = setup();
    let form = published_form(&service);
    service
        .submit(&form.id, serde_json::from_value(json!({"name": "Ann", "score": 3})).unwrap())
        .unwrap();

    let uri = format!("/api/forms/{}/analytics", form.id);
    let (status, report) = send(&router, get(&uri, Some("alice"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["count"], 1);
    assert_eq!(report["averageRating"]["score"], 3.0);
    assert_eq!(report["responseTrends"].as_array().unwrap().len(), 7);
    assert_eq!(report["fieldBreakdown"]["name"]["buckets"]["Ann"], 1);

    let (status, _) = send(&router, get(&uri, Some("bob"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&router, get(&uri, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Live Channel
// =============================================================================

#[tokio::test]
async fn test_websocket_unknown_form_is_refused() {
    let (_, router) = setup();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });

    let result = tokio_tungstenite::connect_async(format!("ws://{}/ws/forms/nope", addr)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_websocket_receives_response_created() {
    let (service, router) = setup();
    let form = published_form(&service);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws/forms/{}", addr, form.id))
        .await
        .unwrap();

    // The subscription is registered after the upgrade completes server-side
    for _ in 0..100 {
        if service.registry().subscriber_count(&form.id) == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(service.registry().subscriber_count(&form.id), 1);

    let accepted = service
        .submit(&form.id, serde_json::from_value(json!({"name": "Ann"})).unwrap())
        .unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let frame: Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();
    assert_eq!(frame["type"], "response_created");
    assert_eq!(frame["data"]["id"], accepted.id);
    assert_eq!(frame["data"]["answers"]["name"], "Ann");

    ws.close(None).await.unwrap();
    for _ in 0..100 {
        if service.registry().subscriber_count(&form.id) == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(service.registry().subscriber_count(&form.id), 0);

    let (status, stats) = send_stats(&service).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_subscribers"], 0);
}

async fn send_stats(service: &Arc<FormService>) -> (StatusCode, Value) {
    let router = HttpServer::with_config(HttpServerConfig::default(), service.clone()).router();
    send(&router, get("/realtime/stats", None)).await
}
