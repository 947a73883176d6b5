use alertd_core::{AlertEngine, StaticNotifier};
use alertd_web::{create_app, AppState, Database, WebConfig};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to create a test app backed by an in-memory database
async fn create_test_app(notifier: StaticNotifier) -> anyhow::Result<Router> {
    let config = WebConfig {
        database_url: "sqlite::memory:".to_string(),
        ..WebConfig::default()
    };

    let db = Database::new(&config.database_url).await?;
    db.migrate().await?;
    let engine = AlertEngine::new(Arc::new(db.alert_store()), Arc::new(notifier));

    Ok(create_app(AppState::with_engine(db, engine, config)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_alert(app: &Router, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/alerts")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
    )
    .await
}

fn db_down() -> Value {
    json!({
        "title": "DB down",
        "message": "primary db unreachable",
        "severity": "CRITICAL",
        "targetService": "billing"
    })
}

#[tokio::test]
async fn test_create_alert_returns_created_and_sent() {
    let app = create_test_app(StaticNotifier::succeeding())
        .await
        .expect("Failed to create test app");

    let (status, body) = post_alert(&app, db_down()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "DB down");
    assert_eq!(body["message"], "primary db unreachable");
    assert_eq!(body["severity"], "CRITICAL");
    assert_eq!(body["targetService"], "billing");
    assert_eq!(body["status"], "SENT");
    assert!(body["createdAt"].is_string());
    assert!(body["sentAt"].is_string());
    assert!(body["errorMessage"].is_null());
}

#[tokio::test]
async fn test_failed_dispatch_is_still_created() {
    let app = create_test_app(StaticNotifier::failing("connection refused"))
        .await
        .expect("Failed to create test app");

    let (status, body) = post_alert(&app, db_down()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["errorMessage"], "connection refused");
    assert!(body["sentAt"].is_null());
}

#[tokio::test]
async fn test_caller_supplied_lifecycle_fields_are_ignored() {
    let app = create_test_app(StaticNotifier::failing("nope"))
        .await
        .expect("Failed to create test app");

    let mut request = db_down();
    request["id"] = json!(999);
    request["status"] = json!("SENT");
    request["sentAt"] = json!("2001-01-01T00:00:00Z");
    request["createdAt"] = json!("2001-01-01T00:00:00Z");
    request["errorMessage"] = json!("forged");

    let (status, body) = post_alert(&app, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["errorMessage"], "nope");
    assert!(body["sentAt"].is_null());
    assert_ne!(body["createdAt"], "2001-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let app = create_test_app(StaticNotifier::succeeding())
        .await
        .expect("Failed to create test app");

    let mut lower_case = db_down();
    lower_case["severity"] = json!("critical");
    let (status, body) = post_alert(&app, lower_case).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let mut no_title = db_down();
    no_title["title"] = json!("");
    let (status, _) = post_alert(&app, no_title).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut long_message = db_down();
    long_message["message"] = json!("m".repeat(1001));
    let (status, _) = post_alert(&app, long_message).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/alerts")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    // Nothing was stored
    let (_, all) = get(&app, "/api/alerts").await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_create_stores_message_as_sent() {
    let app = create_test_app(StaticNotifier::succeeding())
        .await
        .expect("Failed to create test app");

    let mut padded_severity = db_down();
    padded_severity["severity"] = json!(" CRITICAL ");
    let (status, body) = post_alert(&app, padded_severity).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let mut raw_message = db_down();
    raw_message["message"] = json!("  line1\r\nline2\t ");
    let (status, created) = post_alert(&app, raw_message).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "  line1\r\nline2\t ");

    let (_, all) = get(&app, "/api/alerts").await;
    assert_eq!(all, json!([created]));
}

#[tokio::test]
async fn test_list_and_filter_alerts() {
    let app = create_test_app(StaticNotifier::succeeding())
        .await
        .expect("Failed to create test app");

    for (severity, target) in [("INFO", "billing"), ("WARNING", "billing"), ("CRITICAL", "search")] {
        let (status, _) = post_alert(
            &app,
            json!({
                "title": format!("{} alert", severity),
                "message": "body",
                "severity": severity,
                "targetService": target
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, all) = get(&app, "/api/alerts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, critical) = get(&app, "/api/alerts/severity/CRITICAL").await;
    assert_eq!(status, StatusCode::OK);
    let critical = critical.as_array().unwrap();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0]["id"], 3);

    let (_, billing) = get(&app, "/api/alerts/service/billing").await;
    assert_eq!(billing.as_array().unwrap().len(), 2);

    let (_, sent) = get(&app, "/api/alerts/status/SENT").await;
    assert_eq!(sent, all);

    let (status, failed) = get(&app, "/api/alerts/status/FAILED").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(failed, json!([]));
}

#[tokio::test]
async fn test_filters_do_not_normalize_input() {
    let app = create_test_app(StaticNotifier::succeeding())
        .await
        .expect("Failed to create test app");
    post_alert(&app, db_down()).await;

    for uri in [
        "/api/alerts/status/sent",
        "/api/alerts/severity/critical",
        "/api/alerts/service/Billing",
        "/api/alerts/severity/NOT-A-SEVERITY",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(StaticNotifier::succeeding())
        .await
        .expect("Failed to create test app");

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["notifier"], "static");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_invalid_endpoint_returns_404() {
    let app = create_test_app(StaticNotifier::succeeding())
        .await
        .expect("Failed to create test app");

    let (status, body) = get(&app, "/api/nonexistent-endpoint").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = create_test_app(StaticNotifier::succeeding())
        .await
        .expect("Failed to create test app");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let response = app
        .oneshot(Request::builder().uri("/api/alerts").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}
