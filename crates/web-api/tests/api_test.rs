use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use trend_forecast_core::ForecastPipeline;
use trend_forecast_data::{DatabaseClient, FileModelStore, Repositories};
use trend_forecast_web_api::ApiServer;

struct TestApp {
    router: Router,
    _dir: TempDir,
    _db: DatabaseClient,
}

async fn test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let db = DatabaseClient::new_in_memory().await.unwrap();
    let repos = Repositories::new(db.pool().clone());
    let pipeline = ForecastPipeline::new(
        Arc::new(repos.observations),
        Arc::new(FileModelStore::new(dir.path().join("model.json"))),
    );

    TestApp {
        router: ApiServer::new(Arc::new(pipeline)).router(),
        _dir: dir,
        _db: db,
    }
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

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

async fn add(router: &Router, date: &str, actual: f64) {
    let (status, body) = send(router, post_json("/add", &json!({"date": date, "actual": actual}))).await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_trained"], false);
}

#[tokio::test]
async fn test_add_then_list_sorted() {
    let app = test_app().await;

    let (status, body) = send(
        &app.router,
        post_json("/add", &json!({"date": "2024-01-02", "actual": 12.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Data added successfully"}));

    add(&app.router, "2024-01-01", 10.0).await;

    let (status, body) = send(&app.router, get("/data")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"date": "2024-01-01", "actual": 10.0},
            {"date": "2024-01-02", "actual": 12.0},
        ])
    );
}

#[tokio::test]
async fn test_add_rejects_invalid_input() {
    let app = test_app().await;

    let cases = [
        json!({"date": "2024-02-30", "actual": 1.0}),
        json!({"date": "01/02/2024", "actual": 1.0}),
        json!({"date": "2024-01-01"}),
        json!({"actual": 3.0}),
        json!({"date": "2024-01-01", "actual": "warm"}),
    ];

    for case in &cases {
        let (status, body) = send(&app.router, post_json("/add", case)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {case}");
        assert!(body["error"].is_string());
    }

    let (status, body) = send(
        &app.router,
        Request::post("/add")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, body) = send(&app.router, get("/data")).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_missing_field_message() {
    let app = test_app().await;
    let (status, body) = send(&app.router, post_json("/add", &json!({"date": "2024-01-01"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Missing date or actual field"));
}

#[tokio::test]
async fn test_predict_before_train_is_client_error() {
    let app = test_app().await;
    let (status, body) = send(&app.router, get("/predict")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_train_requires_two_observations() {
    let app = test_app().await;

    let (status, _) = send(&app.router, post_empty("/train")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    add(&app.router, "2024-01-01", 10.0).await;
    let (status, body) = send(&app.router, post_empty("/train")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_train_and_predict_flow() {
    let app = test_app().await;

    add(&app.router, "2024-01-01", 10.0).await;
    add(&app.router, "2024-01-02", 12.0).await;
    add(&app.router, "2024-01-03", 14.0).await;

    let (status, body) = send(&app.router, post_empty("/train")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Training completed");
    assert_eq!(body["sample_count"], 3);

    let (status, body) = send(&app.router, get("/predict")).await;
    assert_eq!(status, StatusCode::OK);

    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 30);
    assert_eq!(points[0]["date"], "2024-01-04");
    assert!((points[0]["predicted"].as_f64().unwrap() - 16.0).abs() < 1e-9);
    assert_eq!(points[29]["date"], "2024-02-02");
    assert!((points[29]["predicted"].as_f64().unwrap() - 74.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_model_status_reports_staleness() {
    let app = test_app().await;

    let (status, body) = send(&app.router, get("/model")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trained"], false);

    add(&app.router, "2024-01-01", 1.0).await;
    add(&app.router, "2024-01-02", 2.0).await;
    send(&app.router, post_empty("/train")).await;

    let (_, body) = send(&app.router, get("/model")).await;
    assert_eq!(body["trained"], true);
    assert_eq!(body["stale"], false);
    assert_eq!(body["model"]["sample_count"], 2);

    add(&app.router, "2024-01-05", 5.0).await;
    let (_, body) = send(&app.router, get("/model")).await;
    assert_eq!(body["stale"], true);
    assert_eq!(body["latest_observation"], "2024-01-05");
}

#[tokio::test]
async fn test_degenerate_dates_rejected() {
    let app = test_app().await;

    add(&app.router, "2024-01-01", 1.0).await;
    add(&app.router, "2024-01-01", 3.0).await;

    let (status, body) = send(&app.router, post_empty("/train")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
