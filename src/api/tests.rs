use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::{router, service};
use crate::store::{DocumentStore, MemoryDocumentStore};
use crate::utils::app_config::AppConfig;

fn app() -> (Arc<MemoryDocumentStore>, Router) {
    let memory = Arc::new(MemoryDocumentStore::new());
    let store: Arc<dyn DocumentStore> = memory.clone();
    (memory, router(AppConfig::new(store, "coinflow-test")))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

#[tokio::test]
async fn test_create_expense_then_list_by_category() {
    let (_, app) = app();

    let (status, created) = post(&app, "/api/expenses", json!({"amount": 12.0, "category": "food"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["ok"], json!(true));
    let id = created["id"].as_str().unwrap().to_string();

    let (status, travel) = post(&app, "/api/expenses", json!({"amount": 80, "category": "travel"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(travel["id"].as_str().unwrap(), id);

    let (status, listed) = get(&app, "/api/expenses?category=food").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["ok"], json!(true));
    let items = listed["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["_id"], json!(id));
    assert_eq!(items[0]["category"], json!("food"));
    assert_eq!(items[0]["type"], json!("debit"));
}

#[tokio::test]
async fn test_expense_defaults_are_stored() {
    let (_, app) = app();
    let before = Utc::now();
    post(&app, "/api/expenses", json!({"amount": 4.5})).await;
    let after = Utc::now();

    let (_, listed) = get(&app, "/api/expenses").await;
    let item = &listed["items"][0];
    assert_eq!(item["currency"], json!("USD"));
    assert_eq!(item["type"], json!("debit"));

    let date: DateTime<Utc> = DateTime::parse_from_rfc3339(item["date"].as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc);
    assert!(date >= before - chrono::Duration::seconds(1));
    assert!(date <= after + chrono::Duration::seconds(1));
}

#[tokio::test]
async fn test_list_uses_insertion_order() {
    let (_, app) = app();
    let mut ids = Vec::new();
    for name in ["car", "house", "trip"] {
        let (_, created) = post(&app, "/api/goals", json!({"name": name, "target_amount": 100})).await;
        ids.push(created["id"].clone());
    }

    let (_, first) = get(&app, "/api/goals").await;
    let listed: Vec<Value> = first["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["_id"].clone())
        .collect();
    assert_eq!(listed, ids);

    let (_, second) = get(&app, "/api/goals").await;
    assert_eq!(first, second);

    let (_, limited) = get(&app, "/api/goals?limit=2").await;
    assert_eq!(limited["items"].as_array().unwrap().len(), 2);
    assert_eq!(limited["items"][1]["name"], json!("house"));
}

#[tokio::test]
async fn test_expense_limit_bounds() {
    let (_, app) = app();

    let (status, _) = get(&app, "/api/expenses?limit=500").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/api/expenses?limit=501").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["details"][0]["field"], json!("limit"));

    let (status, _) = get(&app, "/api/expenses?limit=0").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = get(&app, "/api/expenses?limit=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_budget_and_goal_limits_cap_at_200() {
    let (_, app) = app();
    assert_eq!(get(&app, "/api/budgets?limit=200").await.0, StatusCode::OK);
    assert_eq!(
        get(&app, "/api/budgets?limit=201").await.0,
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(get(&app, "/api/goals?limit=200").await.0, StatusCode::OK);
    assert_eq!(
        get(&app, "/api/goals?limit=201").await.0,
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_non_positive_amounts_are_rejected_and_not_stored() {
    let (memory, app) = app();

    let (status, body) = post(&app, "/api/budgets", json!({"category": "rent", "amount": 0})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], json!("amount"));
    assert_eq!(body["details"][0]["code"], json!("not_positive"));

    let (status, _) = post(&app, "/api/goals", json!({"name": "car", "target_amount": -1})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(memory.len("budget"), 0);
    assert_eq!(memory.len("goal"), 0);
}

#[tokio::test]
async fn test_budgets_filter_by_month() {
    let (_, app) = app();
    post(&app, "/api/budgets", json!({"category": "food", "amount": 200, "month": "2025-01"})).await;
    post(&app, "/api/budgets", json!({"category": "food", "amount": 250, "month": "2025-02"})).await;
    post(&app, "/api/budgets", json!({"category": "fun", "amount": 50})).await;

    let (_, january) = get(&app, "/api/budgets?month=2025-01").await;
    let items = january["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["amount"], json!(200.0));

    let (_, all) = get(&app, "/api/budgets").await;
    assert_eq!(all["items"].as_array().unwrap().len(), 3);
    assert_eq!(all["items"][2]["month"], Value::Null);
}

#[tokio::test]
async fn test_malformed_bodies_are_client_errors() {
    let (memory, app) = app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/expenses")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/api/expenses", json!([1, 2, 3])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(&app, "/api/expenses", json!({"amount": 5, "type": "refund"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], json!("type"));

    assert_eq!(memory.len("expense"), 0);
}

#[tokio::test]
async fn test_unreachable_store_is_a_server_error() {
    let (memory, app) = app();
    memory.set_reachable(false);

    let (status, body) = post(&app, "/api/expenses", json!({"amount": 1})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("unavailable"));

    for uri in ["/api/expenses", "/api/budgets", "/api/goals"] {
        assert_eq!(get(&app, uri).await.0, StatusCode::INTERNAL_SERVER_ERROR);
    }
    let (status, _) = post(&app, "/api/goals", json!({"name": "x", "target_amount": 1})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    memory.set_reachable(true);
    assert_eq!(memory.len("expense"), 0);
    assert_eq!(memory.len("goal"), 0);
}

#[tokio::test]
async fn test_root_health_and_fallback() {
    let (memory, app) = app();

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Coinflow Backend is running"));

    post(&app, "/api/goals", json!({"name": "car", "target_amount": 10})).await;
    let (status, body) = get(&app, "/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], json!("✅ Running"));
    assert_eq!(body["database"], json!("✅ Connected & Working"));
    assert_eq!(body["database_url"], json!("❌ Not Set"));
    assert_eq!(body["database_name"], json!("❌ Not Set"));
    assert_eq!(body["connection_status"], json!("Connected"));
    assert_eq!(body["collections"], json!(["goal"]));

    let (status, alias) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alias, body);

    memory.set_reachable(false);
    let (status, body) = get(&app, "/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], json!("✅ Running"));
    assert_eq!(body["connection_status"], json!("Not Connected"));
    assert!(body["database"].as_str().unwrap().starts_with("❌ Error"));
    assert_eq!(body["collections"], json!([]));

    let (status, body) = get(&app, "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Route not found"));
}

#[tokio::test]
async fn test_diagnostics_report_configured_settings() {
    let mut config = AppConfig::in_memory();
    config.database_url_set = true;
    config.database_name_set = true;

    let (status, body) = get(&router(config), "/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database_url"], json!("✅ Set"));
    assert_eq!(body["database_name"], json!("✅ Set"));
    assert_eq!(body["collections"], json!([]));
}

#[tokio::test]
async fn test_service_answers_cross_origin_requests() {
    let app = service(AppConfig::in_memory());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/expenses")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(preflight).await.unwrap();
    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS)
    );
}
