//! Shared harness: the real router over an in-memory SQLite store with
//! migrations applied.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use guardian_api::{common::AppState, config::Config, routes};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{json, Value};
use tower::ServiceExt;

pub async fn setup_db() -> DatabaseConnection {
    // One pooled connection so every query sees the same in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn setup_app() -> (Router, DatabaseConnection) {
    let db = setup_db().await;
    let state = AppState::new(db.clone(), Config::local("sqlite::memory:"));
    (routes::build_router(state), db)
}

/// Send one request through the router and decode the JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
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
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

pub async fn create_user(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        Some(json!({ "name": name, "email": format!("{}@example.com", name.to_lowercase()) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create user: {body}");
    body["id"].as_str().unwrap().to_string()
}

pub async fn create_sensor(app: &Router, name: &str, sensor_type: &str, location: &str, unit: Option<&str>) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/sensors",
        Some(json!({
            "name": name,
            "type": sensor_type,
            "location": location,
            "unit": unit,
            "latitude": 3.166,
            "longitude": 101.695,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create sensor: {body}");
    body["id"].as_str().unwrap().to_string()
}

pub async fn create_user_report(app: &Router, user_id: &str, sensor_id: &str, report_type: &str, value: f64) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/user-reports",
        Some(json!({
            "user_id": user_id,
            "sensor_id": sensor_id,
            "type": report_type,
            "value": value,
            "unit": "m",
            "comment": "Water is rising near the bridge",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create user report: {body}");
    body
}
