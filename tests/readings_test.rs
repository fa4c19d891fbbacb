//! Reading ingestion and the windowed / latest / global queries.
//!
//! Run with: cargo test --test readings_test

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use common::{create_sensor, send, setup_app};

async fn post_reading(app: &axum::Router, sensor_id: &str, value: f64, hours_ago: i64) {
    let timestamp = Utc::now() - Duration::hours(hours_ago);
    let (status, body) = send(
        app,
        "POST",
        &format!("/sensors/{sensor_id}/readings"),
        Some(json!({ "value": value, "timestamp": timestamp })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "post reading: {body}");
}

#[tokio::test]
async fn ingest_copies_sensor_fields() {
    let (app, _db) = setup_app().await;
    let sensor = create_sensor(&app, "Sungai Klang 0001", "water level", "Sungai Klang", Some("m")).await;

    let (status, reading) = send(
        &app,
        "POST",
        &format!("/sensors/{sensor}/readings"),
        Some(json!({ "value": 3.2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reading["sensor_id"], sensor.as_str());
    assert_eq!(reading["sensor_name"], "Sungai Klang 0001");
    assert_eq!(reading["location"], "Sungai Klang");
    assert_eq!(reading["type"], "water_level");
    assert_eq!(reading["unit"], "m");
    assert_eq!(reading["value"], 3.2);
}

#[tokio::test]
async fn ingest_for_unknown_sensor_is_rejected() {
    let (app, _db) = setup_app().await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", Uuid::new_v4()),
        Some(json!({ "value": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/sensors/xyz/readings", Some(json!({ "value": 1.0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn window_returns_recent_readings_oldest_first() {
    let (app, _db) = setup_app().await;
    let sensor = create_sensor(&app, "KLCC 0001", "rain", "KLCC", Some("mm/h")).await;
    let other = create_sensor(&app, "KLCC 0002", "rain", "KLCC", Some("mm/h")).await;

    post_reading(&app, &sensor, 1.0, 30).await;
    post_reading(&app, &sensor, 2.0, 5).await;
    post_reading(&app, &sensor, 3.0, 1).await;
    post_reading(&app, &other, 9.0, 1).await;

    let (status, readings) = send(&app, "GET", &format!("/sensors/{sensor}/readings"), None).await;
    assert_eq!(status, StatusCode::OK);
    let values: Vec<f64> = readings
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![2.0, 3.0]);

    let (_, readings) = send(&app, "GET", &format!("/sensors/{sensor}/readings?hours=2"), None).await;
    assert_eq!(readings.as_array().unwrap().len(), 1);

    let (_, readings) = send(&app, "GET", &format!("/sensors/{sensor}/readings?hours=48"), None).await;
    assert_eq!(readings.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn window_must_be_positive() {
    let (app, _db) = setup_app().await;
    let sensor = create_sensor(&app, "KLCC 0001", "rain", "KLCC", Some("mm/h")).await;

    for hours in ["0", "-4"] {
        let (status, body) = send(
            &app,
            "GET",
            &format!("/sensors/{sensor}/readings?hours={hours}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "hours={hours}");
        assert!(body["error"].as_str().unwrap().contains("hours"));
    }

    let (status, _) = send(
        &app,
        "GET",
        &format!("/sensors/{}/readings", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn latest_reading_is_newest() {
    let (app, _db) = setup_app().await;
    let sensor = create_sensor(&app, "Genting 0001", "temp", "Genting Highlands", Some("C")).await;

    let (status, _) = send(&app, "GET", &format!("/sensors/{sensor}/readings/latest"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    post_reading(&app, &sensor, 18.5, 3).await;
    post_reading(&app, &sensor, 21.0, 0).await;
    post_reading(&app, &sensor, 19.0, 2).await;

    let (status, latest) = send(&app, "GET", &format!("/sensors/{sensor}/readings/latest"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["value"], 21.0);
    assert_eq!(latest["type"], "temperature");
}

#[tokio::test]
async fn global_readings_are_newest_first_and_limited() {
    let (app, _db) = setup_app().await;
    let rain = create_sensor(&app, "KLCC 0001", "rain", "KLCC", Some("mm/h")).await;
    let river = create_sensor(&app, "Sungai Klang 0001", "river", "Sungai Klang", Some("m")).await;

    post_reading(&app, &rain, 1.0, 10).await;
    post_reading(&app, &river, 2.0, 4).await;
    post_reading(&app, &rain, 3.0, 2).await;

    let (_, all) = send(&app, "GET", "/readings", None).await;
    let values: Vec<f64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![3.0, 2.0, 1.0]);

    let (_, limited) = send(&app, "GET", "/readings?limit=2", None).await;
    assert_eq!(limited.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, "GET", "/readings?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
