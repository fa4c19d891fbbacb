//! User reports: creation enrichment, owner-scoped updates, sensor sync,
//! likes and the user-delete cascade.
//!
//! Run with: cargo test --test user_reports_test

mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{create_sensor, create_user, create_user_report, send, setup_app};

#[tokio::test]
async fn created_report_is_normalized_and_attributed_to_owner() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;

    let (status, sensor) = send(
        &app,
        "POST",
        "/sensors",
        Some(json!({
            "name": "Sungai Gombak 0001",
            "type": "Water Level",
            "location": "Sungai Gombak",
            "unit": "m",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sensor["type"], "water_level");
    let sensor_id = sensor["id"].as_str().unwrap();

    let created = create_user_report(&app, &alice, sensor_id, "river", 4.5).await;
    let report_id = created["id"].as_str().unwrap();

    let (status, report) = send(&app, "GET", &format!("/user-reports/{report_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["type"], "water_level");
    assert_eq!(report["source"], "Alice");
    assert_eq!(report["likes"], 0);
    assert_eq!(report["value"], 4.5);
    assert_eq!(report["sensor_name"], "Sungai Gombak 0001");
    assert_eq!(report["location"], "Sungai Gombak");
    assert_eq!(report["user_id"], alice.as_str());
    assert!(report.get("liked_by_me").is_none());
}

#[tokio::test]
async fn create_requires_existing_user_and_sensor() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let sensor = create_sensor(&app, "KLCC 0001", "rain", "KLCC", Some("mm/h")).await;
    let ghost = Uuid::new_v4().to_string();

    let body = |user_id: &str, sensor_id: &str| {
        json!({ "user_id": user_id, "sensor_id": sensor_id, "type": "rain", "value": 3.0, "unit": "mm/h" })
    };

    let (status, _) = send(&app, "POST", "/user-reports", Some(body(&ghost, &sensor))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/user-reports", Some(body(&alice, &ghost))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/user-reports", Some(body("nope", &sensor))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rejects_unknown_type() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let sensor = create_sensor(&app, "KLCC 0001", "rain", "KLCC", Some("mm/h")).await;

    let (status, body) = send(
        &app,
        "POST",
        "/user-reports",
        Some(json!({ "user_id": alice, "sensor_id": sensor, "type": "humidity", "value": 1.0, "unit": "%" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("water_level"));
}

#[tokio::test]
async fn owner_name_takes_precedence_over_stored_source() {
    let (app, _db) = setup_app().await;
    let bob = create_user(&app, "Bob").await;
    let sensor = create_sensor(&app, "Cheras 0001", "temperature", "Cheras", Some("°C")).await;

    let (status, created) = send(
        &app,
        "POST",
        "/user-reports",
        Some(json!({
            "user_id": bob,
            "sensor_id": sensor,
            "type": "temp",
            "value": 31.2,
            "unit": "°C",
            "source": "Field team",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["source"], "Bob");
    assert_eq!(created["type"], "temperature");
}

#[tokio::test]
async fn owner_can_patch_sparse_fields() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let sensor = create_sensor(&app, "Sungai Klang 0001", "water_level", "Sungai Klang", Some("m")).await;
    let report = create_user_report(&app, &alice, &sensor, "depth", 2.0).await;
    let report_id = report["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/user-reports/{report_id}"),
        Some(json!({ "user_id": alice, "value": 2.7, "type": "Rainfall" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["value"], 2.7);
    assert_eq!(updated["type"], "rain");
    // Untouched fields keep their values
    assert_eq!(updated["comment"], "Water is rising near the bridge");
    assert_eq!(updated["unit"], "m");
    assert_eq!(updated["sensor_name"], "Sungai Klang 0001");
}

#[tokio::test]
async fn empty_patch_is_rejected_and_leaves_report_unchanged() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let sensor = create_sensor(&app, "Sungai Klang 0001", "water_level", "Sungai Klang", Some("m")).await;
    let report = create_user_report(&app, &alice, &sensor, "river", 1.5).await;
    let report_id = report["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/user-reports/{report_id}"),
        Some(json!({ "user_id": alice })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No fields provided for update");

    let (_, after) = send(&app, "GET", &format!("/user-reports/{report_id}"), None).await;
    assert_eq!(after["value"], 1.5);
    assert_eq!(after["type"], "water_level");
}

#[tokio::test]
async fn changing_sensor_refreshes_denormalized_fields() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let river = create_sensor(&app, "Sungai Gombak 0001", "water_level", "Sungai Gombak", Some("m")).await;
    let gauge = create_sensor(&app, "Batu Caves 0001", "rain", "Batu Caves", Some("mm/h")).await;
    let report = create_user_report(&app, &alice, &river, "river", 3.0).await;
    let report_id = report["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/user-reports/{report_id}"),
        Some(json!({ "user_id": alice, "sensor_id": gauge })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["sensor_id"], gauge.as_str());
    assert_eq!(updated["sensor_name"], "Batu Caves 0001");
    assert_eq!(updated["location"], "Batu Caves");
    assert_eq!(updated["unit"], "mm/h");
}

#[tokio::test]
async fn explicit_unit_wins_over_sensor_unit() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let river = create_sensor(&app, "Sungai Gombak 0001", "water_level", "Sungai Gombak", Some("m")).await;
    let gauge = create_sensor(&app, "Batu Caves 0001", "rain", "Batu Caves", Some("mm/h")).await;
    let unitless = create_sensor(&app, "Putrajaya 0001", "rain", "Putrajaya", None).await;
    let report = create_user_report(&app, &alice, &river, "river", 3.0).await;
    let report_id = report["id"].as_str().unwrap();

    let (_, updated) = send(
        &app,
        "PATCH",
        &format!("/user-reports/{report_id}"),
        Some(json!({ "user_id": alice, "sensor_id": gauge, "unit": "in/h" })),
    )
    .await;
    assert_eq!(updated["unit"], "in/h");

    // A sensor without a unit leaves the report's unit alone
    let (_, updated) = send(
        &app,
        "PATCH",
        &format!("/user-reports/{report_id}"),
        Some(json!({ "user_id": alice, "sensor_id": unitless })),
    )
    .await;
    assert_eq!(updated["unit"], "in/h");
    assert_eq!(updated["location"], "Putrajaya");
}

#[tokio::test]
async fn moving_to_unknown_sensor_is_not_found_and_unchanged() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let river = create_sensor(&app, "Sungai Gombak 0001", "water_level", "Sungai Gombak", Some("m")).await;
    let report = create_user_report(&app, &alice, &river, "river", 3.0).await;
    let report_id = report["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/user-reports/{report_id}"),
        Some(json!({ "user_id": alice, "sensor_id": Uuid::new_v4(), "value": 9.9 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, after) = send(&app, "GET", &format!("/user-reports/{report_id}"), None).await;
    assert_eq!(after["sensor_id"], river.as_str());
    assert_eq!(after["value"], 3.0);
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let mallory = create_user(&app, "Mallory").await;
    let river = create_sensor(&app, "Sungai Gombak 0001", "water_level", "Sungai Gombak", Some("m")).await;
    let report = create_user_report(&app, &alice, &river, "river", 3.0).await;
    let report_id = report["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/user-reports/{report_id}"),
        Some(json!({ "user_id": mallory, "value": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/user-reports/{report_id}?user_id={mallory}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, after) = send(&app, "GET", &format!("/user-reports/{report_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["value"], 3.0);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/user-reports/{report_id}?user_id={alice}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/user-reports/{report_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn like_toggle_is_an_involution() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;
    let river = create_sensor(&app, "Sungai Gombak 0001", "water_level", "Sungai Gombak", Some("m")).await;
    let report = create_user_report(&app, &alice, &river, "river", 3.0).await;
    let report_id = report["id"].as_str().unwrap();
    let like_uri = format!("/user-reports/{report_id}/like");

    let (status, first) = send(&app, "POST", &like_uri, Some(json!({ "user_id": bob }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, json!({ "likes": 1, "liked": true }));

    let (_, listed) = send(&app, "GET", &format!("/user-reports?user_id={bob}"), None).await;
    assert_eq!(listed[0]["liked_by_me"], true);
    assert_eq!(listed[0]["likes"], 1);

    let (_, listed) = send(&app, "GET", &format!("/user-reports?user_id={alice}"), None).await;
    assert_eq!(listed[0]["liked_by_me"], false);

    let (_, second) = send(&app, "POST", &like_uri, Some(json!({ "user_id": bob }))).await;
    assert_eq!(second, json!({ "likes": 0, "liked": false }));

    let (_, after) = send(&app, "GET", &format!("/user-reports/{report_id}?user_id={bob}"), None).await;
    assert_eq!(after["likes"], 0);
    assert_eq!(after["liked_by_me"], false);
}

#[tokio::test]
async fn likes_count_distinct_users() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let river = create_sensor(&app, "Sungai Gombak 0001", "water_level", "Sungai Gombak", Some("m")).await;
    let report = create_user_report(&app, &alice, &river, "river", 3.0).await;
    let like_uri = format!("/user-reports/{}/like", report["id"].as_str().unwrap());

    for _ in 0..3 {
        let fan = create_user(&app, "Fan").await;
        send(&app, "POST", &like_uri, Some(json!({ "user_id": fan }))).await;
    }
    let (_, outcome) = send(&app, "POST", &like_uri, Some(json!({ "user_id": alice }))).await;
    assert_eq!(outcome["likes"], 4);
}

#[tokio::test]
async fn like_on_missing_or_malformed_report_is_not_found() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/user-reports/{}/like", Uuid::new_v4()),
        Some(json!({ "user_id": alice })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/user-reports/garbage/like",
        Some(json!({ "user_id": alice })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_user_cascades_to_their_reports() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;
    let river = create_sensor(&app, "Sungai Gombak 0001", "water_level", "Sungai Gombak", Some("m")).await;
    create_user_report(&app, &alice, &river, "river", 3.0).await;
    create_user_report(&app, &alice, &river, "river", 3.1).await;
    create_user_report(&app, &bob, &river, "river", 3.2).await;

    let (status, _) = send(&app, "DELETE", &format!("/users/{alice}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&app, "GET", "/user-reports", None).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed.iter().all(|r| r["user_id"] != alice.as_str()));

    let (status, _) = send(&app, "DELETE", &format!("/users/{alice}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_newest_first_and_limited() {
    let (app, _db) = setup_app().await;
    let alice = create_user(&app, "Alice").await;
    let river = create_sensor(&app, "Sungai Gombak 0001", "water_level", "Sungai Gombak", Some("m")).await;

    for (value, ts) in [(1.0, "2026-01-01T00:00:00Z"), (2.0, "2026-01-03T00:00:00Z"), (3.0, "2026-01-02T00:00:00Z")] {
        let (status, _) = send(
            &app,
            "POST",
            "/user-reports",
            Some(json!({
                "user_id": alice,
                "sensor_id": river,
                "type": "water_level",
                "value": value,
                "unit": "m",
                "timestamp": ts,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, listed) = send(&app, "GET", "/user-reports?limit=2", None).await;
    let values: Vec<f64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![2.0, 3.0]);

    let (status, _) = send(&app, "GET", "/user-reports?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
