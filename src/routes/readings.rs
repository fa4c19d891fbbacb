use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::sensor_readings;
use crate::error::{AppError, AppResult};
use crate::routes::{check_limit, LimitQuery};
use crate::services::category::Category;
use crate::services::identifier;
use crate::services::sensor_sync::require_sensor;

const DEFAULT_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingResponse {
    pub id: Uuid,
    pub sensor_id: Uuid,
    pub sensor_name: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub reading_type: Category,
    pub value: f64,
    pub unit: String,
}

impl From<sensor_readings::Model> for ReadingResponse {
    fn from(r: sensor_readings::Model) -> Self {
        Self {
            id: r.id,
            sensor_id: r.sensor_id,
            sensor_name: r.sensor_name,
            location: r.location,
            timestamp: r.timestamp,
            reading_type: r.reading_type,
            value: r.value,
            unit: r.unit,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReadingRequest {
    pub value: f64,
    /// Default: now
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReadingsWindowQuery {
    /// Trailing window in hours (default: 24, must be positive)
    pub hours: Option<i64>,
}

/// Start of the trailing `hours` window ending at `now`.
///
/// # Errors
///
/// `InvalidArgument` for a non-positive or out-of-range window.
pub fn window_start(now: DateTime<Utc>, hours: i64) -> AppResult<DateTime<Utc>> {
    if hours <= 0 {
        return Err(AppError::InvalidArgument(format!(
            "hours must be a positive integer, got {hours}"
        )));
    }

    TimeDelta::try_hours(hours)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| AppError::InvalidArgument(format!("hours={hours} is out of range")))
}

/// Ingest a reading for a sensor
///
/// The sensor's name, location, type and unit are copied onto the reading.
#[utoipa::path(
    post,
    path = "/sensors/{sensor_id}/readings",
    params(
        ("sensor_id" = String, Path, description = "Sensor ID"),
    ),
    request_body = CreateReadingRequest,
    responses(
        (status = 201, description = "Reading stored", body = ReadingResponse),
        (status = 400, description = "Malformed sensor ID"),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "readings"
)]
pub async fn create_reading(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
    Json(body): Json<CreateReadingRequest>,
) -> AppResult<(StatusCode, Json<ReadingResponse>)> {
    let id = identifier::decode("sensor_id", &sensor_id)?;
    let sensor = require_sensor(&state.db, id).await?;

    let reading = sensor_readings::ActiveModel {
        id: Set(Uuid::new_v4()),
        sensor_id: Set(sensor.id),
        sensor_name: Set(sensor.name),
        location: Set(sensor.location),
        timestamp: Set(body.timestamp.unwrap_or_else(Utc::now)),
        reading_type: Set(sensor.sensor_type),
        value: Set(body.value),
        unit: Set(sensor.unit.unwrap_or_default()),
    }
    .insert(&state.db)
    .await?;

    tracing::debug!(sensor_id = %id, reading_id = %reading.id, value = reading.value, "Reading stored");

    Ok((StatusCode::CREATED, Json(reading.into())))
}

/// Readings for a sensor over a trailing window, oldest first
#[utoipa::path(
    get,
    path = "/sensors/{sensor_id}/readings",
    params(
        ("sensor_id" = String, Path, description = "Sensor ID"),
        ReadingsWindowQuery,
    ),
    responses(
        (status = 200, description = "Readings retrieved successfully", body = Vec<ReadingResponse>),
        (status = 400, description = "Malformed sensor ID or non-positive window"),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "readings"
)]
pub async fn get_sensor_readings(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
    Query(query): Query<ReadingsWindowQuery>,
) -> AppResult<Json<Vec<ReadingResponse>>> {
    let id = identifier::decode("sensor_id", &sensor_id)?;
    let now = Utc::now();
    let start = window_start(now, query.hours.unwrap_or(DEFAULT_WINDOW_HOURS))?;
    require_sensor(&state.db, id).await?;

    let readings = sensor_readings::Entity::find()
        .filter(sensor_readings::Column::SensorId.eq(id))
        .filter(sensor_readings::Column::Timestamp.gte(start))
        .filter(sensor_readings::Column::Timestamp.lte(now))
        .order_by_asc(sensor_readings::Column::Timestamp)
        .all(&state.db)
        .await?;

    Ok(Json(readings.into_iter().map(ReadingResponse::from).collect()))
}

/// Latest reading for a sensor
#[utoipa::path(
    get,
    path = "/sensors/{sensor_id}/readings/latest",
    params(
        ("sensor_id" = String, Path, description = "Sensor ID"),
    ),
    responses(
        (status = 200, description = "Latest reading", body = ReadingResponse),
        (status = 400, description = "Malformed sensor ID"),
        (status = 404, description = "No readings for this sensor"),
    ),
    tag = "readings"
)]
pub async fn get_latest_reading(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
) -> AppResult<Json<ReadingResponse>> {
    let id = identifier::decode("sensor_id", &sensor_id)?;

    let reading = sensor_readings::Entity::find()
        .filter(sensor_readings::Column::SensorId.eq(id))
        .order_by_desc(sensor_readings::Column::Timestamp)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No readings for sensor '{id}'")))?;

    Ok(Json(reading.into()))
}

/// All readings across all sensors, newest first
#[utoipa::path(
    get,
    path = "/readings",
    params(LimitQuery),
    responses(
        (status = 200, description = "Readings retrieved successfully", body = Vec<ReadingResponse>),
        (status = 400, description = "Non-positive limit"),
    ),
    tag = "readings"
)]
pub async fn list_readings(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<ReadingResponse>>> {
    let limit = check_limit(query.limit)?;

    let readings = sensor_readings::Entity::find()
        .order_by_desc(sensor_readings::Column::Timestamp)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(readings.into_iter().map(ReadingResponse::from).collect()))
}
