use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::sensors;
use crate::error::{AppError, AppResult};
use crate::routes::users::required_text;
use crate::services::category;
use crate::services::identifier;
use crate::services::sensor_sync::require_sensor;

use super::types::{CreateSensorRequest, SensorResponse, SensorsQuery, UpdateSensorRequest};

/// Register a sensor
#[utoipa::path(
    post,
    path = "/sensors",
    request_body = CreateSensorRequest,
    responses(
        (status = 201, description = "Sensor created", body = SensorResponse),
        (status = 400, description = "Unrecognized type or blank name"),
    ),
    tag = "sensors"
)]
pub async fn create_sensor(
    State(state): State<AppState>,
    Json(body): Json<CreateSensorRequest>,
) -> AppResult<(StatusCode, Json<SensorResponse>)> {
    let sensor_type = category::normalize(body.sensor_type.as_deref())?;

    let sensor = sensors::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(required_text("name", body.name)?),
        sensor_type: Set(sensor_type),
        location: Set(body.location),
        unit: Set(body.unit),
        latitude: Set(body.latitude),
        longitude: Set(body.longitude),
        is_active: Set(body.is_active.unwrap_or(true)),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(sensor_id = %sensor.id, sensor_type = %sensor.sensor_type, "Sensor created");

    Ok((StatusCode::CREATED, Json(sensor.into())))
}

/// List sensors
#[utoipa::path(
    get,
    path = "/sensors",
    params(SensorsQuery),
    responses(
        (status = 200, description = "Sensors retrieved successfully", body = Vec<SensorResponse>),
        (status = 400, description = "Unrecognized type filter"),
    ),
    tag = "sensors"
)]
pub async fn list_sensors(
    State(state): State<AppState>,
    Query(query): Query<SensorsQuery>,
) -> AppResult<Json<Vec<SensorResponse>>> {
    let mut db_query = sensors::Entity::find();

    if let Some(ref raw) = query.sensor_type {
        let sensor_type = category::normalize(Some(raw))?;
        db_query = db_query.filter(sensors::Column::SensorType.eq(sensor_type));
    }

    if let Some(active) = query.active {
        db_query = db_query.filter(sensors::Column::IsActive.eq(active));
    }

    let sensors_list = db_query
        .order_by_asc(sensors::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(sensors_list.into_iter().map(SensorResponse::from).collect()))
}

/// Get a sensor by ID
#[utoipa::path(
    get,
    path = "/sensors/{sensor_id}",
    params(
        ("sensor_id" = String, Path, description = "Sensor ID"),
    ),
    responses(
        (status = 200, description = "Sensor retrieved successfully", body = SensorResponse),
        (status = 400, description = "Malformed sensor ID"),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn get_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
) -> AppResult<Json<SensorResponse>> {
    let id = identifier::decode("sensor_id", &sensor_id)?;
    let sensor = require_sensor(&state.db, id).await?;

    Ok(Json(sensor.into()))
}

/// Partially update a sensor
#[utoipa::path(
    patch,
    path = "/sensors/{sensor_id}",
    params(
        ("sensor_id" = String, Path, description = "Sensor ID"),
    ),
    request_body = UpdateSensorRequest,
    responses(
        (status = 200, description = "Sensor updated", body = SensorResponse),
        (status = 400, description = "Malformed ID, unrecognized type, or no fields provided"),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn update_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
    Json(body): Json<UpdateSensorRequest>,
) -> AppResult<Json<SensorResponse>> {
    let id = identifier::decode("sensor_id", &sensor_id)?;

    let sensor = body.into_update(id)?.apply(&state.db).await?;
    tracing::info!(sensor_id = %id, "Sensor updated");

    Ok(Json(sensor.into()))
}

/// Delete a sensor
///
/// Readings and user reports that reference the sensor are kept.
#[utoipa::path(
    delete,
    path = "/sensors/{sensor_id}",
    params(
        ("sensor_id" = String, Path, description = "Sensor ID"),
    ),
    responses(
        (status = 204, description = "Sensor deleted"),
        (status = 400, description = "Malformed sensor ID"),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn delete_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = identifier::decode("sensor_id", &sensor_id)?;

    let deleted = sensors::Entity::delete_by_id(id).exec(&state.db).await?;
    if deleted.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Sensor '{id}' not found")));
    }

    tracing::info!(sensor_id = %id, "Sensor deleted");
    Ok(StatusCode::NO_CONTENT)
}
