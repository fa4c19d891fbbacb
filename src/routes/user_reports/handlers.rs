use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::{user_reports, users};
use crate::error::{AppError, AppResult};
use crate::routes::check_limit;
use crate::services::category;
use crate::services::identifier;
use crate::services::likes::{self, LikeOutcome, LikedBy};
use crate::services::sensor_sync::{attach_sensor, require_sensor};

use super::types::{
    CreateUserReportRequest, LikeRequest, OwnerQuery, UpdateUserReportRequest,
    UserReportResponse, UserReportsQuery, ViewerQuery,
};

async fn find_report<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<user_reports::Model> {
    user_reports::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User report '{id}' not found")))
}

async fn owner_name<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<Option<String>> {
    Ok(users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .map(|u| u.name))
}

/// Names of every user in `ids` that still exists.
async fn owner_names<C: ConnectionTrait>(
    db: &C,
    ids: HashSet<Uuid>,
) -> AppResult<HashMap<Uuid, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let owners = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(owners.into_iter().map(|u| (u.id, u.name)).collect())
}

fn ensure_owner(report: &user_reports::Model, caller: Uuid) -> AppResult<()> {
    if report.user_id != caller {
        tracing::warn!(
            report_id = %report.id,
            caller = %caller,
            "Rejected mutation of another user's report"
        );
        return Err(AppError::Forbidden(
            "Only the report's owner may modify it".to_string(),
        ));
    }
    Ok(())
}

/// Post a user report against a sensor
#[utoipa::path(
    post,
    path = "/user-reports",
    request_body = CreateUserReportRequest,
    responses(
        (status = 201, description = "User report created", body = UserReportResponse),
        (status = 400, description = "Malformed ID or unrecognized type"),
        (status = 404, description = "User or sensor not found"),
    ),
    tag = "user-reports"
)]
pub async fn create_user_report(
    State(state): State<AppState>,
    Json(body): Json<CreateUserReportRequest>,
) -> AppResult<(StatusCode, Json<UserReportResponse>)> {
    let user_id = identifier::decode("user_id", &body.user_id)?;
    let sensor_id = identifier::decode("sensor_id", &body.sensor_id)?;
    let report_type = category::normalize(body.report_type.as_deref())?;

    let owner = owner_name(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{user_id}' not found")))?;
    let sensor = require_sensor(&state.db, sensor_id).await?;

    let liked_by = LikedBy::default();
    let report = user_reports::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        sensor_id: Set(sensor.id),
        sensor_name: Set(sensor.name),
        location: Set(sensor.location),
        timestamp: Set(body.timestamp.unwrap_or_else(Utc::now)),
        report_type: Set(report_type),
        value: Set(body.value),
        unit: Set(body.unit),
        source: Set(body.source),
        comment: Set(body.comment),
        likes: Set(liked_by.count()),
        liked_by: Set(liked_by),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(
        report_id = %report.id,
        user_id = %user_id,
        sensor_id = %sensor_id,
        report_type = %report_type,
        "User report created"
    );

    Ok((
        StatusCode::CREATED,
        Json(UserReportResponse::build(report, Some(&owner), Some(user_id))),
    ))
}

/// List user reports, newest first
#[utoipa::path(
    get,
    path = "/user-reports",
    params(UserReportsQuery),
    responses(
        (status = 200, description = "User reports retrieved successfully", body = Vec<UserReportResponse>),
        (status = 400, description = "Malformed viewer ID or non-positive limit"),
    ),
    tag = "user-reports"
)]
pub async fn list_user_reports(
    State(state): State<AppState>,
    Query(query): Query<UserReportsQuery>,
) -> AppResult<Json<Vec<UserReportResponse>>> {
    let viewer = identifier::decode_opt("user_id", query.user_id.as_deref())?;
    let limit = check_limit(query.limit)?;

    let reports = user_reports::Entity::find()
        .order_by_desc(user_reports::Column::Timestamp)
        .limit(limit)
        .all(&state.db)
        .await?;

    let owners = owner_names(&state.db, reports.iter().map(|r| r.user_id).collect()).await?;

    let response = reports
        .into_iter()
        .map(|r| {
            let owner = owners.get(&r.user_id).map(String::as_str);
            UserReportResponse::build(r, owner, viewer)
        })
        .collect();

    Ok(Json(response))
}

/// Get a user report by ID
#[utoipa::path(
    get,
    path = "/user-reports/{report_id}",
    params(
        ("report_id" = String, Path, description = "User report ID"),
        ViewerQuery,
    ),
    responses(
        (status = 200, description = "User report retrieved successfully", body = UserReportResponse),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "User report not found"),
    ),
    tag = "user-reports"
)]
pub async fn get_user_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> AppResult<Json<UserReportResponse>> {
    let id = identifier::decode("report_id", &report_id)?;
    let viewer = identifier::decode_opt("user_id", query.user_id.as_deref())?;

    let report = find_report(&state.db, id).await?;
    let owner = owner_name(&state.db, report.user_id).await?;

    Ok(Json(UserReportResponse::build(report, owner.as_deref(), viewer)))
}

/// Partially update a user report (owner only)
///
/// Changing `sensor_id` also refreshes `sensor_name`, `location` and, when
/// the sensor defines one and the request does not set it, `unit`.
#[utoipa::path(
    patch,
    path = "/user-reports/{report_id}",
    params(
        ("report_id" = String, Path, description = "User report ID"),
    ),
    request_body = UpdateUserReportRequest,
    responses(
        (status = 200, description = "User report updated", body = UserReportResponse),
        (status = 400, description = "Malformed ID, unrecognized type, or no fields provided"),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "User report or sensor not found"),
    ),
    tag = "user-reports"
)]
pub async fn update_user_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(body): Json<UpdateUserReportRequest>,
) -> AppResult<Json<UserReportResponse>> {
    let id = identifier::decode("report_id", &report_id)?;
    let caller = identifier::decode("user_id", &body.user_id)?;

    let existing = find_report(&state.db, id).await?;
    ensure_owner(&existing, caller)?;

    let (mut update, sensor_id) = body.into_update(id)?;
    if let Some(raw) = sensor_id {
        let sensor_id = identifier::decode("sensor_id", &raw)?;
        let sensor = require_sensor(&state.db, sensor_id).await?;
        attach_sensor(&mut update, &sensor);
    }

    let fields = update.fields().join(",");
    let report = update.apply(&state.db).await?;
    tracing::info!(report_id = %id, user_id = %caller, fields = %fields, "User report updated");

    let owner = owner_name(&state.db, report.user_id).await?;
    Ok(Json(UserReportResponse::build(report, owner.as_deref(), Some(caller))))
}

/// Delete a user report (owner only)
#[utoipa::path(
    delete,
    path = "/user-reports/{report_id}",
    params(
        ("report_id" = String, Path, description = "User report ID"),
        OwnerQuery,
    ),
    responses(
        (status = 204, description = "User report deleted"),
        (status = 400, description = "Malformed ID"),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "User report not found"),
    ),
    tag = "user-reports"
)]
pub async fn delete_user_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<StatusCode> {
    let id = identifier::decode("report_id", &report_id)?;
    let caller = identifier::decode("user_id", &query.user_id)?;

    let existing = find_report(&state.db, id).await?;
    ensure_owner(&existing, caller)?;

    let deleted = user_reports::Entity::delete_by_id(id).exec(&state.db).await?;
    if deleted.rows_affected == 0 {
        return Err(AppError::NotFound(format!("User report '{id}' not found")));
    }

    tracing::info!(report_id = %id, user_id = %caller, "User report deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Like or unlike a user report
///
/// Adds the caller to the report's likers if absent, removes them otherwise.
#[utoipa::path(
    post,
    path = "/user-reports/{report_id}/like",
    params(
        ("report_id" = String, Path, description = "User report ID"),
    ),
    request_body = LikeRequest,
    responses(
        (status = 200, description = "Like toggled", body = LikeOutcome),
        (status = 404, description = "User report not found or malformed ID"),
    ),
    tag = "user-reports"
)]
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(body): Json<LikeRequest>,
) -> AppResult<Json<LikeOutcome>> {
    let not_found = |_: AppError| AppError::NotFound(format!("User report '{report_id}' not found"));
    let id = identifier::decode("report_id", &report_id).map_err(not_found)?;
    let user_id = identifier::decode("user_id", &body.user_id).map_err(not_found)?;

    let outcome = likes::toggle_like(&state.db, id, user_id).await?;
    Ok(Json(outcome))
}
