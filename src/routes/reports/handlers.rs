use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::reports;
use crate::error::{AppError, AppResult};
use crate::routes::{check_limit, LimitQuery};
use crate::services::category;
use crate::services::identifier;

use super::types::{CreateReportRequest, ReportResponse, UpdateReportRequest};

/// Submit a report
#[utoipa::path(
    post,
    path = "/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report created", body = ReportResponse),
        (status = 400, description = "Malformed user ID or unrecognized category"),
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(state): State<AppState>,
    Json(body): Json<CreateReportRequest>,
) -> AppResult<(StatusCode, Json<ReportResponse>)> {
    let user_id = identifier::decode("user_id", &body.user_id)?;
    let category = category::normalize(body.category.as_deref())?;

    let report = reports::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        category: Set(category),
        location: Set(body.location),
        value: Set(body.value),
        unit: Set(body.unit),
        timestamp: Set(body.timestamp.unwrap_or_else(Utc::now)),
        comment: Set(body.comment),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(report_id = %report.id, user_id = %user_id, category = %category, "Report created");

    Ok((StatusCode::CREATED, Json(report.into())))
}

/// List reports, newest first
#[utoipa::path(
    get,
    path = "/reports",
    params(LimitQuery),
    responses(
        (status = 200, description = "Reports retrieved successfully", body = Vec<ReportResponse>),
        (status = 400, description = "Non-positive limit"),
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<ReportResponse>>> {
    let limit = check_limit(query.limit)?;

    let reports_list = reports::Entity::find()
        .order_by_desc(reports::Column::Timestamp)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(reports_list.into_iter().map(ReportResponse::from).collect()))
}

/// Get a report by ID
#[utoipa::path(
    get,
    path = "/reports/{report_id}",
    params(
        ("report_id" = String, Path, description = "Report ID"),
    ),
    responses(
        (status = 200, description = "Report retrieved successfully", body = ReportResponse),
        (status = 400, description = "Malformed report ID"),
        (status = 404, description = "Report not found"),
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> AppResult<Json<ReportResponse>> {
    let id = identifier::decode("report_id", &report_id)?;

    let report = reports::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report '{id}' not found")))?;

    Ok(Json(report.into()))
}

/// Partially update a report
#[utoipa::path(
    patch,
    path = "/reports/{report_id}",
    params(
        ("report_id" = String, Path, description = "Report ID"),
    ),
    request_body = UpdateReportRequest,
    responses(
        (status = 200, description = "Report updated", body = ReportResponse),
        (status = 400, description = "Malformed ID, unrecognized category, or no fields provided"),
        (status = 404, description = "Report not found"),
    ),
    tag = "reports"
)]
pub async fn update_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(body): Json<UpdateReportRequest>,
) -> AppResult<Json<ReportResponse>> {
    let id = identifier::decode("report_id", &report_id)?;

    let report = body.into_update(id)?.apply(&state.db).await?;
    tracing::info!(report_id = %id, "Report updated");

    Ok(Json(report.into()))
}

/// Delete a report
#[utoipa::path(
    delete,
    path = "/reports/{report_id}",
    params(
        ("report_id" = String, Path, description = "Report ID"),
    ),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 400, description = "Malformed report ID"),
        (status = 404, description = "Report not found"),
    ),
    tag = "reports"
)]
pub async fn delete_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = identifier::decode("report_id", &report_id)?;

    let deleted = reports::Entity::delete_by_id(id).exec(&state.db).await?;
    if deleted.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Report '{id}' not found")));
    }

    tracing::info!(report_id = %id, "Report deleted");
    Ok(StatusCode::NO_CONTENT)
}
