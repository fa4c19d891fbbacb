use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::{user_reports, users};
use crate::error::{AppError, AppResult};
use crate::services::identifier;

use super::types::{parse_plan, required_text, CreateUserRequest, UpdateUserRequest, UserResponse};

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid plan or blank name"),
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let plan = body.plan.as_deref().map(parse_plan).transpose()?.unwrap_or_default();
    let email = body
        .email
        .filter(|email| !email.trim().is_empty())
        .unwrap_or_else(|| state.config.default_email.clone());

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(required_text("name", body.name)?),
        email: Set(email),
        plan: Set(plan),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(user_id = %user.id, plan = ?user.plan, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = Vec<UserResponse>),
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users_list = users::Entity::find()
        .order_by_asc(users::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(users_list.into_iter().map(UserResponse::from).collect()))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserResponse),
        (status = 400, description = "Malformed user ID"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let id = identifier::decode("user_id", &user_id)?;

    let user = users::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{id}' not found")))?;

    Ok(Json(user.into()))
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Malformed ID, invalid plan, or no fields provided"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let id = identifier::decode("user_id", &user_id)?;

    let user = body.into_update(id)?.apply(&state.db).await?;
    tracing::info!(user_id = %id, "User updated");

    Ok(Json(user.into()))
}

/// Delete a user and every user report they own
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "User and their user reports deleted"),
        (status = 400, description = "Malformed user ID"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = identifier::decode("user_id", &user_id)?;

    let txn = state.db.begin().await?;

    let deleted = users::Entity::delete_by_id(id).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        return Err(AppError::NotFound(format!("User '{id}' not found")));
    }

    let cascaded = user_reports::Entity::delete_many()
        .filter(user_reports::Column::UserId.eq(id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        user_id = %id,
        user_reports_deleted = cascaded.rows_affected,
        "User deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
