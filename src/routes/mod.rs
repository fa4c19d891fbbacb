pub mod health;
pub mod readings;
pub mod reports;
pub mod sensors;
pub mod user_reports;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::{IntoParams, OpenApi};
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, IntoParams)]
pub struct LimitQuery {
    /// Maximum number of items (must be positive)
    pub limit: Option<i64>,
}

/// Validate an optional `?limit=`.
///
/// # Errors
///
/// `InvalidArgument` for zero or negative limits.
pub fn check_limit(limit: Option<i64>) -> AppResult<Option<u64>> {
    match limit {
        None => Ok(None),
        Some(n) => u64::try_from(n)
            .ok()
            .filter(|n| *n > 0)
            .map(Some)
            .ok_or_else(|| AppError::InvalidArgument(format!("limit must be positive, got {n}"))),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::health,
        users::create_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        sensors::create_sensor,
        sensors::list_sensors,
        sensors::get_sensor,
        sensors::update_sensor,
        sensors::delete_sensor,
        readings::create_reading,
        readings::get_sensor_readings,
        readings::get_latest_reading,
        readings::list_readings,
        reports::create_report,
        reports::list_reports,
        reports::get_report,
        reports::update_report,
        reports::delete_report,
        user_reports::create_user_report,
        user_reports::list_user_reports,
        user_reports::get_user_report,
        user_reports::update_user_report,
        user_reports::delete_user_report,
        user_reports::toggle_like,
    ),
    components(
        schemas(
            health::BannerResponse,
            health::HealthResponse,
            users::UserResponse,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            sensors::SensorResponse,
            sensors::CreateSensorRequest,
            sensors::UpdateSensorRequest,
            readings::ReadingResponse,
            readings::CreateReadingRequest,
            reports::ReportResponse,
            reports::CreateReportRequest,
            reports::UpdateReportRequest,
            user_reports::UserReportResponse,
            user_reports::CreateUserReportRequest,
            user_reports::UpdateUserReportRequest,
            user_reports::LikeRequest,
            crate::services::likes::LikeOutcome,
            crate::services::category::Category,
            crate::entity::users::Plan,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User accounts"),
        (name = "sensors", description = "Monitoring stations"),
        (name = "readings", description = "Sensor readings"),
        (name = "reports", description = "Free-form observation reports"),
        (name = "user-reports", description = "Community reports tied to a sensor, with likes"),
    ),
    info(
        title = "River & Farm Guardian API",
        description = "Crowd-sourced river and farm monitoring: sensors, readings and community reports",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let api_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{user_id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/sensors",
            get(sensors::list_sensors).post(sensors::create_sensor),
        )
        .route(
            "/sensors/{sensor_id}",
            get(sensors::get_sensor)
                .patch(sensors::update_sensor)
                .delete(sensors::delete_sensor),
        )
        .route(
            "/sensors/{sensor_id}/readings",
            get(readings::get_sensor_readings).post(readings::create_reading),
        )
        .route(
            "/sensors/{sensor_id}/readings/latest",
            get(readings::get_latest_reading),
        )
        .route("/readings", get(readings::list_readings))
        .route(
            "/reports",
            get(reports::list_reports).post(reports::create_report),
        )
        .route(
            "/reports/{report_id}",
            get(reports::get_report)
                .patch(reports::update_report)
                .delete(reports::delete_report),
        )
        .route(
            "/user-reports",
            get(user_reports::list_user_reports).post(user_reports::create_user_report),
        )
        .route(
            "/user-reports/{report_id}",
            get(user_reports::get_user_report)
                .patch(user_reports::update_user_report)
                .delete(user_reports::delete_user_report),
        )
        .route(
            "/user-reports/{report_id}/like",
            post(user_reports::toggle_like),
        )
        .layer(RequestBodyLimitLayer::new(config.request_body_limit_bytes));

    let rate_limiter = if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
        None
    } else {
        let limiter = GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish();
        if limiter.is_none() {
            tracing::warn!(
                per_second = config.rate_limit_per_second,
                burst = config.rate_limit_burst,
                "Invalid rate limit settings, rate limiting disabled"
            );
        }
        limiter
    };

    let api_routes = match rate_limiter {
        Some(limiter) => {
            tracing::info!(
                rate = %format!("{}/s burst {}", config.rate_limit_per_second, config.rate_limit_burst),
                "Rate limiting configured"
            );
            api_routes.layer(GovernorLayer {
                config: Arc::new(limiter),
            })
        }
        None => api_routes,
    };

    // Health check routes (NO rate limiting)
    let health_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
