use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::category::InvalidCategory;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error(transparent)]
    InvalidCategory(#[from] InvalidCategory),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No fields provided for update")]
    NoFieldsProvided,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl AppError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidIdentifier(_)
            | Self::InvalidCategory(_)
            | Self::InvalidArgument(_)
            | Self::NoFieldsProvided => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            Self::Database(e) => {
                tracing::error!("Database error: {e:?}");
                "Database error".to_string()
            }
            Self::InvalidCategory(e) => e.to_string(),
            Self::NoFieldsProvided => self.to_string(),
            Self::InvalidIdentifier(msg)
            | Self::InvalidArgument(msg)
            | Self::NotFound(msg)
            | Self::Forbidden(msg) => msg.clone(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
