use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::user_reports;
use crate::error::AppResult;
use crate::services::category::{self, Category};
use crate::services::identifier::ResourceId;
use crate::services::sparse_update::SparseUpdate;

/// Display label when neither the owner's name nor a stored source is known.
pub const DEFAULT_SOURCE: &str = "user";

/// Pick the display source: owner's name, then the stored source, then
/// [`DEFAULT_SOURCE`]. Blank values count as absent.
#[must_use]
pub fn resolve_source(owner_name: Option<&str>, stored: Option<&str>) -> String {
    owner_name
        .into_iter()
        .chain(stored)
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(DEFAULT_SOURCE)
        .to_string()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserReportResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sensor_id: Uuid,
    pub sensor_name: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub report_type: Category,
    pub value: f64,
    pub unit: String,
    pub source: String,
    pub comment: Option<String>,
    pub likes: i32,
    /// Present only when the request named a viewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked_by_me: Option<bool>,
}

impl UserReportResponse {
    pub fn build(r: user_reports::Model, owner_name: Option<&str>, viewer: Option<Uuid>) -> Self {
        Self {
            source: resolve_source(owner_name, r.source.as_deref()),
            liked_by_me: viewer.map(|viewer| r.liked_by.contains(viewer)),
            likes: r.liked_by.count(),
            id: r.id,
            user_id: r.user_id,
            sensor_id: r.sensor_id,
            sensor_name: r.sensor_name,
            location: r.location,
            timestamp: r.timestamp,
            report_type: r.report_type,
            value: r.value,
            unit: r.unit,
            comment: r.comment,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserReportRequest {
    pub user_id: String,
    pub sensor_id: String,
    /// Free text, normalized to `water_level`, `rain` or `temperature`
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub value: f64,
    pub unit: String,
    /// Default: now
    pub timestamp: Option<DateTime<Utc>>,
    pub comment: Option<String>,
    pub source: Option<String>,
}

/// `user_id` identifies the caller and must match the report's owner.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserReportRequest {
    pub user_id: String,
    pub sensor_id: Option<String>,
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub comment: Option<String>,
}

impl UpdateUserReportRequest {
    /// Map the plain fields onto an update. `sensor_id` is resolved by the
    /// caller because it needs a store lookup.
    pub fn into_update(
        self,
        id: ResourceId,
    ) -> AppResult<(SparseUpdate<user_reports::ActiveModel>, Option<String>)> {
        let mut update = SparseUpdate::new("User report", user_reports::Column::Id, id);
        update
            .set_with(user_reports::Column::ReportType, self.report_type, |raw| {
                Ok(category::normalize(Some(&raw))?)
            })?
            .set(user_reports::Column::Value, self.value)
            .set(user_reports::Column::Unit, self.unit)
            .set(user_reports::Column::Timestamp, self.timestamp)
            .set(user_reports::Column::Comment, self.comment);
        Ok((update, self.sensor_id))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UserReportsQuery {
    /// Viewer ID; adds `liked_by_me` to each item
    pub user_id: Option<String>,
    /// Maximum number of reports (newest first)
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ViewerQuery {
    /// Viewer ID; adds `liked_by_me`
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct OwnerQuery {
    /// Caller ID; must match the report's owner
    pub user_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LikeRequest {
    pub user_id: String,
}
