use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::reports;
use crate::error::AppResult;
use crate::services::category::{self, Category};
use crate::services::identifier::ResourceId;
use crate::services::sparse_update::SparseUpdate;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: Category,
    pub location: String,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    pub comment: Option<String>,
}

impl From<reports::Model> for ReportResponse {
    fn from(r: reports::Model) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            category: r.category,
            location: r.location,
            value: r.value,
            unit: r.unit,
            timestamp: r.timestamp,
            comment: r.comment,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReportRequest {
    pub user_id: String,
    /// Free text, normalized to `water_level`, `rain` or `temperature`
    pub category: Option<String>,
    pub location: String,
    pub value: f64,
    pub unit: String,
    /// Default: now
    pub timestamp: Option<DateTime<Utc>>,
    pub comment: Option<String>,
}

/// Reports are not owner-scoped: any caller may edit any report.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateReportRequest {
    pub category: Option<String>,
    pub location: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub comment: Option<String>,
}

impl UpdateReportRequest {
    pub fn into_update(self, id: ResourceId) -> AppResult<SparseUpdate<reports::ActiveModel>> {
        let mut update = SparseUpdate::new("Report", reports::Column::Id, id);
        update
            .set_with(reports::Column::Category, self.category, |raw| {
                Ok(category::normalize(Some(&raw))?)
            })?
            .set(reports::Column::Location, self.location)
            .set(reports::Column::Value, self.value)
            .set(reports::Column::Unit, self.unit)
            .set(reports::Column::Timestamp, self.timestamp)
            .set(reports::Column::Comment, self.comment);
        Ok(update)
    }
}
