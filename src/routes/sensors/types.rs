use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::sensors;
use crate::error::AppResult;
use crate::routes::users::required_text;
use crate::services::category::{self, Category};
use crate::services::identifier::ResourceId;
use crate::services::sparse_update::SparseUpdate;

#[derive(Debug, Serialize, ToSchema)]
pub struct SensorResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub sensor_type: Category,
    pub location: String,
    pub unit: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
}

impl From<sensors::Model> for SensorResponse {
    fn from(s: sensors::Model) -> Self {
        Self {
            id: s.id,
            name: s.name,
            sensor_type: s.sensor_type,
            location: s.location,
            unit: s.unit,
            latitude: s.latitude,
            longitude: s.longitude,
            is_active: s.is_active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSensorRequest {
    pub name: String,
    /// Free text, normalized to `water_level`, `rain` or `temperature`
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
    pub location: String,
    pub unit: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Default: true
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSensorRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
    pub location: Option<String>,
    pub unit: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: Option<bool>,
}

impl UpdateSensorRequest {
    pub fn into_update(self, id: ResourceId) -> AppResult<SparseUpdate<sensors::ActiveModel>> {
        let mut update = SparseUpdate::new("Sensor", sensors::Column::Id, id);
        update
            .set_with(sensors::Column::Name, self.name, |name| required_text("name", name))?
            .set_with(sensors::Column::SensorType, self.sensor_type, |raw| {
                Ok(category::normalize(Some(&raw))?)
            })?
            .set(sensors::Column::Location, self.location)
            .set(sensors::Column::Unit, self.unit)
            .set(sensors::Column::Latitude, self.latitude)
            .set(sensors::Column::Longitude, self.longitude)
            .set(sensors::Column::IsActive, self.is_active);
        Ok(update)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SensorsQuery {
    /// Filter by type (synonyms accepted)
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
    /// Filter by active flag
    pub active: Option<bool>,
}
