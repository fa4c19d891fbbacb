//! Keeps the sensor fields copied onto user reports in step with the
//! report's current `sensor_id`.

use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

use crate::entity::{sensors, user_reports};
use crate::error::{AppError, AppResult};
use crate::services::sparse_update::SparseUpdate;

/// Fetch a sensor that another document is about to reference.
///
/// # Errors
///
/// `NotFound` if no sensor has this id.
pub async fn require_sensor<C: ConnectionTrait>(db: &C, sensor_id: Uuid) -> AppResult<sensors::Model> {
    sensors::Entity::find_by_id(sensor_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sensor '{sensor_id}' not found")))
}

/// Point a user-report update at `sensor` and refresh the copied fields.
///
/// The sensor's unit is only copied when the sensor defines one and the
/// request did not set `unit` itself.
pub fn attach_sensor(update: &mut SparseUpdate<user_reports::ActiveModel>, sensor: &sensors::Model) {
    update
        .set(user_reports::Column::SensorId, Some(sensor.id))
        .set(user_reports::Column::SensorName, Some(sensor.name.clone()))
        .set(user_reports::Column::Location, Some(sensor.location.clone()));

    if !update.touches(user_reports::Column::Unit) {
        let unit = sensor.unit.clone().filter(|unit| !unit.trim().is_empty());
        update.set(user_reports::Column::Unit, unit);
    }
}
