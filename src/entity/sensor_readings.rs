use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::services::category::Category;

/// A single measurement. Sensor name, location, type and unit are copied
/// from the sensor when the reading is written.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensor_readings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sensor_id: Uuid,
    pub sensor_name: String,
    pub location: String,
    pub timestamp: DateTimeUtc,
    #[sea_orm(column_name = "type")]
    pub reading_type: Category,
    pub value: f64,
    pub unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sensors::Entity",
        from = "Column::SensorId",
        to = "super::sensors::Column::Id"
    )]
    Sensor,
}

impl Related<super::sensors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sensor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
