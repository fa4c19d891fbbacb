use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::services::category::Category;
use crate::services::likes::LikedBy;

/// A community observation tied to a sensor. `sensor_name`, `location` and
/// `unit` mirror the sensor as of the last write that set `sensor_id`;
/// `likes` always equals `liked_by.len()`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub sensor_id: Uuid,
    pub sensor_name: String,
    pub location: String,
    pub timestamp: DateTimeUtc,
    #[sea_orm(column_name = "type")]
    pub report_type: Category,
    pub value: f64,
    pub unit: String,
    pub source: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub likes: i32,
    #[sea_orm(column_type = "Json")]
    pub liked_by: LikedBy,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::sensors::Entity",
        from = "Column::SensorId",
        to = "super::sensors::Column::Id"
    )]
    Sensor,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::sensors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sensor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
