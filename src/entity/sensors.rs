use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::services::category::Category;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub sensor_type: Category,
    pub location: String,
    pub unit: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sensor_readings::Entity")]
    Readings,
    #[sea_orm(has_many = "super::user_reports::Entity")]
    UserReports,
}

impl Related<super::sensor_readings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Readings.def()
    }
}

impl Related<super::user_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
