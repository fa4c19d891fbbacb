mod handlers;
mod types;

pub use handlers::{create_sensor, delete_sensor, get_sensor, list_sensors, update_sensor};
pub use types::{CreateSensorRequest, SensorResponse, SensorsQuery, UpdateSensorRequest};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_sensor, __path_delete_sensor, __path_get_sensor, __path_list_sensors,
    __path_update_sensor,
};
