pub mod reports;
pub mod sensor_readings;
pub mod sensors;
pub mod user_reports;
pub mod users;
