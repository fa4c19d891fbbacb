pub mod category;
pub mod identifier;
pub mod likes;
pub mod sensor_sync;
pub mod sparse_update;
