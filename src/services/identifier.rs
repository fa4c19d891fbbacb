use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Store-native identifier for every collection.
pub type ResourceId = Uuid;

/// Decode an externally supplied identifier.
///
/// `field` names the path/body/query field in the error message.
///
/// # Errors
///
/// Returns `AppError::InvalidIdentifier` if `raw` is not a UUID.
pub fn decode(field: &str, raw: &str) -> AppResult<ResourceId> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::InvalidIdentifier(format!("'{raw}' is not a valid {field}")))
}

/// Decode an optional identifier, passing `None` through.
pub fn decode_opt(field: &str, raw: Option<&str>) -> AppResult<Option<ResourceId>> {
    raw.map(|raw| decode(field, raw)).transpose()
}
