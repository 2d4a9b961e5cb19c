use uuid::Uuid;

use crate::errors::AppError;

/// Parses an id taken from a path or query string
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::invalid("id", "Invalid UUID format"))
}
