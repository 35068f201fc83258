use uuid::Uuid;

use crate::errors::AppError;

/// Validates a project identifier taken from the path
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::InvalidInput("Invalid project ID format".to_string()))
}
