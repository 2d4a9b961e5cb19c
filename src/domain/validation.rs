use validator::ValidationError;

/// Rejects strings that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Cannot be empty".into());
        return Err(error);
    }
    Ok(())
}
