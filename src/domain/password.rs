use validator::ValidationError;

pub const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Rejects blank passwords and passwords outside the accepted length range
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        let mut error = ValidationError::new("password_required");
        error.message = Some("Password is required".into());
        return Err(error);
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        let mut error = ValidationError::new("password_length");
        error.message = Some(format!("Must be at least {} characters", MIN_PASSWORD_LENGTH).into());
        return Err(error);
    }
    if length > MAX_PASSWORD_LENGTH {
        let mut error = ValidationError::new("password_length");
        error.message = Some(format!("Must be at most {} characters", MAX_PASSWORD_LENGTH).into());
        return Err(error);
    }

    Ok(())
}
