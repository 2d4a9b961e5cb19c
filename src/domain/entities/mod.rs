pub mod company;
pub mod experience;
pub mod token;
pub mod user;

use derive_more::Display;

use crate::errors::AppError;

/// A stored enum column held a value outside its variant set
#[derive(Debug, Display)]
#[display("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl From<UnknownVariant> for AppError {
    fn from(err: UnknownVariant) -> Self {
        tracing::error!("Corrupt stored value: {}", err);
        AppError::InternalError("Stored record is malformed".into())
    }
}
