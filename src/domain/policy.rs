//! Access rules for every protected operation.
//!
//! Use cases call [`authorize`] before touching storage. The rules live here
//! as one pure table so they can be read and tested without HTTP or a database.

use uuid::Uuid;

use crate::entities::token::Identity;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    CurrentUser,
    SearchCompanies,
    ViewCompany,
    CreateCompany,
    SubmitExperience,
    ListExperiences { include_author: bool },
    DeleteExperience { owner: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

pub fn decide(operation: Operation, identity: Option<&Identity>) -> Decision {
    use Decision::*;
    use DenyReason::*;

    match (operation, identity) {
        (Operation::Register | Operation::Login, _) => Allow,
        (Operation::SearchCompanies | Operation::ViewCompany, _) => Allow,
        (Operation::ListExperiences { include_author: false }, _) => Allow,

        (_, None) => Deny(Unauthenticated),

        (Operation::CurrentUser | Operation::SubmitExperience, Some(_)) => Allow,
        (Operation::CreateCompany, Some(id)) if id.is_admin() => Allow,
        (Operation::ListExperiences { include_author: true }, Some(id)) if id.is_admin() => Allow,
        (Operation::DeleteExperience { owner }, Some(id)) if id.is_admin() || id.user_id == owner => Allow,

        (_, Some(_)) => Deny(Forbidden),
    }
}

pub fn authorize(operation: Operation, identity: Option<&Identity>) -> Result<(), AppError> {
    match decide(operation, identity) {
        Decision::Allow => Ok(()),
        Decision::Deny(DenyReason::Unauthenticated) => {
            Err(AppError::UnauthorizedAccess("Authentication required".into()))
        }
        Decision::Deny(DenyReason::Forbidden) => {
            tracing::warn!(?operation, "Access denied");
            Err(AppError::ForbiddenAccess("You do not have permission to perform this action".into()))
        }
    }
}

/// Unwraps the caller identity for operations that always need one
pub fn require_identity(identity: Option<&Identity>) -> Result<&Identity, AppError> {
    identity.ok_or_else(|| AppError::UnauthorizedAccess("Authentication required".into()))
}
