use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::entities::user::{PublicUser, Role};
use crate::errors::AuthError;

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: PublicUser, token: String) -> Self {
        AuthResponse { user, token }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

/// Caller identity decoded from a verified access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Identity { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl TryFrom<Claims> for Identity {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;
        Ok(Identity { user_id, role: claims.role })
    }
}
