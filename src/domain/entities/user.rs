use std::str::FromStr;

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::Validate;
use uuid::Uuid;

use crate::domain::password::validate_password;
use crate::domain::validation::validate_not_blank;
use crate::entities::UnknownVariant;

const MAX_NAME_LENGTH: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownVariant { kind: "role", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UnknownVariant;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UserInsert {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserInsert> for User {
    fn from(insert: UserInsert) -> Self {
        User {
            id: insert.id,
            name: insert.name,
            email: insert.email,
            password_hash: insert.password_hash,
            role: insert.role,
            created_at: insert.created_at,
            updated_at: insert.updated_at,
        }
    }
}

/// Lowercased, trimmed form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[serde(default)]
    #[validate(
        length(max = MAX_NAME_LENGTH, message = "Must be at most 100 characters"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

impl NewUser {
    /// Canonical email form, applied before validation
    pub fn normalized(self) -> Self {
        NewUser { email: normalize_email(&self.email), ..self }
    }

    pub fn prepare_for_insert(&self, password_hash: String, role: Role) -> UserInsert {
        let now = Utc::now();
        UserInsert {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginUser {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

impl LoginUser {
    pub fn normalized(self) -> Self {
        LoginUser { email: normalize_email(&self.email), ..self }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }
}
