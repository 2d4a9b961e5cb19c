use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::entities::token::{AuthResponse, Identity};
use crate::entities::user::{normalize_email, LoginUser, NewUser, PublicUser, Role, User};
use crate::errors::{AppError, AuthError};
use crate::policy::{authorize, require_identity, Operation};
use crate::repositories::token::TokenServiceRepository;
use crate::repositories::user::UserRepository;
use crate::settings::AdminSeed;

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service,
        }
    }

    /// Registers a student account and signs it in
    #[tracing::instrument(skip_all)]
    pub async fn register(&self, request: NewUser) -> Result<AuthResponse, AppError> {
        authorize(Operation::Register, None)?;
        let request = request.normalized();
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password, Role::Student);

        let user = self.user_repo.create_user(&user_insert).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(self.create_auth_response(&user)?)
    }

    /// Logs in a user by validating credentials and issuing a JWT
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        let request = request.normalized();
        request.validate()?;

        let user = self.user_repo.get_user_by_email(&request.email)
            .await
            .map_err(|e| {
                tracing::error!("User lookup failed: {}", e);
                AuthError::Internal("User lookup failed".into())
            })?
            .ok_or(AuthError::WrongCredentials)?;

        // A stored hash that cannot be parsed is a server fault, not a bad password
        let is_password_valid = verify_password(&request.password, &user.password_hash)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(response)
    }

    /// Verifies a bearer token and returns the caller identity
    pub fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let decoded = self.token_service.decode_jwt(token)?;
        Identity::try_from(decoded.claims)
    }

    /// Profile of the signed-in caller
    pub async fn current_user(&self, identity: Option<&Identity>) -> Result<PublicUser, AppError> {
        authorize(Operation::CurrentUser, identity)?;
        let identity = require_identity(identity)?;

        let user = self.user_repo.get_user_by_id(&identity.user_id)
            .await?
            .ok_or_else(|| AppError::UnauthorizedAccess("User no longer exists".into()))?;

        Ok(PublicUser::from(&user))
    }

    /// Creates the configured admin account when its email is not yet taken.
    /// Returns whether an account was created. Existing users are left as they are.
    pub async fn ensure_admin(&self, seed: &AdminSeed) -> Result<bool, AppError> {
        let email = normalize_email(&seed.email);

        if let Some(existing) = self.user_repo.get_user_by_email(&email).await? {
            if !existing.role.is_admin() {
                tracing::warn!(user_id = %existing.id, "Admin seed email belongs to a non-admin account");
            }
            return Ok(false);
        }

        let request = NewUser {
            name: seed.name.clone(),
            email,
            password: seed.password.clone(),
        }
        .normalized();
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let insert = request.prepare_for_insert(hashed_password, Role::Admin);

        match self.user_repo.create_user(&insert).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Admin account created");
                Ok(true)
            }
            // Another instance seeded it first
            Err(AppError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(AuthResponse::new(PublicUser::from(user), token))
    }
}
