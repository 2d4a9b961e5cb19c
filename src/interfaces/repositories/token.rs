use std::sync::Arc;

use jsonwebtoken::TokenData;

use crate::{entities::{token::Claims, user::User}, errors::AuthError};

pub trait TokenServiceRepository: Send + Sync {
    /// Creates a new access JWT for the user
    fn create_jwt(&self, user: &User) -> Result<String, AuthError>;

    /// Decodes a JWT and returns the claims
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
}

impl<T: TokenServiceRepository + ?Sized> TokenServiceRepository for Arc<T> {
    fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        (**self).create_jwt(user)
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        (**self).decode_jwt(token)
    }
}
