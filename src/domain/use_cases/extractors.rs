use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::entities::token::Identity;
use crate::errors::AuthError;
use crate::AppState;

/// Caller identity taken from an `Authorization: Bearer` header.
///
/// A request without a token yields `MaybeIdentity(None)` and is left to the
/// access policy of the use case. A token that is present but invalid or
/// expired is rejected with 401 right away.
#[derive(Debug)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

/// Returns the bearer token, if the request carries one
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequest for MaybeIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(token) = bearer_token(req) else {
            return ready(Ok(MaybeIdentity(None)));
        };

        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState is not registered");
            return ready(Err(AuthError::MissingJwtService.into()));
        };

        match state.auth_handler.authenticate(token) {
            Ok(identity) => ready(Ok(MaybeIdentity(Some(identity)))),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                ready(Err(e.into()))
            }
        }
    }
}
