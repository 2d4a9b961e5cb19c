use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::user::{LoginUser, NewUser};
use crate::errors::AppError;
use crate::use_cases::extractors::MaybeIdentity;
use crate::AppState;

#[instrument(skip(state, user))]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>,
) -> Result<impl Responder, AppError> {
    let response = state.auth_handler.register(user.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, user))]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>,
) -> Result<impl Responder, AppError> {
    let response = state.auth_handler.login(user.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state, caller))]
pub async fn me(
    state: web::Data<AppState>,
    caller: MaybeIdentity,
) -> Result<impl Responder, AppError> {
    let user = state.auth_handler.current_user(caller.identity()).await?;

    Ok(HttpResponse::Ok().json(user))
}
