use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::experience::{ExperienceQuery, ListExperiencesParams, SubmitExperienceRequest};
use crate::errors::AppError;
use crate::use_cases::extractors::MaybeIdentity;
use crate::AppState;

#[instrument(skip(state, caller, data))]
pub async fn submit_experience(
    state: web::Data<AppState>,
    caller: MaybeIdentity,
    data: web::Json<SubmitExperienceRequest>,
) -> Result<impl Responder, AppError> {
    let experience = state.experience_handler
        .submit_experience(caller.identity(), data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(experience))
}

/// Attributed listing for administrators
#[instrument(skip(state, caller, query))]
pub async fn list_experiences(
    state: web::Data<AppState>,
    caller: MaybeIdentity,
    query: web::Query<ListExperiencesParams>,
) -> Result<impl Responder, AppError> {
    let company_id = query.company_filter()?;

    let experiences = state.experience_handler
        .list_experiences(caller.identity(), ExperienceQuery::attributed(company_id))
        .await?;

    Ok(HttpResponse::Ok().json(experiences))
}

#[instrument(skip(state, caller))]
pub async fn delete_experience(
    state: web::Data<AppState>,
    caller: MaybeIdentity,
    experience_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.experience_handler
        .delete_experience(caller.identity(), &experience_id)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Experience deleted successfully"
    })))
}
