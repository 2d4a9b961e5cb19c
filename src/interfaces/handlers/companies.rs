use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::company::{CompanySearch, NewCompany};
use crate::errors::AppError;
use crate::use_cases::extractors::MaybeIdentity;
use crate::AppState;

#[instrument(skip(state, caller, data))]
pub async fn create_company(
    state: web::Data<AppState>,
    caller: MaybeIdentity,
    data: web::Json<NewCompany>,
) -> Result<impl Responder, AppError> {
    let company = state.company_handler
        .create_company(caller.identity(), data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(company))
}

#[instrument(skip(state, caller, query))]
pub async fn search_companies(
    state: web::Data<AppState>,
    caller: MaybeIdentity,
    query: web::Query<CompanySearch>,
) -> Result<impl Responder, AppError> {
    let companies = state.company_handler
        .search_companies(caller.identity(), query.term())
        .await?;

    Ok(HttpResponse::Ok().json(companies))
}

#[instrument(skip(state, caller))]
pub async fn get_company(
    state: web::Data<AppState>,
    caller: MaybeIdentity,
    company_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let details = state.company_handler
        .get_company_details(caller.identity(), &company_id)
        .await?;

    Ok(HttpResponse::Ok().json(details))
}
