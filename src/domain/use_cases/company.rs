use validator::Validate;

use crate::entities::company::{Company, CompanyDetails, NewCompany};
use crate::entities::experience::ExperienceQuery;
use crate::entities::token::Identity;
use crate::errors::AppError;
use crate::policy::{authorize, Operation};
use crate::repositories::company::CompanyRepository;
use crate::repositories::experience::ExperienceRepository;
use crate::utils::valid_uuid::valid_uuid;

pub struct CompanyHandler<C, E>
where
    C: CompanyRepository,
    E: ExperienceRepository,
{
    pub company_repo: C,
    pub experience_repo: E,
}

impl<C, E> CompanyHandler<C, E>
where
    C: CompanyRepository,
    E: ExperienceRepository,
{
    pub fn new(company_repo: C, experience_repo: E) -> Self {
        CompanyHandler { company_repo, experience_repo }
    }

    /// Adds a company to the directory. Admin only.
    #[tracing::instrument(skip(self, request))]
    pub async fn create_company(
        &self,
        identity: Option<&Identity>,
        request: NewCompany,
    ) -> Result<Company, AppError> {
        authorize(Operation::CreateCompany, identity)?;
        request.validate()?;

        let company = self.company_repo.create_company(&request.prepare_for_insert()).await?;

        tracing::info!(company_id = %company.id, "Company created");
        Ok(company)
    }

    /// Case-insensitive substring match on name; everything when `term` is `None`
    pub async fn search_companies(
        &self,
        identity: Option<&Identity>,
        term: Option<String>,
    ) -> Result<Vec<Company>, AppError> {
        authorize(Operation::SearchCompanies, identity)?;
        self.company_repo.search_companies(term).await
    }

    pub async fn get_company(&self, identity: Option<&Identity>, id: &str) -> Result<Company, AppError> {
        authorize(Operation::ViewCompany, identity)?;
        let valid_id = valid_uuid(id)?;

        self.company_repo.get_company_by_id(&valid_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".into()))
    }

    /// Company plus its experiences, newest first, without author details
    pub async fn get_company_details(
        &self,
        identity: Option<&Identity>,
        id: &str,
    ) -> Result<CompanyDetails, AppError> {
        let company = self.get_company(identity, id).await?;

        let experiences = self.experience_repo
            .list_experiences(&ExperienceQuery::anonymized(company.id))
            .await?
            .into_iter()
            .map(|listing| listing.anonymized())
            .collect();

        Ok(CompanyDetails { company, experiences })
    }
}
