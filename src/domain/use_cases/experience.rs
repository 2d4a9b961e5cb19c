use crate::entities::experience::{Experience, ExperienceListing, ExperienceQuery, SubmitExperienceRequest};
use crate::entities::token::Identity;
use crate::errors::AppError;
use crate::policy::{authorize, require_identity, Operation};
use crate::repositories::company::CompanyRepository;
use crate::repositories::experience::ExperienceRepository;
use crate::utils::valid_uuid::valid_uuid;

pub struct ExperienceHandler<E, C>
where
    E: ExperienceRepository,
    C: CompanyRepository,
{
    pub experience_repo: E,
    pub company_repo: C,
}

impl<E, C> ExperienceHandler<E, C>
where
    E: ExperienceRepository,
    C: CompanyRepository,
{
    pub fn new(experience_repo: E, company_repo: C) -> Self {
        ExperienceHandler { experience_repo, company_repo }
    }

    /// Stores an interview journey for the signed-in caller
    #[tracing::instrument(skip(self, request))]
    pub async fn submit_experience(
        &self,
        identity: Option<&Identity>,
        request: SubmitExperienceRequest,
    ) -> Result<Experience, AppError> {
        authorize(Operation::SubmitExperience, identity)?;
        let identity = require_identity(identity)?;

        let company_id = request.company_id();
        if self.company_repo.get_company_by_id(&company_id).await?.is_none() {
            return Err(AppError::NotFound("Company not found".into()));
        }

        let insert = request.into_journey().prepare_for_insert(identity.user_id)?;
        let experience = self.experience_repo.create_experience(&insert).await?;

        tracing::info!(experience_id = %experience.id, %company_id, stages = experience.stages.len(), "Experience submitted");
        Ok(experience)
    }

    /// Newest first. Author details are only returned when the query asks for
    /// them and the caller is allowed to see them.
    pub async fn list_experiences(
        &self,
        identity: Option<&Identity>,
        query: ExperienceQuery,
    ) -> Result<Vec<ExperienceListing>, AppError> {
        authorize(Operation::ListExperiences { include_author: query.include_author }, identity)?;

        let listings = self.experience_repo.list_experiences(&query).await?;

        if query.include_author {
            Ok(listings)
        } else {
            Ok(listings.into_iter().map(ExperienceListing::anonymized).collect())
        }
    }

    /// Permanently removes an experience. Owner or admin only.
    #[tracing::instrument(skip(self))]
    pub async fn delete_experience(&self, identity: Option<&Identity>, id: &str) -> Result<(), AppError> {
        let caller = require_identity(identity)?;
        let valid_id = valid_uuid(id)?;

        let experience = self.experience_repo.get_experience_by_id(&valid_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Experience not found".into()))?;

        authorize(Operation::DeleteExperience { owner: experience.user_id }, Some(caller))?;

        self.experience_repo.delete_experience(&valid_id).await?;

        tracing::info!(experience_id = %valid_id, deleted_by = %caller.user_id, "Experience deleted");
        Ok(())
    }
}
