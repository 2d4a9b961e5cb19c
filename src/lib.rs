use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;
pub mod telemetry;

pub use domain::{entities, policy, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{auth, db, utils, web};

use auth::jwt::JwtService;
use repositories::{
    company::CompanyRepository, experience::ExperienceRepository, user::UserRepository,
};
use shared_repos::SharedRepositories;
use use_cases::{auth::AuthHandler, company::CompanyHandler, experience::ExperienceHandler};

pub type SharedUserRepo = Arc<dyn UserRepository>;
pub type SharedCompanyRepo = Arc<dyn CompanyRepository>;
pub type SharedExperienceRepo = Arc<dyn ExperienceRepository>;

pub type AppAuthHandler = AuthHandler<SharedUserRepo, JwtService>;
pub type AppCompanyHandler = CompanyHandler<SharedCompanyRepo, SharedExperienceRepo>;
pub type AppExperienceHandler = ExperienceHandler<SharedExperienceRepo, SharedCompanyRepo>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub company_handler: AppCompanyHandler,
    pub experience_handler: AppExperienceHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let repos = SharedRepositories::new(pool);
        Self::from_repositories(config, repos.user_repo, repos.company_repo, repos.experience_repo)
    }

    /// Builds the state over any repository implementation
    pub fn from_repositories(
        config: &settings::AppConfig,
        user_repo: SharedUserRepo,
        company_repo: SharedCompanyRepo,
        experience_repo: SharedExperienceRepo,
    ) -> Self {
        AppState {
            auth_handler: AuthHandler::new(user_repo, JwtService::new(config)),
            company_handler: CompanyHandler::new(company_repo.clone(), experience_repo.clone()),
            experience_handler: ExperienceHandler::new(experience_repo, company_repo),
        }
    }
}
