use async_trait::async_trait;
use jsonwebtoken::TokenData;
use mockall::mock;
use uuid::Uuid;

use crate::entities::company::{Company, CompanyInsert};
use crate::entities::experience::{Experience, ExperienceInsert, ExperienceListing, ExperienceQuery};
use crate::entities::token::Claims;
use crate::entities::user::{User, UserInsert};
use crate::errors::{AppError, AuthError};
use crate::repositories::company::CompanyRepository;
use crate::repositories::experience::ExperienceRepository;
use crate::repositories::token::TokenServiceRepository;
use crate::repositories::user::UserRepository;

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn check_connection(&self) -> Result<(), AppError>;
        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
        async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
        async fn create_user(&self, user: &UserInsert) -> Result<User, AppError>;
    }
}

mock! {
    pub TokenService {}

    impl TokenServiceRepository for TokenService {
        fn create_jwt(&self, user: &User) -> Result<String, AuthError>;
        fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
    }
}

mock! {
    pub CompanyRepo {}

    #[async_trait]
    impl CompanyRepository for CompanyRepo {
        async fn create_company(&self, company: &CompanyInsert) -> Result<Company, AppError>;
        async fn search_companies(&self, term: Option<String>) -> Result<Vec<Company>, AppError>;
        async fn get_company_by_id(&self, id: &Uuid) -> Result<Option<Company>, AppError>;
    }
}

mock! {
    pub ExperienceRepo {}

    #[async_trait]
    impl ExperienceRepository for ExperienceRepo {
        async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError>;
        async fn get_experience_by_id(&self, id: &Uuid) -> Result<Option<Experience>, AppError>;
        async fn list_experiences(&self, query: &ExperienceQuery) -> Result<Vec<ExperienceListing>, AppError>;
        async fn delete_experience(&self, id: &Uuid) -> Result<(), AppError>;
    }
}
