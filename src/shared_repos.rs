use std::sync::Arc;

use crate::repositories::sqlx_repo::{SqlxCompanyRepo, SqlxExperienceRepo, SqlxUserRepo};
use crate::{SharedCompanyRepo, SharedExperienceRepo, SharedUserRepo};

/// Postgres-backed repositories sharing one pool
#[derive(Clone)]
pub struct SharedRepositories {
    pub user_repo: SharedUserRepo,
    pub company_repo: SharedCompanyRepo,
    pub experience_repo: SharedExperienceRepo,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            user_repo: Arc::new(SqlxUserRepo::new(pool.clone())),
            company_repo: Arc::new(SqlxCompanyRepo::new(pool.clone())),
            experience_repo: Arc::new(SqlxExperienceRepo::new(pool)),
        }
    }
}
