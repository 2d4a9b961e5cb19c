use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::company::{Company, CompanyInsert},
    errors::{is_unique_violation, AppError},
    repositories::sqlx_repo::SqlxCompanyRepo,
};

/// Escapes LIKE metacharacters so the term matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create_company(&self, company: &CompanyInsert) -> Result<Company, AppError>;
    async fn search_companies(&self, term: Option<String>) -> Result<Vec<Company>, AppError>;
    async fn get_company_by_id(&self, id: &Uuid) -> Result<Option<Company>, AppError>;
}

#[async_trait]
impl<T: CompanyRepository + ?Sized> CompanyRepository for Arc<T> {
    async fn create_company(&self, company: &CompanyInsert) -> Result<Company, AppError> {
        (**self).create_company(company).await
    }

    async fn search_companies(&self, term: Option<String>) -> Result<Vec<Company>, AppError> {
        (**self).search_companies(term).await
    }

    async fn get_company_by_id(&self, id: &Uuid) -> Result<Option<Company>, AppError> {
        (**self).get_company_by_id(id).await
    }
}

impl SqlxCompanyRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxCompanyRepo { pool }
    }
}

#[async_trait]
impl CompanyRepository for SqlxCompanyRepo {
    async fn create_company(&self, company: &CompanyInsert) -> Result<Company, AppError> {
        sqlx::query(
            r#"
            INSERT INTO companies (id, name, industry, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.industry)
        .bind(company.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Company already exists".into())
            } else {
                AppError::from(e)
            }
        })?;

        Ok(Company::from(company.clone()))
    }

    async fn search_companies(&self, term: Option<String>) -> Result<Vec<Company>, AppError> {
        let mut query = QueryBuilder::new("SELECT id, name, industry, created_at FROM companies");

        if let Some(term) = term {
            query.push(" WHERE name ILIKE ");
            query.push_bind(like_pattern(&term));
            query.push(" ESCAPE '\\'");
        }
        query.push(" ORDER BY created_at ASC, id ASC");

        let companies = query
            .build_query_as::<Company>()
            .fetch_all(&self.pool)
            .await?;

        Ok(companies)
    }

    async fn get_company_by_id(&self, id: &Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT id, name, industry, created_at FROM companies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }
}
