use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{types::Json, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::experience::{
        Experience, ExperienceInsert, ExperienceListing, ExperienceListingRow, ExperienceQuery,
        ExperienceRow,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxExperienceRepo,
};

#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError>;
    async fn get_experience_by_id(&self, id: &Uuid) -> Result<Option<Experience>, AppError>;
    /// Newest first. Author columns are only read when `include_author` is set.
    async fn list_experiences(&self, query: &ExperienceQuery) -> Result<Vec<ExperienceListing>, AppError>;
    async fn delete_experience(&self, id: &Uuid) -> Result<(), AppError>;
}

#[async_trait]
impl<T: ExperienceRepository + ?Sized> ExperienceRepository for Arc<T> {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError> {
        (**self).create_experience(experience).await
    }

    async fn get_experience_by_id(&self, id: &Uuid) -> Result<Option<Experience>, AppError> {
        (**self).get_experience_by_id(id).await
    }

    async fn list_experiences(&self, query: &ExperienceQuery) -> Result<Vec<ExperienceListing>, AppError> {
        (**self).list_experiences(query).await
    }

    async fn delete_experience(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_experience(id).await
    }
}

impl SqlxExperienceRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxExperienceRepo { pool }
    }
}

#[async_trait]
impl ExperienceRepository for SqlxExperienceRepo {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError> {
        sqlx::query(
            r#"
            INSERT INTO experiences (
                id, company_id, user_id, role, overall_result, stages, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(experience.id)
        .bind(experience.company_id)
        .bind(experience.user_id)
        .bind(&experience.role)
        .bind(experience.overall_result.as_str())
        .bind(Json(&experience.stages))
        .bind(experience.created_at)
        .bind(experience.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::NotFound(_) => AppError::NotFound("Company not found".into()),
            other => other,
        })?;

        Ok(Experience::from(experience.clone()))
    }

    async fn get_experience_by_id(&self, id: &Uuid) -> Result<Option<Experience>, AppError> {
        let row = sqlx::query_as::<_, ExperienceRow>(
            r#"
            SELECT id, company_id, user_id, role, overall_result, stages, created_at, updated_at
            FROM experiences
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Experience::try_from).transpose().map_err(AppError::from)
    }

    async fn list_experiences(&self, query: &ExperienceQuery) -> Result<Vec<ExperienceListing>, AppError> {
        let mut sql = QueryBuilder::new(
            r#"
            SELECT e.id, e.company_id, c.name AS company_name, e.role, e.overall_result,
                   e.stages, e.created_at, e.updated_at,
            "#,
        );

        if query.include_author {
            sql.push(
                " u.name AS author_name, u.role AS author_role
                  FROM experiences e
                  JOIN companies c ON c.id = e.company_id
                  LEFT JOIN users u ON u.id = e.user_id",
            );
        } else {
            sql.push(
                " NULL::TEXT AS author_name, NULL::TEXT AS author_role
                  FROM experiences e
                  JOIN companies c ON c.id = e.company_id",
            );
        }

        if let Some(company_id) = query.company_id {
            sql.push(" WHERE e.company_id = ");
            sql.push_bind(company_id);
        }
        sql.push(" ORDER BY e.created_at DESC, e.id DESC");

        let rows = sql
            .build_query_as::<ExperienceListingRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| ExperienceListing::try_from(row).map_err(AppError::from))
            .collect()
    }

    async fn delete_experience(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Experience not found".into()));
        }

        Ok(())
    }
}
