use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::validation::validate_not_blank;
use crate::entities::experience::ExperienceListing;

const MAX_NAME_LENGTH: u64 = 100;
const MAX_INDUSTRY_LENGTH: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CompanyInsert {
    pub id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CompanyInsert> for Company {
    fn from(insert: CompanyInsert) -> Self {
        Company {
            id: insert.id,
            name: insert.name,
            industry: insert.industry,
            created_at: insert.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCompany {
    #[serde(default)]
    #[validate(
        length(max = MAX_NAME_LENGTH, message = "Must be at most 100 characters"),
        custom(function = "validate_not_blank", message = "Company name is required")
    )]
    pub name: String,

    #[validate(length(max = MAX_INDUSTRY_LENGTH, message = "Must be at most 100 characters"))]
    pub industry: Option<String>,
}

impl NewCompany {
    pub fn prepare_for_insert(&self) -> CompanyInsert {
        CompanyInsert {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            industry: self.industry
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompanySearch {
    pub search: Option<String>,
}

impl CompanySearch {
    /// Blank searches behave like no search
    pub fn term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Company page payload: the company plus its anonymized experiences
#[derive(Debug, Serialize)]
pub struct CompanyDetails {
    pub company: Company,
    pub experiences: Vec<ExperienceListing>,
}
