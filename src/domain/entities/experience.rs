use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use crate::domain::validation::validate_not_blank;
use crate::entities::{user::Role, UnknownVariant};
use crate::errors::{AppError, FieldError};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_ROLE_LENGTH: u64 = 100;
const MAX_DESCRIPTION_LENGTH: usize = 5000;
const UNSPECIFIED_ROLE: &str = "Not specified";

// ───── Enumerations ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageType {
    #[serde(rename = "Online Test", alias = "OnlineTest", alias = "OT")]
    OnlineTest,
    Technical,
    #[serde(rename = "HR")]
    Hr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Outcome of a single stage or of the whole journey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    Selected,
    Rejected,
    #[default]
    Pending,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Selected => "Selected",
            Outcome::Rejected => "Rejected",
            Outcome::Pending => "Pending",
        }
    }
}

impl FromStr for Outcome {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Selected" => Ok(Outcome::Selected),
            "Rejected" => Ok(Outcome::Rejected),
            "Pending" => Ok(Outcome::Pending),
            other => Err(UnknownVariant { kind: "outcome", value: other.to_string() }),
        }
    }
}

/// Result vocabulary of single-round submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    Qualified,
    #[serde(rename = "Not Qualified", alias = "NotQualified")]
    NotQualified,
}

// ───── Stored Models ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub stage_type: StageType,
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub result: Outcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: Uuid,
    pub company_id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub role: String,
    pub overall_result: Outcome,
    pub stages: Vec<Stage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ExperienceRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub overall_result: String,
    pub stages: Json<Vec<Stage>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ExperienceRow> for Experience {
    type Error = UnknownVariant;

    fn try_from(row: ExperienceRow) -> Result<Self, Self::Error> {
        Ok(Experience {
            id: row.id,
            company_id: row.company_id,
            user_id: row.user_id,
            role: row.role,
            overall_result: row.overall_result.parse()?,
            stages: row.stages.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExperienceInsert {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub overall_result: Outcome,
    pub stages: Vec<Stage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExperienceInsert> for Experience {
    fn from(insert: ExperienceInsert) -> Self {
        Experience {
            id: insert.id,
            company_id: insert.company_id,
            user_id: insert.user_id,
            role: insert.role,
            overall_result: insert.overall_result,
            stages: insert.stages,
            created_at: insert.created_at,
            updated_at: insert.updated_at,
        }
    }
}

// ───── Submission Requests ────────────────────────────────────────────

fn default_included() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageInput {
    pub stage_type: StageType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub result: Outcome,
    #[serde(default = "default_included")]
    pub included: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewJourney {
    pub company_id: Uuid,

    #[serde(default)]
    #[validate(
        length(max = MAX_ROLE_LENGTH, message = "Must be at most 100 characters"),
        custom(function = "validate_not_blank", message = "Role is required")
    )]
    pub role: String,

    pub overall_result: Outcome,

    #[serde(default)]
    pub stages: Vec<StageInput>,
}

/// Single-round submission, kept as an accepted input format
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleRound {
    pub company_id: Uuid,
    pub round_type: StageType,
    #[serde(default)]
    pub description: String,
    pub result: RoundResult,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub role: Option<String>,
}

/// Either submission shape. A body carrying `roundType` is a single round,
/// anything else is parsed as a journey so field errors name the bad field.
#[derive(Debug, Clone)]
pub enum SubmitExperienceRequest {
    Journey(NewJourney),
    SingleRound(SingleRound),
}

impl<'de> Deserialize<'de> for SubmitExperienceRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let value = serde_json::Value::deserialize(deserializer)?;
        let is_single_round = value.get("roundType").is_some() && value.get("stages").is_none();

        if is_single_round {
            serde_json::from_value(value)
                .map(SubmitExperienceRequest::SingleRound)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(SubmitExperienceRequest::Journey)
                .map_err(D::Error::custom)
        }
    }
}

impl SubmitExperienceRequest {
    pub fn company_id(&self) -> Uuid {
        match self {
            SubmitExperienceRequest::Journey(journey) => journey.company_id,
            SubmitExperienceRequest::SingleRound(round) => round.company_id,
        }
    }

    pub fn into_journey(self) -> NewJourney {
        match self {
            SubmitExperienceRequest::Journey(journey) => journey,
            SubmitExperienceRequest::SingleRound(round) => round.into(),
        }
    }
}

impl From<SingleRound> for NewJourney {
    fn from(round: SingleRound) -> Self {
        let (stage_result, overall_result) = match round.result {
            RoundResult::Qualified => (Outcome::Selected, Outcome::Pending),
            RoundResult::NotQualified => (Outcome::Rejected, Outcome::Rejected),
        };

        let role = round.role
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| UNSPECIFIED_ROLE.to_string());

        NewJourney {
            company_id: round.company_id,
            role,
            overall_result,
            stages: vec![StageInput {
                stage_type: round.round_type,
                description: round.description,
                difficulty: round.difficulty,
                result: stage_result,
                included: true,
            }],
        }
    }
}

impl NewJourney {
    /// Keeps included stages that carry a description, in submission order,
    /// and checks the journey outcome against them.
    pub fn prepare_for_insert(self, user_id: Uuid) -> Result<ExperienceInsert, AppError> {
        self.validate()?;

        let mut errors = Vec::new();
        let mut stages = Vec::with_capacity(self.stages.len());

        for (index, input) in self.stages.into_iter().enumerate() {
            if !input.included {
                continue;
            }
            let description = input.description.trim();
            if description.is_empty() {
                continue;
            }
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                errors.push(FieldError {
                    field: format!("stages[{}].description", index),
                    message: format!("Must be at most {} characters", MAX_DESCRIPTION_LENGTH),
                });
                continue;
            }
            stages.push(Stage {
                stage_type: input.stage_type,
                description: description.to_string(),
                difficulty: input.difficulty,
                result: input.result,
            });
        }

        if stages.is_empty() && errors.is_empty() {
            errors.push(FieldError {
                field: "stages".into(),
                message: "At least one included stage with a description is required".into(),
            });
        }

        if self.overall_result == Outcome::Rejected
            && !stages.iter().any(|s| s.result == Outcome::Rejected)
            && errors.is_empty()
        {
            errors.push(FieldError {
                field: "overallResult".into(),
                message: "A rejected journey must include a rejected stage".into(),
            });
        }

        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        let now = Utc::now();
        Ok(ExperienceInsert {
            id: Uuid::new_v4(),
            company_id: self.company_id,
            user_id,
            role: self.role.trim().to_string(),
            overall_result: self.overall_result,
            stages,
            created_at: now,
            updated_at: now,
        })
    }
}

// ───── Listings ───────────────────────────────────────────────────────

/// Listing filter; `include_author` is a capability the caller must be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceQuery {
    pub company_id: Option<Uuid>,
    pub include_author: bool,
}

impl ExperienceQuery {
    pub fn anonymized(company_id: Uuid) -> Self {
        ExperienceQuery { company_id: Some(company_id), include_author: false }
    }

    pub fn attributed(company_id: Option<Uuid>) -> Self {
        ExperienceQuery { company_id, include_author: true }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthorSummary {
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceListing {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub role: String,
    pub overall_result: Outcome,
    pub stages: Vec<Stage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorSummary>,
}

impl ExperienceListing {
    pub fn anonymized(self) -> Self {
        ExperienceListing { author: None, ..self }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ExperienceListingRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub role: String,
    pub overall_result: String,
    pub stages: Json<Vec<Stage>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub author_role: Option<String>,
}

impl TryFrom<ExperienceListingRow> for ExperienceListing {
    type Error = UnknownVariant;

    fn try_from(row: ExperienceListingRow) -> Result<Self, Self::Error> {
        let author = match (row.author_name, row.author_role) {
            (Some(name), Some(role)) => Some(AuthorSummary { name, role: role.parse()? }),
            _ => None,
        };

        Ok(ExperienceListing {
            id: row.id,
            company_id: row.company_id,
            company_name: row.company_name,
            role: row.role,
            overall_result: row.overall_result.parse()?,
            stages: row.stages.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExperiencesParams {
    pub company_id: Option<String>,
}

impl ListExperiencesParams {
    /// A blank filter means every company
    pub fn company_filter(&self) -> Result<Option<Uuid>, AppError> {
        match self.company_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => Uuid::parse_str(id)
                .map(Some)
                .map_err(|_| AppError::invalid("companyId", "Invalid UUID format")),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stage(stage_type: StageType, description: &str, result: Outcome, included: bool) -> StageInput {
        StageInput {
            stage_type,
            description: description.to_string(),
            difficulty: Difficulty::Medium,
            result,
            included,
        }
    }

    fn journey(overall_result: Outcome, stages: Vec<StageInput>) -> NewJourney {
        NewJourney {
            company_id: Uuid::new_v4(),
            role: "SDE Intern".into(),
            overall_result,
            stages,
        }
    }

    fn field_names(err: AppError) -> Vec<String> {
        match err {
            AppError::ValidationError(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn excluded_and_empty_stages_are_dropped_in_order() {
        let insert = journey(Outcome::Pending, vec![
            stage(StageType::OnlineTest, "Aptitude + 2 DSA questions", Outcome::Selected, true),
            stage(StageType::Technical, "   ", Outcome::Selected, true),
            stage(StageType::Hr, "Never reached", Outcome::Pending, false),
            stage(StageType::Technical, "System design round", Outcome::Pending, true),
        ])
        .prepare_for_insert(Uuid::new_v4())
        .unwrap();

        let kinds: Vec<StageType> = insert.stages.iter().map(|s| s.stage_type).collect();
        assert_eq!(kinds, vec![StageType::OnlineTest, StageType::Technical]);
        assert_eq!(insert.stages[1].description, "System design round");
    }

    #[test]
    fn rejected_journey_needs_a_rejected_stage() {
        let err = journey(Outcome::Rejected, vec![
            stage(StageType::OnlineTest, "Cleared the test", Outcome::Selected, true),
        ])
        .prepare_for_insert(Uuid::new_v4())
        .unwrap_err();
        assert_eq!(field_names(err), vec!["overallResult".to_string()]);
    }

    #[test]
    fn rejected_stage_that_was_not_included_does_not_count() {
        let err = journey(Outcome::Rejected, vec![
            stage(StageType::OnlineTest, "Cleared the test", Outcome::Selected, true),
            stage(StageType::Technical, "Failed on graphs", Outcome::Rejected, false),
        ])
        .prepare_for_insert(Uuid::new_v4())
        .unwrap_err();
        assert_eq!(field_names(err), vec!["overallResult".to_string()]);
    }

    #[test]
    fn rejected_journey_with_rejected_stage_is_accepted() {
        let user_id = Uuid::new_v4();
        let insert = journey(Outcome::Rejected, vec![
            stage(StageType::OnlineTest, "Timed out on the last problem", Outcome::Rejected, true),
        ])
        .prepare_for_insert(user_id)
        .unwrap();
        assert_eq!(insert.user_id, user_id);
        assert_eq!(insert.overall_result, Outcome::Rejected);
    }

    #[test]
    fn journey_without_usable_stages_is_rejected() {
        let err = journey(Outcome::Pending, vec![
            stage(StageType::OnlineTest, "", Outcome::Pending, true),
        ])
        .prepare_for_insert(Uuid::new_v4())
        .unwrap_err();
        assert_eq!(field_names(err), vec!["stages".to_string()]);
    }

    #[test]
    fn blank_role_is_rejected() {
        let mut request = journey(Outcome::Pending, vec![
            stage(StageType::Hr, "Culture fit chat", Outcome::Pending, true),
        ]);
        request.role = "  ".into();
        let err = request.prepare_for_insert(Uuid::new_v4()).unwrap_err();
        assert_eq!(field_names(err), vec!["role".to_string()]);
    }

    #[test]
    fn overlong_description_is_reported_by_position() {
        let err = journey(Outcome::Pending, vec![
            stage(StageType::OnlineTest, "ok", Outcome::Pending, true),
            stage(StageType::Technical, &"x".repeat(5001), Outcome::Pending, true),
        ])
        .prepare_for_insert(Uuid::new_v4())
        .unwrap_err();
        assert_eq!(field_names(err), vec!["stages[1].description".to_string()]);
    }

    #[test]
    fn journey_payload_parses_with_defaults() {
        let request: SubmitExperienceRequest = serde_json::from_value(json!({
            "companyId": Uuid::new_v4(),
            "role": "SDE Intern",
            "overallResult": "Pending",
            "stages": [{ "stageType": "Online Test", "description": "MCQs" }]
        }))
        .unwrap();

        let journey = request.into_journey();
        let stage = &journey.stages[0];
        assert_eq!(stage.stage_type, StageType::OnlineTest);
        assert_eq!(stage.difficulty, Difficulty::Medium);
        assert_eq!(stage.result, Outcome::Pending);
        assert!(stage.included);
    }

    #[test]
    fn single_round_payload_becomes_one_stage_journey() {
        let company_id = Uuid::new_v4();
        let request: SubmitExperienceRequest = serde_json::from_value(json!({
            "companyId": company_id,
            "roundType": "OT",
            "description": "Two coding questions",
            "result": "Not Qualified"
        }))
        .unwrap();
        assert_eq!(request.company_id(), company_id);

        let journey = request.into_journey();
        assert_eq!(journey.role, "Not specified");
        assert_eq!(journey.overall_result, Outcome::Rejected);
        assert_eq!(journey.stages.len(), 1);
        assert_eq!(journey.stages[0].stage_type, StageType::OnlineTest);
        assert_eq!(journey.stages[0].result, Outcome::Rejected);

        let insert = journey.prepare_for_insert(Uuid::new_v4()).unwrap();
        assert_eq!(insert.stages.len(), 1);
    }

    #[test]
    fn qualified_single_round_leaves_journey_pending() {
        let journey: NewJourney = SingleRound {
            company_id: Uuid::new_v4(),
            round_type: StageType::Technical,
            description: "Trees and DP".into(),
            result: RoundResult::Qualified,
            difficulty: Difficulty::Hard,
            role: Some("Backend Engineer".into()),
        }
        .into();
        assert_eq!(journey.overall_result, Outcome::Pending);
        assert_eq!(journey.stages[0].result, Outcome::Selected);
        assert_eq!(journey.role, "Backend Engineer");
    }

    #[test]
    fn unknown_stage_type_fails_to_parse() {
        let parsed = serde_json::from_value::<SubmitExperienceRequest>(json!({
            "companyId": Uuid::new_v4(),
            "role": "SDE",
            "overallResult": "Pending",
            "stages": [{ "stageType": "Group Discussion", "description": "x" }]
        }));
        let message = parsed.unwrap_err().to_string();
        assert!(message.contains("Group Discussion"), "{}", message);
    }

    #[test]
    fn unknown_overall_result_names_the_bad_value() {
        let message = serde_json::from_value::<SubmitExperienceRequest>(json!({
            "companyId": Uuid::new_v4(),
            "role": "SDE",
            "overallResult": "Accepted",
            "stages": [{ "stageType": "HR", "description": "x" }]
        }))
        .unwrap_err()
        .to_string();

        assert!(message.contains("Accepted"), "{}", message);
        assert!(!message.contains("did not match any variant"));
    }

    #[test]
    fn single_round_errors_come_from_the_single_round_shape() {
        let message = serde_json::from_value::<SubmitExperienceRequest>(json!({
            "companyId": Uuid::new_v4(),
            "roundType": "Technical",
            "description": "Graphs",
            "result": "Maybe"
        }))
        .unwrap_err()
        .to_string();

        assert!(message.contains("Maybe"), "{}", message);
    }

    #[test]
    fn experience_never_serializes_its_owner() {
        let experience: Experience = journey(Outcome::Pending, vec![
            stage(StageType::Hr, "Salary talk", Outcome::Pending, true),
        ])
        .prepare_for_insert(Uuid::new_v4())
        .unwrap()
        .into();

        let json = serde_json::to_value(&experience).unwrap();
        assert!(json.get("userId").is_none());
        assert!(json.get("user").is_none());
        assert_eq!(json["stages"][0]["stageType"], "HR");
    }

    #[test]
    fn anonymized_listing_omits_author_key() {
        let listing = ExperienceListing {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            company_name: "Acme".into(),
            role: "SDE".into(),
            overall_result: Outcome::Pending,
            stages: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            author: Some(AuthorSummary { name: "Alice".into(), role: Role::Student }),
        };
        let attributed = serde_json::to_value(&listing).unwrap();
        assert_eq!(attributed["author"]["name"], "Alice");

        let anonymous = serde_json::to_value(&listing.anonymized()).unwrap();
        assert!(anonymous.get("author").is_none());
    }

    #[test]
    fn company_filter_accepts_blank_and_rejects_garbage() {
        let params = |v: Option<&str>| ListExperiencesParams { company_id: v.map(str::to_string) };
        let id = Uuid::new_v4();

        assert_eq!(params(None).company_filter().unwrap(), None);
        assert_eq!(params(Some(" ")).company_filter().unwrap(), None);
        assert_eq!(params(Some(&id.to_string())).company_filter().unwrap(), Some(id));
        assert!(params(Some("acme")).company_filter().is_err());
    }

    #[test]
    fn outcome_round_trips_through_its_column_text() {
        for outcome in [Outcome::Selected, Outcome::Rejected, Outcome::Pending] {
            assert_eq!(outcome.as_str().parse::<Outcome>().unwrap(), outcome);
        }
    }
}
