use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::job::JobRow;
use super::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SkillForm {
    #[validate(
        custom(function = "not_blank", message = "name is required"),
        length(max = 100, message = "name must be at most 100 characters")
    )]
    pub name: String,
}

/// A skill together with every job linked to it through `job_skills`.
#[derive(Debug, Clone, Serialize)]
pub struct SkillWithJobs {
    #[serde(flatten)]
    pub skill: Skill,
    pub jobs: Vec<JobRow>,
}
