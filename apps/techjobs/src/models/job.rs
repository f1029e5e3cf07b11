use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::employer::Employer;
use super::not_blank;
use super::skill::Skill;

/// A `job` table row with its foreign key unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i32,
    pub name: String,
    pub employer_id: i32,
}

/// A job with its employer and skills resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: i32,
    pub name: String,
    pub employer: Employer,
    pub skills: Vec<Skill>,
}

impl Job {
    /// Drops the resolved references back to the flat row.
    pub fn row(&self) -> JobRow {
        JobRow {
            id: self.id,
            name: self.name.clone(),
            employer_id: self.employer.id,
        }
    }
}

/// Submitted add-job form: the job name plus the raw ids picked in the
/// employer and skill inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AddJobForm {
    #[validate(
        custom(function = "not_blank", message = "name is required"),
        length(max = 100, message = "name must be at most 100 characters")
    )]
    pub name: String,
    pub employer_id: i32,
    #[serde(default)]
    pub skills: Vec<i32>,
}

/// A job ready to persist, its references already resolved.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub name: String,
    pub employer: Employer,
    pub skills: Vec<Skill>,
}
