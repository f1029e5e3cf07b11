use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::job::JobRow;
use super::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employer {
    pub id: i32,
    pub location: String,
}

/// Submitted employer form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EmployerForm {
    #[validate(
        custom(function = "not_blank", message = "location is required"),
        length(min = 3, max = 80, message = "location must be between 3 to 80 characters")
    )]
    pub location: String,
}

/// An employer together with the jobs that reference it.
#[derive(Debug, Clone, Serialize)]
pub struct EmployerWithJobs {
    #[serde(flatten)]
    pub employer: Employer,
    pub jobs: Vec<JobRow>,
}
