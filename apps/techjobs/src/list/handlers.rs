use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::employer::Employer;
use crate::models::job::Job;
use crate::models::skill::Skill;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub employer_id: Option<i32>,
    pub skill_id: Option<i32>,
}

/// Filtered jobs plus the employer and skill collections for the filter
/// dropdowns.
#[derive(Debug, Serialize)]
pub struct JobListView {
    pub title: String,
    pub jobs: Vec<Job>,
    pub employers: Vec<Employer>,
    pub skills: Vec<Skill>,
}

/// GET /list?employer_id=…|skill_id=…
///
/// The two filters are mutually exclusive. A filter naming an employer or
/// skill with no row matches no jobs; the title then shows the raw id.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<JobListView>, AppError> {
    let (title, jobs) = match (params.employer_id, params.skill_id) {
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "Filter by employer_id or skill_id, not both".to_string(),
            ))
        }
        (Some(employer_id), None) => {
            let label = match state.employers.find_by_id(employer_id).await? {
                Some(employer) => employer.location,
                None => employer_id.to_string(),
            };
            (
                format!("Jobs with employer: {label}"),
                state.jobs.find_by_employer(employer_id).await?,
            )
        }
        (None, Some(skill_id)) => {
            let label = match state.skills.find_by_id(skill_id).await? {
                Some(skill) => skill.name,
                None => skill_id.to_string(),
            };
            (
                format!("Jobs with skill: {label}"),
                state.jobs.find_by_skill(skill_id).await?,
            )
        }
        (None, None) => ("All Jobs".to_string(), state.jobs.find_all().await?),
    };

    Ok(Json(JobListView {
        title,
        jobs,
        employers: state.employers.find_all().await?,
        skills: state.skills.find_all().await?,
    }))
}
