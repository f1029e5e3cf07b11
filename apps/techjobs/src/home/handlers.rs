//! Axum route handlers for the job pages: index, add-job form, job detail.

use std::collections::BTreeSet;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use validator::Validate;

use crate::errors::AppError;
use crate::models::employer::Employer;
use crate::models::job::{AddJobForm, Job, NewJob};
use crate::models::skill::Skill;
use crate::models::{field_errors, FieldErrors};
use crate::repository::SkillRepository;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct IndexView {
    pub title: &'static str,
    pub jobs: Vec<Job>,
}

/// The add-job form as a template would render it: prior input, field
/// errors, and the option lists for the employer and skill inputs.
#[derive(Debug, Serialize)]
pub struct JobFormView {
    pub title: &'static str,
    pub form: AddJobForm,
    pub errors: FieldErrors,
    pub employers: Vec<Employer>,
    pub skills: Vec<Skill>,
}

async fn job_form_view(
    state: &AppState,
    form: AddJobForm,
    errors: FieldErrors,
) -> Result<JobFormView, AppError> {
    Ok(JobFormView {
        title: "Add Job",
        form,
        errors,
        employers: state.employers.find_all().await?,
        skills: state.skills.find_all().await?,
    })
}

/// Resolves selected skill ids, failing with the ids that match no row.
pub async fn resolve_skills(
    skills: &dyn SkillRepository,
    ids: &[i32],
) -> Result<Vec<Skill>, AppError> {
    let found = skills.find_all_by_id(ids).await?;
    let found_ids: BTreeSet<i32> = found.iter().map(|s| s.id).collect();
    let missing: BTreeSet<i32> = ids
        .iter()
        .copied()
        .filter(|id| !found_ids.contains(id))
        .collect();

    if !missing.is_empty() {
        let list = missing
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        warn!("Rejected job with unknown skill id(s): {list}");
        return Err(AppError::NotFound(format!("Skill(s) {list} not found")));
    }
    Ok(found)
}

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Result<Json<IndexView>, AppError> {
    Ok(Json(IndexView {
        title: "MyJobs",
        jobs: state.jobs.find_all().await?,
    }))
}

/// GET /add
pub async fn handle_add_job_form(
    State(state): State<AppState>,
) -> Result<Json<JobFormView>, AppError> {
    let view = job_form_view(&state, AddJobForm::default(), FieldErrors::new()).await?;
    Ok(Json(view))
}

/// POST /add
///
/// Invalid input re-renders the form with `422`. Otherwise the employer id
/// and skill ids are resolved to rows, the job is saved with its
/// `job_skills` links, and the client is redirected to the new job.
pub async fn handle_process_add_job(
    State(state): State<AppState>,
    payload: Result<Json<AddJobForm>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(form) = payload?;
    if let Err(errors) = form.validate() {
        let view = job_form_view(&state, form, field_errors(&errors)).await?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response());
    }

    let employer = state
        .employers
        .find_by_id(form.employer_id)
        .await?
        .ok_or_else(|| {
            warn!("Rejected job with unknown employer id {}", form.employer_id);
            AppError::NotFound(format!("Employer {} not found", form.employer_id))
        })?;
    let skills = resolve_skills(state.skills.as_ref(), &form.skills).await?;

    let job = state
        .jobs
        .save(NewJob {
            name: form.name,
            employer,
            skills,
        })
        .await?;
    info!("Created job {} ({})", job.id, job.name);

    Ok(Redirect::to(&format!("/view/{}", job.id)).into_response())
}

/// GET /view/:id
pub async fn handle_view_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Job>, AppError> {
    let job = state
        .jobs
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}
