use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::errors::AppError;
use crate::models::skill::{Skill, SkillForm, SkillWithJobs};
use crate::models::{field_errors, FieldErrors};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SkillsQuery {
    #[serde(default)]
    pub linked_only: bool,
}

#[derive(Debug, Serialize)]
pub struct SkillFormView {
    pub form: SkillForm,
    pub errors: FieldErrors,
}

/// GET /skills?linked_only=true
///
/// Runs the skill ⋈ job_skills query; skills come back once each, by name.
pub async fn handle_list_skills(
    State(state): State<AppState>,
    Query(params): Query<SkillsQuery>,
) -> Result<Json<Vec<Skill>>, AppError> {
    Ok(Json(state.skills.find_joined(params.linked_only).await?))
}

/// POST /skills/add
pub async fn handle_add_skill(
    State(state): State<AppState>,
    payload: Result<Json<SkillForm>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(form) = payload?;
    if let Err(errors) = form.validate() {
        let errors = field_errors(&errors);
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(SkillFormView { form, errors }),
        )
            .into_response());
    }

    let skill = state.skills.save(&form).await?;
    info!("Created skill {} ({})", skill.id, skill.name);
    Ok(Redirect::to(&format!("/skills/view/{}", skill.id)).into_response())
}

/// GET /skills/view/:id
pub async fn handle_view_skill(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SkillWithJobs>, AppError> {
    let skill = state
        .skills
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Skill {id} not found")))?;
    let jobs = state
        .jobs
        .find_by_skill(id)
        .await?
        .into_iter()
        .map(|job| job.row())
        .collect();
    Ok(Json(SkillWithJobs { skill, jobs }))
}
