use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::errors::AppError;
use crate::models::employer::{Employer, EmployerForm, EmployerWithJobs};
use crate::models::{field_errors, FieldErrors};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EmployerFormView {
    pub form: EmployerForm,
    pub errors: FieldErrors,
}

/// GET /employers
pub async fn handle_list_employers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Employer>>, AppError> {
    Ok(Json(state.employers.find_all().await?))
}

/// POST /employers/add
pub async fn handle_add_employer(
    State(state): State<AppState>,
    payload: Result<Json<EmployerForm>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(form) = payload?;
    if let Err(errors) = form.validate() {
        let errors = field_errors(&errors);
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(EmployerFormView { form, errors }),
        )
            .into_response());
    }

    let employer = state.employers.save(&form).await?;
    info!("Created employer {} ({})", employer.id, employer.location);
    Ok(Redirect::to(&format!("/employers/view/{}", employer.id)).into_response())
}

/// GET /employers/view/:id
pub async fn handle_view_employer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EmployerWithJobs>, AppError> {
    let employer = state
        .employers
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employer {id} not found")))?;
    let jobs = state
        .jobs
        .find_by_employer(id)
        .await?
        .into_iter()
        .map(|job| job.row())
        .collect();
    Ok(Json(EmployerWithJobs { employer, jobs }))
}
