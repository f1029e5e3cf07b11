pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::employers::handlers as employers;
use crate::home::handlers as home;
use crate::list::handlers as list;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/", get(home::handle_index))
        .route(
            "/add",
            get(home::handle_add_job_form).post(home::handle_process_add_job),
        )
        .route("/view/:id", get(home::handle_view_job))
        .route("/list", get(list::handle_list_jobs))
        // Employers
        .route("/employers", get(employers::handle_list_employers))
        .route("/employers/add", post(employers::handle_add_employer))
        .route("/employers/view/:id", get(employers::handle_view_employer))
        // Skills
        .route("/skills", get(skills::handle_list_skills))
        .route("/skills/add", post(skills::handle_add_skill))
        .route("/skills/view/:id", get(skills::handle_view_skill))
        .with_state(state)
}
