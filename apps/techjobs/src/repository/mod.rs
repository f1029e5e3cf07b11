//! Repository traits — one per entity — and their backends.
//!
//! `PgStore` implements all three against PostgreSQL. `AppState` carries
//! them as `Arc<dyn …Repository>` so handlers never see the backend.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::employer::{Employer, EmployerForm};
use crate::models::job::{Job, NewJob};
use crate::models::skill::{Skill, SkillForm};

#[async_trait]
pub trait EmployerRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Employer>, AppError>;
    async fn find_all(&self) -> Result<Vec<Employer>, AppError>;
    async fn save(&self, form: &EmployerForm) -> Result<Employer, AppError>;
}

#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Skill>, AppError>;
    async fn find_all(&self) -> Result<Vec<Skill>, AppError>;
    /// Resolves selected ids; ids with no matching row are silently absent.
    async fn find_all_by_id(&self, ids: &[i32]) -> Result<Vec<Skill>, AppError>;
    /// Skills joined to `job_skills`, one entry per skill, ordered by name.
    /// With `linked_only`, skills attached to no job are excluded.
    async fn find_joined(&self, linked_only: bool) -> Result<Vec<Skill>, AppError>;
    async fn save(&self, form: &SkillForm) -> Result<Skill, AppError>;
}

/// Job is the owning side of `job_skills`: saving a job is the only write
/// path for the junction table.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Job>, AppError>;
    async fn find_all(&self) -> Result<Vec<Job>, AppError>;
    async fn find_by_employer(&self, employer_id: i32) -> Result<Vec<Job>, AppError>;
    async fn find_by_skill(&self, skill_id: i32) -> Result<Vec<Job>, AppError>;
    async fn save(&self, job: NewJob) -> Result<Job, AppError>;
}

/// Drops repeated skills, keeping the first occurrence of each id.
pub fn distinct_skills(skills: Vec<Skill>) -> Vec<Skill> {
    let mut seen = HashSet::new();
    skills.into_iter().filter(|s| seen.insert(s.id)).collect()
}

/// Collapses skill ⋈ job_skills rows (one per linked job) into one entry per
/// skill, ordered by name ascending regardless of case. The sort is stable so
/// equal names keep the store's order.
pub fn collapse_joined_rows(rows: Vec<Skill>) -> Vec<Skill> {
    let mut skills = distinct_skills(rows);
    skills.sort_by_cached_key(|s| s.name.to_lowercase());
    skills
}
