use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::info;

use super::{collapse_joined_rows, distinct_skills, EmployerRepository, JobRepository, SkillRepository};
use crate::errors::AppError;
use crate::models::employer::{Employer, EmployerForm};
use crate::models::job::{Job, NewJob};
use crate::models::skill::{Skill, SkillForm};

/// Every skill, joined to its job links.
pub const SKILLS_JOINED_SQL: &str =
    "SELECT * FROM skill LEFT JOIN job_skills ON skill.id = job_skills.skills_id ORDER BY name ASC;";

/// Only skills attached to at least one job.
pub const SKILLS_WITH_JOBS_SQL: &str = "SELECT * FROM skill LEFT JOIN job_skills ON skill.id = job_skills.skills_id WHERE job_skills.jobs_id IS NOT NULL ORDER BY name ASC;";

const JOB_SELECT: &str = r#"
    SELECT job.id, job.name, job.employer_id, employer.location
    FROM job
    JOIN employer ON employer.id = job.employer_id
"#;

#[derive(Debug, FromRow)]
struct JobEmployerRow {
    id: i32,
    name: String,
    employer_id: i32,
    location: String,
}

#[derive(Debug, FromRow)]
struct JobSkillRow {
    jobs_id: i32,
    id: i32,
    name: String,
}

/// PostgreSQL-backed repositories sharing one connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attaches employer and skills to each job row, preserving row order.
    async fn hydrate(&self, rows: Vec<JobEmployerRow>) -> Result<Vec<Job>, AppError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

        let links = sqlx::query_as::<_, JobSkillRow>(
            r#"
            SELECT job_skills.jobs_id, skill.id, skill.name
            FROM job_skills
            JOIN skill ON skill.id = job_skills.skills_id
            WHERE job_skills.jobs_id = ANY($1)
            ORDER BY skill.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut skills_by_job: HashMap<i32, Vec<Skill>> = HashMap::new();
        for link in links {
            skills_by_job.entry(link.jobs_id).or_default().push(Skill {
                id: link.id,
                name: link.name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|r| Job {
                skills: skills_by_job.remove(&r.id).unwrap_or_default(),
                id: r.id,
                name: r.name,
                employer: Employer {
                    id: r.employer_id,
                    location: r.location,
                },
            })
            .collect())
    }
}

#[async_trait]
impl EmployerRepository for PgStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Employer>, AppError> {
        Ok(
            sqlx::query_as::<_, Employer>("SELECT id, location FROM employer WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_all(&self) -> Result<Vec<Employer>, AppError> {
        Ok(
            sqlx::query_as::<_, Employer>("SELECT id, location FROM employer ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn save(&self, form: &EmployerForm) -> Result<Employer, AppError> {
        let employer = sqlx::query_as::<_, Employer>(
            "INSERT INTO employer (location) VALUES ($1) RETURNING id, location",
        )
        .bind(&form.location)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted employer {}", employer.id);
        Ok(employer)
    }
}

#[async_trait]
impl SkillRepository for PgStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Skill>, AppError> {
        Ok(
            sqlx::query_as::<_, Skill>("SELECT id, name FROM skill WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_all(&self) -> Result<Vec<Skill>, AppError> {
        Ok(
            sqlx::query_as::<_, Skill>("SELECT id, name FROM skill ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn find_all_by_id(&self, ids: &[i32]) -> Result<Vec<Skill>, AppError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        Ok(
            sqlx::query_as::<_, Skill>("SELECT id, name FROM skill WHERE id = ANY($1) ORDER BY id")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn find_joined(&self, linked_only: bool) -> Result<Vec<Skill>, AppError> {
        let sql = if linked_only {
            SKILLS_WITH_JOBS_SQL
        } else {
            SKILLS_JOINED_SQL
        };
        let rows = sqlx::query_as::<_, Skill>(sql).fetch_all(&self.pool).await?;
        Ok(collapse_joined_rows(rows))
    }

    async fn save(&self, form: &SkillForm) -> Result<Skill, AppError> {
        let skill = sqlx::query_as::<_, Skill>(
            "INSERT INTO skill (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&form.name)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted skill {} ({})", skill.id, skill.name);
        Ok(skill)
    }
}

#[async_trait]
impl JobRepository for PgStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Job>, AppError> {
        let row = sqlx::query_as::<_, JobEmployerRow>(&format!("{JOB_SELECT} WHERE job.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, JobEmployerRow>(&format!("{JOB_SELECT} ORDER BY job.id"))
            .fetch_all(&self.pool)
            .await?;
        self.hydrate(rows).await
    }

    async fn find_by_employer(&self, employer_id: i32) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, JobEmployerRow>(&format!(
            "{JOB_SELECT} WHERE job.employer_id = $1 ORDER BY job.id"
        ))
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await?;
        self.hydrate(rows).await
    }

    async fn find_by_skill(&self, skill_id: i32) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, JobEmployerRow>(&format!(
            "{JOB_SELECT} WHERE job.id IN (SELECT jobs_id FROM job_skills WHERE skills_id = $1) ORDER BY job.id"
        ))
        .bind(skill_id)
        .fetch_all(&self.pool)
        .await?;
        self.hydrate(rows).await
    }

    async fn save(&self, job: NewJob) -> Result<Job, AppError> {
        let NewJob {
            name,
            employer,
            skills,
        } = job;
        let skills = distinct_skills(skills);

        // job row and junction rows commit together
        let mut tx = self.pool.begin().await?;

        let id: i32 =
            sqlx::query_scalar("INSERT INTO job (name, employer_id) VALUES ($1, $2) RETURNING id")
                .bind(&name)
                .bind(employer.id)
                .fetch_one(&mut *tx)
                .await?;

        for skill in &skills {
            sqlx::query("INSERT INTO job_skills (jobs_id, skills_id) VALUES ($1, $2)")
                .bind(id)
                .bind(skill.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(
            "Inserted job {id} for employer {} with {} skill(s)",
            employer.id,
            skills.len()
        );

        Ok(Job {
            id,
            name,
            employer,
            skills,
        })
    }
}
