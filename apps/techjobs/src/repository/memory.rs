//! In-memory repositories used by handler tests. Mirrors the PostgreSQL
//! schema: serial ids per table, foreign keys checked on write, and the
//! junction table held as `(jobs_id, skills_id)` pairs.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{collapse_joined_rows, distinct_skills, EmployerRepository, JobRepository, SkillRepository};
use crate::errors::AppError;
use crate::models::employer::{Employer, EmployerForm};
use crate::models::job::{Job, JobRow, NewJob};
use crate::models::skill::{Skill, SkillForm};

#[derive(Default)]
struct Tables {
    employers: BTreeMap<i32, Employer>,
    skills: BTreeMap<i32, Skill>,
    jobs: BTreeMap<i32, JobRow>,
    job_skills: BTreeSet<(i32, i32)>,
    employer_seq: i32,
    skill_seq: i32,
    job_seq: i32,
}

fn next(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

impl Tables {
    fn hydrate(&self, row: &JobRow) -> Result<Job, AppError> {
        let employer = self
            .employers
            .get(&row.employer_id)
            .cloned()
            .ok_or_else(|| anyhow!("job {} references missing employer {}", row.id, row.employer_id))?;
        let skills = self
            .job_skills
            .iter()
            .filter(|(job_id, _)| *job_id == row.id)
            .filter_map(|(_, skill_id)| self.skills.get(skill_id).cloned())
            .collect();
        Ok(Job {
            id: row.id,
            name: row.name.clone(),
            employer,
            skills,
        })
    }

    fn hydrate_where(&self, keep: impl Fn(&JobRow) -> bool) -> Result<Vec<Job>, AppError> {
        self.jobs
            .values()
            .filter(|row| keep(row))
            .map(|row| self.hydrate(row))
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployerRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Employer>, AppError> {
        Ok(self.tables.read().await.employers.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Employer>, AppError> {
        Ok(self.tables.read().await.employers.values().cloned().collect())
    }

    async fn save(&self, form: &EmployerForm) -> Result<Employer, AppError> {
        let mut tables = self.tables.write().await;
        let employer = Employer {
            id: next(&mut tables.employer_seq),
            location: form.location.clone(),
        };
        tables.employers.insert(employer.id, employer.clone());
        Ok(employer)
    }
}

#[async_trait]
impl SkillRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Skill>, AppError> {
        Ok(self.tables.read().await.skills.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Skill>, AppError> {
        Ok(self.tables.read().await.skills.values().cloned().collect())
    }

    async fn find_all_by_id(&self, ids: &[i32]) -> Result<Vec<Skill>, AppError> {
        let tables = self.tables.read().await;
        let wanted: BTreeSet<i32> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| tables.skills.get(&id).cloned())
            .collect())
    }

    async fn find_joined(&self, linked_only: bool) -> Result<Vec<Skill>, AppError> {
        let tables = self.tables.read().await;
        // LEFT JOIN: one row per link, or a single null-joined row
        let mut rows = Vec::new();
        for skill in tables.skills.values() {
            let links = tables
                .job_skills
                .iter()
                .filter(|(_, skill_id)| *skill_id == skill.id)
                .count();
            if links == 0 && !linked_only {
                rows.push(skill.clone());
            }
            rows.extend(std::iter::repeat(skill.clone()).take(links));
        }
        Ok(collapse_joined_rows(rows))
    }

    async fn save(&self, form: &SkillForm) -> Result<Skill, AppError> {
        let mut tables = self.tables.write().await;
        let skill = Skill {
            id: next(&mut tables.skill_seq),
            name: form.name.clone(),
        };
        tables.skills.insert(skill.id, skill.clone());
        Ok(skill)
    }
}

#[async_trait]
impl JobRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Job>, AppError> {
        let tables = self.tables.read().await;
        tables.jobs.get(&id).map(|row| tables.hydrate(row)).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Job>, AppError> {
        self.tables.read().await.hydrate_where(|_| true)
    }

    async fn find_by_employer(&self, employer_id: i32) -> Result<Vec<Job>, AppError> {
        self.tables
            .read()
            .await
            .hydrate_where(|row| row.employer_id == employer_id)
    }

    async fn find_by_skill(&self, skill_id: i32) -> Result<Vec<Job>, AppError> {
        let tables = self.tables.read().await;
        tables.hydrate_where(|row| tables.job_skills.contains(&(row.id, skill_id)))
    }

    async fn save(&self, job: NewJob) -> Result<Job, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.employers.contains_key(&job.employer.id) {
            return Err(anyhow!("foreign key violation: employer {}", job.employer.id).into());
        }
        let skills = distinct_skills(job.skills);
        if let Some(missing) = skills.iter().find(|s| !tables.skills.contains_key(&s.id)) {
            return Err(anyhow!("foreign key violation: skill {}", missing.id).into());
        }

        let id = next(&mut tables.job_seq);
        tables.jobs.insert(
            id,
            JobRow {
                id,
                name: job.name.clone(),
                employer_id: job.employer.id,
            },
        );
        for skill in &skills {
            tables.job_skills.insert((id, skill.id));
        }

        Ok(Job {
            id,
            name: job.name,
            employer: job.employer,
            skills,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(store: &InMemoryStore) -> (Employer, Skill, Skill) {
        let employer = EmployerRepository::save(
            store,
            &EmployerForm {
                location: "Remote - US".to_string(),
            },
        )
        .await
        .unwrap();
        let go = SkillRepository::save(store, &SkillForm { name: "Go".to_string() })
            .await
            .unwrap();
        let sql = SkillRepository::save(store, &SkillForm { name: "SQL".to_string() })
            .await
            .unwrap();
        (employer, go, sql)
    }

    #[tokio::test]
    async fn test_saved_job_resolves_on_reload() {
        let store = InMemoryStore::new();
        let (employer, go, sql) = seed(&store).await;

        let saved = JobRepository::save(
            &store,
            NewJob {
                name: "Backend Engineer".to_string(),
                employer: employer.clone(),
                skills: vec![go.clone(), sql.clone()],
            },
        )
        .await
        .unwrap();

        let job = JobRepository::find_by_id(&store, saved.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.employer.location, "Remote - US");
        let mut names: Vec<_> = job.skills.iter().map(|s| s.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Go", "SQL"]);

        let go_jobs = store.find_by_skill(go.id).await.unwrap();
        assert_eq!(go_jobs.len(), 1);
        assert_eq!(go_jobs[0].name, "Backend Engineer");
    }

    #[tokio::test]
    async fn test_repeated_skill_writes_one_link() {
        let store = InMemoryStore::new();
        let (employer, go, _) = seed(&store).await;

        let job = JobRepository::save(
            &store,
            NewJob {
                name: "SRE".to_string(),
                employer,
                skills: vec![go.clone(), go.clone()],
            },
        )
        .await
        .unwrap();
        assert_eq!(job.skills, vec![go]);
    }

    #[tokio::test]
    async fn test_save_rejects_unknown_employer() {
        let store = InMemoryStore::new();
        let result = JobRepository::save(
            &store,
            NewJob {
                name: "Ghost".to_string(),
                employer: Employer {
                    id: 99,
                    location: "Nowhere".to_string(),
                },
                skills: vec![],
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(JobRepository::find_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_by_id_skips_unknown() {
        let store = InMemoryStore::new();
        let (_, go, sql) = seed(&store).await;
        let found = store.find_all_by_id(&[sql.id, 42, go.id]).await.unwrap();
        assert_eq!(found, vec![go, sql]);
    }

    #[tokio::test]
    async fn test_find_joined_linked_only() {
        let store = InMemoryStore::new();
        let (employer, go, _sql) = seed(&store).await;
        let rust = SkillRepository::save(&store, &SkillForm { name: "rust".to_string() })
            .await
            .unwrap();
        for name in ["A", "B"] {
            JobRepository::save(
                &store,
                NewJob {
                    name: name.to_string(),
                    employer: employer.clone(),
                    skills: vec![rust.clone(), go.clone()],
                },
            )
            .await
            .unwrap();
        }

        let linked: Vec<_> = store
            .find_joined(true)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(linked, vec!["Go", "rust"]);

        let all: Vec<_> = store
            .find_joined(false)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(all, vec!["Go", "rust", "SQL"]);
    }
}
