use std::sync::Arc;

use crate::repository::postgres::PgStore;
use crate::repository::{EmployerRepository, JobRepository, SkillRepository};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub employers: Arc<dyn EmployerRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub skills: Arc<dyn SkillRepository>,
}

impl AppState {
    /// All three repositories backed by the same PostgreSQL pool.
    pub fn from_pg(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self {
            employers: store.clone(),
            jobs: store.clone(),
            skills: store,
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> (Self, crate::repository::memory::InMemoryStore) {
        let store = crate::repository::memory::InMemoryStore::new();
        let shared = Arc::new(store.clone());
        (
            Self {
                employers: shared.clone(),
                jobs: shared.clone(),
                skills: shared,
            },
            store,
        )
    }
}
