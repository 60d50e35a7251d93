use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::repository::{ProjectStore, StoreError};
use crate::types::{
    Narrative, NarrativeField, NewProject, Project, ProjectId, ProjectPatch, Score, UserId,
};

/// Owner of the seeded projects in `prio dev`.
pub const DEV_USER_ID: &str = "dev-user";

/// In-memory project table. Newest rows first.
#[derive(Debug, Clone, Default)]
pub struct DevBackend {
    rows: Arc<Mutex<Vec<Project>>>,
    next_id: Arc<AtomicU64>,
}

impl DevBackend {
    /// A table seeded with sample projects for [`DEV_USER_ID`].
    pub fn new() -> Self {
        let backend = Self::empty();
        let seeded = seed_dev_projects(&backend);
        *backend.rows() = seeded;
        backend
    }

    pub fn empty() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<Project>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(&self) -> ProjectId {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        ProjectId::new(format!("dev-{:04}", n))
    }
}

#[async_trait]
impl ProjectStore for DevBackend {
    async fn list(&self, owner: &UserId) -> Result<Vec<Project>, StoreError> {
        let mut projects: Vec<Project> = self
            .rows()
            .iter()
            .filter(|p| &p.user_id == owner)
            .cloned()
            .collect();
        // Stable: rows created in the same instant keep newest-first insertion order.
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn insert(
        &self,
        owner: &UserId,
        project: &NewProject,
        color_index: u32,
    ) -> Result<Project, StoreError> {
        let now = Utc::now();
        let row = Project {
            id: self.next_id(),
            user_id: owner.clone(),
            title: project.title.clone(),
            effort: project.effort,
            benefit: project.benefit,
            narrative: project.narrative.clone(),
            assigned_date: project.assigned_date,
            color_index,
            created_at: now,
            updated_at: now,
        };
        self.rows().insert(0, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &ProjectId,
        patch: &ProjectPatch,
    ) -> Result<Project, StoreError> {
        let mut rows = self.rows();
        let row = rows
            .iter_mut()
            .find(|p| &p.id == id && &p.user_id == owner)
            .ok_or(StoreError::NotFound)?;

        patch.apply_to(row);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, owner: &UserId, id: &ProjectId) -> Result<(), StoreError> {
        self.rows().retain(|p| !(&p.id == id && &p.user_id == owner));
        Ok(())
    }
}

fn seed_dev_projects(backend: &DevBackend) -> Vec<Project> {
    let owner = UserId::from(DEV_USER_ID);
    let today = Utc::now();

    let project = |days_ago: i64,
                   title: &str,
                   effort: u8,
                   benefit: u8,
                   color_index: u32,
                   narrative: Narrative| {
        let created_at = today - Duration::days(days_ago);
        Project {
            id: backend.next_id(),
            user_id: owner.clone(),
            title: title.to_string(),
            effort: Score::new(effort).unwrap_or(Score::MID),
            benefit: Score::new(benefit).unwrap_or(Score::MID),
            narrative,
            assigned_date: Some((created_at + Duration::days(21)).date_naive()),
            color_index,
            created_at,
            updated_at: created_at,
        }
    };

    let mut projects = vec![
        project(
            30,
            "Customer portal redesign",
            8,
            9,
            0,
            Narrative::default()
                .with(NarrativeField::DiscoveryScope, "Account pages and billing flow")
                .with(NarrativeField::Blockers, "Design system migration"),
        ),
        project(
            21,
            "Invoice export",
            2,
            7,
            1,
            Narrative::default().with(NarrativeField::NextSteps, "Agree on CSV columns"),
        ),
        project(
            14,
            "Search relevance tuning",
            6,
            4,
            3,
            Narrative::default()
                .with(NarrativeField::ResearchFocus, "Synonyms and typo tolerance"),
        ),
        project(
            7,
            "Legacy report cleanup",
            3,
            2,
            4,
            Narrative::default(),
        ),
        project(
            2,
            "Mobile offline sync",
            10,
            6,
            6,
            Narrative::default()
                .with(NarrativeField::ComplexityFactors, "Conflict handling")
                .with(NarrativeField::NeedsDependencies, "API versioning"),
        ),
    ];
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    projects
}
