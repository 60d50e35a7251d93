//! Owner-scoped project repository.
//!
//! [`ProjectRepository`] holds the only in-memory snapshot of the signed-in user's projects and
//! keeps it in step with a [`ProjectStore`]. Store failures never escape: they are logged,
//! reported on the notification channel, and turned into `None`/`false`.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use crate::notify::{Notification, NotificationTx};
use crate::palette::PALETTE_SIZE;
use crate::types::{NewProject, Project, ProjectId, ProjectPatch, UserId};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("Project not found")]
    NotFound,
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
}

/// Outbound port to the external project table.
///
/// Every operation is filtered by `owner`.
#[async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    /// All projects of `owner`, newest first.
    async fn list(&self, owner: &UserId) -> Result<Vec<Project>, StoreError>;

    async fn insert(
        &self,
        owner: &UserId,
        project: &NewProject,
        color_index: u32,
    ) -> Result<Project, StoreError>;

    async fn update(
        &self,
        owner: &UserId,
        id: &ProjectId,
        patch: &ProjectPatch,
    ) -> Result<Project, StoreError>;

    async fn delete(&self, owner: &UserId, id: &ProjectId) -> Result<(), StoreError>;
}

pub struct ProjectRepository {
    store: Arc<dyn ProjectStore>,
    user: Option<UserId>,
    projects: Vec<Project>,
    loading: bool,
    notifications: NotificationTx,
    revision: watch::Sender<u64>,
}

impl ProjectRepository {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        user: Option<UserId>,
        notifications: NotificationTx,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            store,
            // Nothing has been fetched yet, so a signed-in user starts out loading.
            loading: user.is_some(),
            user,
            projects: Vec::new(),
            notifications,
            revision,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn find(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// Switch the signed-in user. The snapshot belongs to the previous user and is dropped.
    pub fn set_user(&mut self, user: Option<UserId>) {
        self.loading = user.is_some();
        self.user = user;
        self.projects.clear();
        self.bump();
    }

    /// Receiver whose value changes every time the snapshot does.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Replace the snapshot with the store's current list. Returns `false` on failure,
    /// leaving the previous snapshot in place.
    pub async fn list(&mut self) -> bool {
        let Some(user) = self.user.clone() else {
            return false;
        };

        self.loading = true;
        let result = self.store.list(&user).await;
        self.loading = false;

        match result {
            Ok(projects) => {
                tracing::debug!("loaded {} projects", projects.len());
                self.projects = projects;
                self.bump();
                true
            }
            Err(e) => {
                tracing::warn!("Failed to load projects: {}", e);
                self.notify(Notification::error("Error loading projects", e.to_string()));
                // The flag flipped even though the data did not.
                self.bump();
                false
            }
        }
    }

    pub async fn create(&mut self, project: NewProject) -> Option<Project> {
        let user = self.user.clone()?;

        let title = project.title.trim();
        if title.is_empty() {
            tracing::debug!("refusing to create a project without a title");
            return None;
        }
        let project = NewProject {
            title: title.to_string(),
            ..project
        };
        let color_index = rand::rng().random_range(0..PALETTE_SIZE);

        match self.store.insert(&user, &project, color_index).await {
            Ok(created) => {
                tracing::info!("created project {}", created.id);
                self.projects.insert(0, created.clone());
                self.bump();
                self.notify(Notification::info(
                    "Project created",
                    "Your new project has been created successfully.",
                ));
                Some(created)
            }
            Err(e) => {
                tracing::warn!("Failed to create project: {}", e);
                self.notify(Notification::error("Error creating project", e.to_string()));
                None
            }
        }
    }

    pub async fn update(&mut self, id: &ProjectId, patch: ProjectPatch) -> Option<Project> {
        let user = self.user.clone()?;

        let mut patch = patch;
        if let Some(title) = patch.title.take() {
            let title = title.trim();
            if title.is_empty() {
                tracing::debug!("refusing to blank the title of project {}", id);
                return None;
            }
            patch.title = Some(title.to_string());
        }

        if patch.is_empty() {
            if let Some(current) = self.find(id) {
                return Some(current.clone());
            }
        }

        match self.store.update(&user, id, &patch).await {
            Ok(updated) => {
                tracing::info!("updated project {}", updated.id);
                if let Some(slot) = self.projects.iter_mut().find(|p| p.id == updated.id) {
                    *slot = updated.clone();
                }
                self.bump();
                Some(updated)
            }
            Err(e) => {
                tracing::warn!("Failed to update project {}: {}", id, e);
                self.notify(Notification::error("Error updating project", e.to_string()));
                None
            }
        }
    }

    pub async fn delete(&mut self, id: &ProjectId) -> bool {
        let Some(user) = self.user.clone() else {
            return false;
        };

        match self.store.delete(&user, id).await {
            Ok(()) => {
                tracing::info!("deleted project {}", id);
                self.projects.retain(|p| &p.id != id);
                self.bump();
                self.notify(Notification::info(
                    "Project deleted",
                    "The project has been deleted successfully.",
                ));
                true
            }
            Err(e) => {
                tracing::warn!("Failed to delete project {}: {}", id, e);
                self.notify(Notification::error("Error deleting project", e.to_string()));
                false
            }
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    fn notify(&self, notification: Notification) {
        // A closed receiver means the UI is gone; nothing left to tell.
        let _ = self.notifications.send(notification);
    }
}
