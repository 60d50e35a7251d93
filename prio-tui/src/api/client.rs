use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use pgrest::{Credentials, Direction, Query, RestClient, RestError, ServiceUrl};
use tokio::sync::Mutex;

use crate::api::dto::{patch_body, InsertProjectRow, ProjectRow};
use crate::config::PrioConfig;
use crate::repository::{ProjectStore, StoreError};
use crate::session_store;
use crate::types::{NewProject, Project, ProjectId, ProjectPatch, UserId};

pub const PROJECTS_TABLE: &str = "projects";

const UNAUTH_RELOGIN: &str = "Session expired. Run `prio login` to re-authenticate.";

/// [`ProjectStore`] backed by the hosted data API.
#[derive(Debug)]
pub struct ApiClient {
    rest: RestClient,
    api_key: String,
    credentials: Mutex<Credentials>,
    /// Write refreshed credentials back to the session file.
    persist_session: bool,
}

impl ApiClient {
    pub fn new(config: &PrioConfig, credentials: Credentials) -> Result<Self> {
        let rest = RestClient::new(ServiceUrl::new(&config.api_url), config.api_key.clone())
            .context("Failed to build HTTP client")?;

        Ok(Self {
            rest,
            api_key: config.api_key.clone(),
            credentials: Mutex::new(credentials),
            persist_session: true,
        })
    }

    #[cfg(test)]
    fn without_persistence(mut self) -> Self {
        self.persist_session = false;
        self
    }

    pub async fn user_id(&self) -> UserId {
        UserId::new(self.credentials.lock().await.user_id.clone())
    }

    /// A REST client carrying a valid access token, refreshing it first if it has expired.
    async fn authorized(&self) -> Result<RestClient, StoreError> {
        let mut credentials = self.credentials.lock().await;

        if credentials.is_expired(Utc::now()) {
            tracing::info!("access token expired, refreshing");
            let refreshed = credentials
                .refresh(self.rest.url(), &self.api_key)
                .await
                .map_err(|e| {
                    tracing::warn!("Token refresh failed: {}", e);
                    StoreError::Unauthorized(UNAUTH_RELOGIN.to_string())
                })?;

            if self.persist_session {
                if let Err(e) = session_store::save_session(&refreshed) {
                    tracing::warn!("Failed to persist refreshed session: {:#}", e);
                }
            }
            *credentials = refreshed;
        }

        Ok(self
            .rest
            .clone()
            .with_access_token(credentials.access_token.clone()))
    }
}

fn list_query(owner: &UserId) -> Query {
    Query::new()
        .select("*")
        .eq("user_id", owner)
        .order("created_at", Direction::Descending)
}

fn row_query(owner: &UserId, id: &ProjectId) -> Query {
    Query::new().eq("id", id).eq("user_id", owner)
}

fn store_error(err: RestError) -> StoreError {
    if err.is_not_found() {
        return StoreError::NotFound;
    }
    match err {
        RestError::Unauthorized(message) => {
            tracing::debug!("data API rejected the session: {}", message);
            StoreError::Unauthorized(UNAUTH_RELOGIN.to_string())
        }
        RestError::Api { message, .. } => StoreError::Rejected(message),
        RestError::Transport(message) => StoreError::Transport(message),
        RestError::Decode(message) => StoreError::Decode(message),
    }
}

#[async_trait]
impl ProjectStore for ApiClient {
    async fn list(&self, owner: &UserId) -> Result<Vec<Project>, StoreError> {
        let rows: Vec<ProjectRow> = self
            .authorized()
            .await?
            .select(PROJECTS_TABLE, &list_query(owner))
            .await
            .map_err(store_error)?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn insert(
        &self,
        owner: &UserId,
        project: &NewProject,
        color_index: u32,
    ) -> Result<Project, StoreError> {
        let row: ProjectRow = self
            .authorized()
            .await?
            .insert_one(
                PROJECTS_TABLE,
                &InsertProjectRow::new(owner, project, color_index),
            )
            .await
            .map_err(store_error)?;

        Project::try_from(row)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &ProjectId,
        patch: &ProjectPatch,
    ) -> Result<Project, StoreError> {
        let row: ProjectRow = self
            .authorized()
            .await?
            .update_one(PROJECTS_TABLE, &row_query(owner, id), &patch_body(patch))
            .await
            .map_err(store_error)?;

        Project::try_from(row)
    }

    async fn delete(&self, owner: &UserId, id: &ProjectId) -> Result<(), StoreError> {
        self.authorized()
            .await?
            .delete(PROJECTS_TABLE, &row_query(owner, id))
            .await
            .map_err(store_error)
    }
}
