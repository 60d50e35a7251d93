use crate::app::{App, SubmitRequest};
use crate::types::ProjectId;
use std::time::Instant;

use super::action_queue::Action;

pub(super) async fn run_action(action: Action, app: &mut App) {
    match action {
        Action::Refresh => {
            handle_refresh(app).await;
        }
        Action::SaveProject(request) => {
            handle_save_project(request, app).await;
        }
        Action::DeleteProject(id) => {
            handle_delete_project(&id, app).await;
        }
    }
}

async fn handle_refresh(app: &mut App) {
    app.mark_refreshed(Instant::now());
    if !app.repository.list().await {
        tracing::debug!("refresh failed, keeping previous projects");
    }
}

async fn handle_save_project(request: SubmitRequest, app: &mut App) {
    let saved = match request {
        SubmitRequest::Create(project) => app.repository.create(project).await.is_some(),
        SubmitRequest::Update { id, patch } => app.repository.update(&id, patch).await.is_some(),
    };
    app.finish_submit(saved);
}

async fn handle_delete_project(id: &ProjectId, app: &mut App) {
    let deleted = app.repository.delete(id).await;
    app.finish_delete(deleted);
}
