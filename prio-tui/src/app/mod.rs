use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::matrix::{self, build_markers, Marker};
use crate::notify::{NotificationRx, Toasts};
use crate::repository::ProjectRepository;
use crate::types::{Project, ProjectId};

mod editor;
mod state;
pub use editor::{Editor, EditorField, EditorMode, Pending, SubmitRequest};
pub use state::{TextInput, View};

pub struct App {
    pub running: bool,
    pub current_view: View,
    pub repository: ProjectRepository,

    // Matrix
    pub markers: Vec<Marker>,
    pub focused_marker: Option<usize>,
    /// Inner canvas area from the last draw, for mouse hit-testing.
    pub matrix_area: Option<Rect>,

    pub editor: Option<Editor>,
    pub toasts: Toasts,
    notifications: NotificationRx,
    revisions: watch::Receiver<u64>,

    pub throbber_state: throbber_widgets_tui::ThrobberState,
    /// Shown in the header, e.g. the signed-in email.
    pub user_label: String,
    pub refresh_interval: Duration,
    pub last_refresh: Instant,
}

impl App {
    pub fn new(
        repository: ProjectRepository,
        notifications: NotificationRx,
        user_label: String,
        refresh_interval: Duration,
    ) -> Self {
        let revisions = repository.subscribe();
        let markers = build_markers(repository.projects());
        Self {
            running: true,
            current_view: View::Matrix,
            repository,
            markers,
            focused_marker: None,
            matrix_area: None,
            editor: None,
            toasts: Toasts::default(),
            notifications,
            revisions,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
            user_label,
            refresh_interval,
            last_refresh: Instant::now(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn projects(&self) -> &[Project] {
        self.repository.projects()
    }

    pub fn is_loading(&self) -> bool {
        self.repository.is_loading()
    }

    /// Pull in notifications and snapshot changes. Called once per frame.
    pub fn sync(&mut self, now: Instant) {
        while let Ok(notification) = self.notifications.try_recv() {
            self.toasts.push(notification, now);
        }
        self.toasts.prune(now);

        if self.revisions.has_changed().unwrap_or(false) {
            self.revisions.borrow_and_update();
            self.rebuild_markers();
        }
    }

    fn rebuild_markers(&mut self) {
        let focused_id = self.focused_project_id();
        self.markers = build_markers(self.repository.projects());
        // Follow the focused project to its new position, if it still exists.
        self.focused_marker = focused_id
            .and_then(|id| self.markers.iter().position(|m| m.project_id == id))
            .or_else(|| {
                self.focused_marker
                    .filter(|_| !self.markers.is_empty())
                    .map(|i| i.min(self.markers.len() - 1))
            });
    }

    fn focused_project_id(&self) -> Option<ProjectId> {
        self.focused_marker
            .and_then(|i| self.markers.get(i))
            .map(|m| m.project_id.clone())
    }

    pub fn focused(&self) -> Option<&Marker> {
        self.focused_marker.and_then(|i| self.markers.get(i))
    }

    pub fn focus_next(&mut self) {
        if self.markers.is_empty() {
            return;
        }
        self.focused_marker = Some(match self.focused_marker {
            Some(i) => (i + 1) % self.markers.len(),
            None => 0,
        });
    }

    pub fn focus_prev(&mut self) {
        if self.markers.is_empty() {
            return;
        }
        let len = self.markers.len();
        self.focused_marker = Some(match self.focused_marker {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        });
    }

    pub fn is_dialog_open(&self) -> bool {
        self.editor.is_some()
    }

    pub fn open_create_editor(&mut self) {
        self.editor = Some(Editor::create());
        self.current_view = View::Editor;
    }

    /// Open the editor for `id`. Returns `false` if the project is gone.
    pub fn select_project(&mut self, id: &ProjectId) -> bool {
        let Some(project) = self.repository.find(id).cloned() else {
            return false;
        };
        self.focused_marker = self.markers.iter().position(|m| &m.project_id == id);
        tracing::debug!("opening project {}", id);
        self.editor = Some(Editor::edit(project));
        self.current_view = View::Editor;
        true
    }

    pub fn open_focused(&mut self) -> bool {
        match self.focused_project_id() {
            Some(id) => self.select_project(&id),
            None => false,
        }
    }

    /// Left click at a terminal cell. Opens the marker under it, if any.
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        if self.current_view != View::Matrix {
            return false;
        }
        let Some(area) = self.matrix_area else {
            return false;
        };
        let Some(point) = matrix::cell_to_grid(area, column, row) else {
            return false;
        };

        let hit = matrix::hit_test(&self.markers, point, matrix::cell_tolerance(area))
            .map(|m| m.project_id.clone());
        match hit {
            Some(id) => self.select_project(&id),
            None => false,
        }
    }

    /// Close the editor unless a request is in flight.
    pub fn close_editor(&mut self) {
        if self.editor.as_ref().is_some_and(Editor::is_pending) {
            return;
        }
        self.editor = None;
        self.current_view = View::Matrix;
    }

    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        self.editor.as_mut()?.begin_submit()
    }

    pub fn finish_submit(&mut self, succeeded: bool) {
        self.finish_pending(succeeded);
    }

    pub fn request_delete(&mut self) {
        if self
            .editor
            .as_ref()
            .is_some_and(|e| e.is_edit() && !e.is_pending())
        {
            self.current_view = View::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) -> Option<ProjectId> {
        self.current_view = View::Editor;
        self.editor.as_mut()?.begin_delete()
    }

    pub fn cancel_delete(&mut self) {
        self.current_view = View::Editor;
    }

    pub fn finish_delete(&mut self, succeeded: bool) {
        if succeeded {
            self.focused_marker = None;
        }
        self.finish_pending(succeeded);
    }

    fn finish_pending(&mut self, succeeded: bool) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        editor.clear_pending();
        if succeeded {
            self.close_editor();
        }
    }

    pub fn refresh_due(&self, now: Instant) -> bool {
        !self.is_dialog_open() && now.duration_since(self.last_refresh) >= self.refresh_interval
    }

    pub fn mark_refreshed(&mut self, now: Instant) {
        self.last_refresh = now;
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::test_app;
    use super::*;
    use crate::layout::GRID_SIZE;
    use crate::types::{NewProject, Score};

    async fn app_with(projects: &[(&str, u8, u8)]) -> App {
        let mut app = test_app();
        for (title, effort, benefit) in projects {
            app.repository
                .create(NewProject::new(*title).with_scores(
                    Score::new(*effort).unwrap(),
                    Score::new(*benefit).unwrap(),
                ))
                .await
                .unwrap();
        }
        app.sync(Instant::now());
        app
    }

    #[tokio::test]
    async fn snapshot_changes_rebuild_markers_and_toasts() {
        let app = app_with(&[("Alpha", 3, 7)]).await;

        assert_eq!(app.markers.len(), 1);
        assert_eq!(app.markers[0].label, "3/7");
        let toasts: Vec<_> = app
            .toasts
            .iter()
            .map(|t| t.notification.title.as_str())
            .collect();
        assert_eq!(toasts, vec!["Project created"]);
    }

    #[tokio::test]
    async fn focus_cycles_and_opens_editor() {
        let mut app = app_with(&[("a", 1, 1), ("b", 2, 2)]).await;

        app.focus_prev();
        assert_eq!(app.focused_marker, Some(1));
        app.focus_next();
        assert_eq!(app.focused_marker, Some(0));

        assert!(app.open_focused());
        assert_eq!(app.current_view, View::Editor);
        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.title.value, "b");
    }

    #[tokio::test]
    async fn click_on_marker_opens_it_and_empty_grid_does_not() {
        let mut app = app_with(&[("Alpha", 5, 5)]).await;
        let area = Rect::new(0, 0, 60, 30);
        app.matrix_area = Some(area);

        assert!(!app.click(0, 0));
        assert!(app.editor.is_none());

        let center = app.markers[0].center;
        let column = (center.x / GRID_SIZE * f64::from(area.width)) as u16;
        let row = (center.y / GRID_SIZE * f64::from(area.height)) as u16;
        assert!(app.click(column, row));
        assert_eq!(app.editor.as_ref().unwrap().title.value, "Alpha");
    }

    #[tokio::test]
    async fn failed_submit_keeps_dialog_open() {
        let mut app = app_with(&[]).await;
        app.open_create_editor();
        app.editor.as_mut().unwrap().input_char('x');

        assert!(app.begin_submit().is_some());
        app.close_editor();
        assert_eq!(app.current_view, View::Editor);

        app.finish_submit(false);
        assert_eq!(app.current_view, View::Editor);
        assert!(!app.editor.as_ref().unwrap().is_pending());
        assert_eq!(app.editor.as_ref().unwrap().title.value, "x");

        app.begin_submit();
        app.finish_submit(true);
        assert_eq!(app.current_view, View::Matrix);
        assert!(app.editor.is_none());

        app.open_create_editor();
        assert_eq!(app.editor.as_ref().unwrap().title.value, "");
    }

    #[tokio::test]
    async fn delete_confirmation_flow() {
        let mut app = app_with(&[("Alpha", 5, 5)]).await;
        app.focus_next();
        app.open_focused();

        app.request_delete();
        assert_eq!(app.current_view, View::ConfirmDelete);
        app.cancel_delete();
        assert_eq!(app.current_view, View::Editor);

        app.request_delete();
        let id = app.confirm_delete().unwrap();
        assert_eq!(id, app.markers[0].project_id);
        assert_eq!(app.editor.as_ref().unwrap().pending, Some(Pending::Deleting));

        app.finish_delete(true);
        assert_eq!(app.current_view, View::Matrix);
    }

    #[tokio::test]
    async fn removed_focus_is_clamped() {
        let mut app = app_with(&[("a", 1, 1), ("b", 2, 2)]).await;
        app.focused_marker = Some(1);
        let last = app.markers[1].project_id.clone();

        assert!(app.repository.delete(&last).await);
        app.sync(Instant::now());
        assert_eq!(app.markers.len(), 1);
        assert_eq!(app.focused_marker, Some(0));
    }

    #[test]
    fn refresh_waits_for_interval_and_closed_dialogs() {
        let mut app = test_app();
        let start = app.last_refresh;
        assert!(!app.refresh_due(start + Duration::from_secs(59)));
        assert!(app.refresh_due(start + Duration::from_secs(60)));

        app.open_create_editor();
        assert!(!app.refresh_due(start + Duration::from_secs(120)));
    }
}
