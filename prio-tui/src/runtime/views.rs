use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::action_queue::{Action, ActionTx};

mod confirm_delete;
mod editor;
mod matrix;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.current_view {
        View::Matrix => matrix::handle_matrix_key(key, app, action_tx),
        View::Editor => editor::handle_editor_key(key, app, action_tx),
        View::ConfirmDelete => confirm_delete::handle_confirm_delete_key(key, app, action_tx),
    }
}

pub(super) fn handle_mouse(mouse: MouseEvent, app: &mut App) {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        app.click(mouse.column, mouse.row);
    }
}
