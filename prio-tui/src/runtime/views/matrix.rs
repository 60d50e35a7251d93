use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_matrix_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.open_create_editor(),
        KeyCode::Char('r') | KeyCode::Char('R') => enqueue_action(action_tx, Action::Refresh),
        KeyCode::Enter => {
            app.open_focused();
        }
        KeyCode::Tab | KeyCode::Right | KeyCode::Down | KeyCode::Char('j') => app.focus_next(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Up | KeyCode::Char('k') => app.focus_prev(),
        KeyCode::Esc => {
            app.focused_marker = None;
            app.toasts.dismiss_all();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::test_app;
    use crate::app::View;
    use crossterm::event::KeyModifiers;

    use super::super::super::action_queue::channel;

    fn press(code: KeyCode, app: &mut App) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_matrix_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
        rx.try_recv().ok()
    }

    #[test]
    fn n_opens_an_empty_create_dialog() {
        let mut app = test_app();
        assert_eq!(press(KeyCode::Char('n'), &mut app), None);
        assert_eq!(app.current_view, View::Editor);
        assert!(!app.editor.as_ref().unwrap().is_edit());
    }

    #[test]
    fn r_queues_a_refresh_and_q_quits() {
        let mut app = test_app();
        assert_eq!(press(KeyCode::Char('r'), &mut app), Some(Action::Refresh));
        assert!(app.running);

        press(KeyCode::Char('q'), &mut app);
        assert!(!app.running);
    }

    #[test]
    fn enter_without_focus_does_nothing() {
        let mut app = test_app();
        press(KeyCode::Enter, &mut app);
        assert_eq!(app.current_view, View::Matrix);
    }
}
