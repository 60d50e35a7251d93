use crate::app::{App, EditorField};
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_editor_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    handle_editor_key_on(key, app, action_tx, Local::now().date_naive());
}

fn handle_editor_key_on(key: KeyEvent, app: &mut App, action_tx: &ActionTx, today: NaiveDate) {
    let Some(editor) = app.editor.as_mut() else {
        return;
    };
    // The dialog is read-only while a request is in flight.
    if editor.is_pending() {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => submit(app, action_tx),
        KeyCode::Char('d') if ctrl => app.request_delete(),
        KeyCode::Esc => app.close_editor(),
        KeyCode::Tab | KeyCode::Down => editor.focus_next(),
        KeyCode::BackTab | KeyCode::Up => editor.focus_prev(),
        KeyCode::Enter => match editor.focused {
            EditorField::Title => submit(app, action_tx),
            EditorField::Narrative(_) => editor.newline(),
            _ => editor.focus_next(),
        },
        KeyCode::Left => editor.left(today),
        KeyCode::Right => editor.right(today),
        KeyCode::Home => editor.home(),
        KeyCode::End => editor.end(),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Char(c) if !ctrl => match editor.focused {
            EditorField::Effort | EditorField::Benefit => match c {
                'h' | '-' => editor.adjust(-1),
                'l' | '+' => editor.adjust(1),
                _ => {}
            },
            EditorField::AssignedDate => match c {
                '[' => editor.shift_date(-7, today),
                ']' => editor.shift_date(7, today),
                'h' | '-' => editor.shift_date(-1, today),
                'l' | '+' => editor.shift_date(1, today),
                't' => editor.set_date(Some(today)),
                _ => {}
            },
            _ => editor.input_char(c),
        },
        _ => {}
    }
}

fn submit(app: &mut App, action_tx: &ActionTx) {
    if let Some(request) = app.begin_submit() {
        enqueue_action(action_tx, Action::SaveProject(request));
    }
}
