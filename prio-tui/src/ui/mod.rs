use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

mod delete_dialog;
mod editor_dialog;
mod matrix_view;
mod project_list;
mod toasts;
pub(super) mod utils;

/// Below this width the legend is dropped and the matrix takes the whole body.
const LEGEND_MIN_TOTAL_WIDTH: u16 = 90;
const LEGEND_WIDTH: u16 = 34;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, root[0], app);

    let body = root[1];
    if app.is_loading() && app.projects().is_empty() {
        app.matrix_area = None;
        matrix_view::render_loading(frame, app, body);
    } else if body.width >= LEGEND_MIN_TOTAL_WIDTH {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(LEGEND_WIDTH)])
            .split(body);
        matrix_view::render_matrix(frame, app, cols[0]);
        project_list::render_project_list(frame, app, cols[1]);
    } else {
        matrix_view::render_matrix(frame, app, body);
    }

    render_footer(frame, root[2], app);

    match app.current_view {
        View::Matrix => {}
        View::Editor => editor_dialog::render_editor_dialog(frame, app),
        View::ConfirmDelete => {
            editor_dialog::render_editor_dialog(frame, app);
            delete_dialog::render_delete_confirm_dialog(frame, app);
        }
    }

    toasts::render_toasts(frame, app);
}

fn project_count_label(count: usize) -> String {
    format!(
        "{} project{} total",
        count,
        if count == 1 { "" } else { "s" }
    )
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            " Your Projects",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", project_count_label(app.projects().len())),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("{} ", app.user_label),
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Right),
        rows[0],
    );
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hints: &[(&str, &str)] = match app.current_view {
        View::Matrix => &[
            ("n", "New project"),
            ("Tab", "Focus"),
            ("Enter", "Open"),
            ("Click", "Open"),
            ("r", "Refresh"),
            ("q", "Quit"),
        ],
        View::Editor => &[
            ("Tab", "Next field"),
            ("←/→", "Adjust"),
            ("Ctrl+S", "Save"),
            ("Ctrl+D", "Delete"),
            ("Esc", "Cancel"),
        ],
        View::ConfirmDelete => &[("y", "Delete"), ("n", "Keep")],
    };

    let mut spans = vec![Span::raw(" ")];
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            format!(": {}", label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use crate::app::App;

    pub fn draw(app: &mut App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| super::render(f, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    pub fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }
}
