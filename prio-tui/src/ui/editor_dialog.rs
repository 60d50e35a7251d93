use super::utils::centered_rect;
use super::*;
use crate::app::{Editor, EditorField, TextInput};
use crate::types::{NarrativeField, Score, SCORE_MAX};
use chrono::NaiveDate;

const DIALOG_WIDTH: u16 = 76;
const DIALOG_HEIGHT: u16 = 32;

fn field_block(label: &str, focused: bool) -> Block<'_> {
    let color = if focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(format!(" {} ", label), Style::default().fg(color)))
        .padding(Padding::horizontal(1))
}

fn label_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

/// The input's text with a block cursor, or the placeholder when empty and unfocused.
fn input_lines<'a>(input: &'a TextInput, focused: bool, placeholder: &'a str) -> Vec<Line<'a>> {
    if !focused {
        if input.value.is_empty() {
            return vec![Line::from(Span::styled(
                placeholder,
                Style::default().fg(Color::DarkGray),
            ))];
        }
        return input.value.split('\n').map(Line::from).collect();
    }

    let (before, after) = input.split_at_cursor();
    format!("{}█{}", before, after)
        .split('\n')
        .map(|line| Line::from(line.to_string()))
        .collect()
}

/// Row of the cursor inside a multi-line input.
fn cursor_row(input: &TextInput) -> u16 {
    let (before, _) = input.split_at_cursor();
    before.matches('\n').count() as u16
}

fn score_bar(score: Score, focused: bool) -> Vec<Span<'static>> {
    let filled = score.value() as usize;
    let color = if focused { Color::Yellow } else { Color::Cyan };
    vec![
        Span::styled("■".repeat(filled), Style::default().fg(color)),
        Span::styled(
            "·".repeat(SCORE_MAX as usize - filled),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(" {:>2}/{}", score.value(), SCORE_MAX),
            Style::default().fg(Color::White),
        ),
    ]
}

fn date_label(date: Option<NaiveDate>) -> Span<'static> {
    match date {
        Some(date) => Span::styled(
            date.format("%B %-d, %Y").to_string(),
            Style::default().fg(Color::White),
        ),
        None => Span::styled("Pick a date", Style::default().fg(Color::DarkGray)),
    }
}

pub fn render_editor_dialog(frame: &mut Frame, app: &App) {
    let Some(editor) = &app.editor else {
        return;
    };

    let area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", editor.heading()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![
        Constraint::Length(3), // Title
        Constraint::Length(1), // Effort
        Constraint::Length(1), // Benefit
        Constraint::Length(1), // Assigned date
    ];
    constraints.extend(NarrativeField::ALL.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1)); // Validation error
    constraints.push(Constraint::Length(1)); // Controls

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    render_title(frame, editor, rows[0]);
    render_score(frame, "Effort", editor.effort, editor.focused == EditorField::Effort, rows[1]);
    render_score(frame, "Benefit", editor.benefit, editor.focused == EditorField::Benefit, rows[2]);
    render_date(frame, editor, rows[3]);

    for (i, field) in NarrativeField::ALL.into_iter().enumerate() {
        render_narrative(frame, editor, field, rows[4 + i]);
    }

    let error_row = rows[rows.len() - 2];
    if let Some(error) = &editor.validation_error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            error_row,
        );
    }

    render_controls(frame, editor, rows[rows.len() - 1]);
}

fn render_title(frame: &mut Frame, editor: &Editor, area: Rect) {
    let focused = editor.focused == EditorField::Title;
    let paragraph = Paragraph::new(input_lines(
        &editor.title,
        focused,
        "Enter project title",
    ))
    .style(Style::default().fg(Color::White))
    .block(field_block("Title *", focused));
    frame.render_widget(paragraph, area);
}

fn render_score(frame: &mut Frame, label: &str, score: Score, focused: bool, area: Rect) {
    let mut spans = vec![Span::styled(format!("{:<15}", label), label_style(focused))];
    spans.extend(score_bar(score, focused));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_date(frame: &mut Frame, editor: &Editor, area: Rect) {
    let focused = editor.focused == EditorField::AssignedDate;
    let line = Line::from(vec![
        Span::styled(format!("{:<15}", "Assigned date"), label_style(focused)),
        date_label(editor.assigned_date),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_narrative(frame: &mut Frame, editor: &Editor, field: NarrativeField, area: Rect) {
    let focused = editor.focused == EditorField::Narrative(field);
    let input = &editor.narrative[field.index()];
    let scroll = if focused { cursor_row(input) } else { 0 };

    let paragraph = Paragraph::new(input_lines(input, focused, field.placeholder()))
        .style(Style::default().fg(Color::White))
        .scroll((scroll, 0))
        .block(field_block(field.label(), focused));
    frame.render_widget(paragraph, area);
}

fn render_controls(frame: &mut Frame, editor: &Editor, area: Rect) {
    let submit_style = if editor.is_pending() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green)
    };

    let mut spans = vec![
        Span::styled("[Ctrl+S] ", Style::default().fg(Color::Yellow)),
        Span::styled(editor.submit_label(), submit_style),
    ];
    if editor.is_edit() {
        spans.push(Span::raw("    "));
        spans.push(Span::styled("[Ctrl+D] ", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled("Delete", Style::default().fg(Color::Red)));
    }
    spans.push(Span::raw("    "));
    spans.push(Span::styled("[Esc] ", Style::default().fg(Color::Yellow)));
    spans.push(Span::styled("Cancel", Style::default().fg(Color::White)));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
