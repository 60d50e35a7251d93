use super::utils::truncate;
use super::*;

/// Legend beside the matrix: one row per project in matrix order.
pub fn render_project_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Legend ", Style::default().fg(Color::White)))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Dot, space, title, space, "10/10".
    let title_width = (inner.width as usize).saturating_sub(8);
    let visible = inner.height as usize;
    let skip = app
        .focused_marker
        .map(|i| (i + 1).saturating_sub(visible))
        .unwrap_or(0);

    let lines: Vec<Line> = app
        .markers
        .iter()
        .skip(skip)
        .take(visible)
        .map(|marker| {
            let focused = app.focused_marker == Some(marker.index);
            let title_style = if focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled("● ", Style::default().fg(marker.color)),
                Span::styled(
                    format!(
                        "{:<width$}",
                        truncate(&marker.title, title_width),
                        width = title_width
                    ),
                    title_style,
                ),
                Span::styled(
                    format!(" {:>5}", marker.label),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{buffer_text, draw};
    use crate::app::test_support::test_app;
    use crate::types::{NewProject, Score};
    use std::time::Instant;

    #[tokio::test]
    async fn legend_lists_projects_on_wide_terminals_only() {
        let mut app = test_app();
        app.repository.list().await;
        app.repository
            .create(
                NewProject::new("Warehouse move")
                    .with_scores(Score::new(9).unwrap(), Score::new(2).unwrap()),
            )
            .await
            .unwrap();
        app.sync(Instant::now());
        // The "Project created" toast would cover the top-right corner.
        app.toasts.dismiss_all();

        let wide = buffer_text(&draw(&mut app, 120, 40));
        assert!(wide.contains(" Legend "));
        assert!(wide.contains("Warehouse move"));
        assert!(wide.contains("9/2"));

        let narrow = buffer_text(&draw(&mut app, 80, 40));
        assert!(!narrow.contains(" Legend "));
    }
}
