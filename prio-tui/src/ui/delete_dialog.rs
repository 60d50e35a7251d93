use super::utils::{centered_rect, truncate};
use super::*;
use crate::app::EditorMode;

pub fn render_delete_confirm_dialog(frame: &mut Frame, app: &App) {
    let Some(EditorMode::Edit(project)) = app.editor.as_ref().map(|e| &e.mode) else {
        return;
    };

    let area = centered_rect(52, 9, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            truncate(&project.title, 46),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::styled("[n] No", Style::default().fg(Color::White)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Delete Project? ")
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{buffer_text, draw};
    use crate::app::test_support::test_app;
    use crate::types::NewProject;

    #[tokio::test]
    async fn confirmation_names_the_project() {
        let mut app = test_app();
        app.repository.list().await;
        let project = app
            .repository
            .create(NewProject::new("Old intranet"))
            .await
            .unwrap();
        app.sync(std::time::Instant::now());
        app.select_project(&project.id);
        app.request_delete();

        let text = buffer_text(&draw(&mut app, 120, 40));
        assert!(text.contains("Delete Project?"));
        assert!(text.contains("Old intranet"));
        assert!(text.contains("[y] Yes    [n] No"));
    }
}
