use super::utils::truncate;
use super::*;
use crate::notify::Severity;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

/// Stack toasts in the top-right corner, newest at the bottom.
pub fn render_toasts(frame: &mut Frame, app: &App) {
    let screen = frame.area();
    if screen.width < TOAST_WIDTH || app.toasts.is_empty() {
        return;
    }

    let text_width = (TOAST_WIDTH - 4) as usize;
    let mut y = screen.y + 1;
    for toast in app.toasts.iter() {
        if y + TOAST_HEIGHT > screen.bottom() {
            break;
        }
        let area = Rect {
            x: screen.right() - TOAST_WIDTH - 1,
            y,
            width: TOAST_WIDTH,
            height: TOAST_HEIGHT,
        };
        y += TOAST_HEIGHT;

        let notification = &toast.notification;
        let color = match notification.severity {
            Severity::Error => Color::Red,
            Severity::Info => Color::Green,
        };

        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                truncate(&notification.title, text_width),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                truncate(&notification.description, text_width),
                Style::default().fg(Color::White),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .padding(Padding::horizontal(1)),
        );

        frame.render_widget(Clear, area);
        frame.render_widget(paragraph, area);
    }
}
