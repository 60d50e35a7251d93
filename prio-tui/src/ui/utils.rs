use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A `width` x `height` rectangle centered in `r`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((r.width - width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(popup_layout[1])[1]
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(50, 10, outer), Rect::new(25, 15, 50, 10));

        let small = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_rect(50, 10, small), small);
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Alpha", 10), "Alpha");
        assert_eq!(truncate("Customer portal", 8), "Custome…");
    }
}
