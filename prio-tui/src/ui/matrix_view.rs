use super::utils::{centered_rect, truncate};
use super::*;
use crate::layout::GRID_SIZE;
use crate::matrix::Marker;
use ratatui::{
    symbols,
    widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine},
};

const QUADRANTS: [(&str, bool, bool); 4] = [
    // (caption, right side, top half)
    ("High Benefit · Low Effort", false, true),
    ("High Benefit · High Effort", true, true),
    ("Low Benefit · Low Effort", false, false),
    ("Low Benefit · High Effort", true, false),
];

fn matrix_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Prioritization Matrix ",
            Style::default().fg(Color::White),
        ))
        .title_top(Line::from(caption(" ↑ Benefit ")).right_aligned())
        .title_bottom(Line::from(caption(" Effort → ")).centered())
}

fn caption(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::DarkGray))
}

/// Size of one terminal cell in grid units.
struct CellSize {
    w: f64,
    h: f64,
}

impl CellSize {
    fn of(area: Rect) -> Self {
        Self {
            w: GRID_SIZE / f64::from(area.width.max(1)),
            h: GRID_SIZE / f64::from(area.height.max(1)),
        }
    }
}

pub fn render_matrix(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = matrix_block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.markers.is_empty() {
        app.matrix_area = None;
        render_empty(frame, inner);
        return;
    }
    app.matrix_area = Some(inner);

    let cell = CellSize::of(inner);
    let markers = &app.markers;
    let focused = app.focused_marker;

    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, GRID_SIZE])
        .y_bounds([0.0, GRID_SIZE])
        .paint(|ctx| {
            draw_quadrants(ctx, &cell);
            ctx.layer();
            for marker in markers {
                draw_marker(ctx, marker, &cell);
            }
            if let Some(marker) = focused.and_then(|i| markers.get(i)) {
                draw_focus(ctx, marker, &cell);
            }
        });

    frame.render_widget(canvas, inner);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let message = Paragraph::new(vec![
        Line::from(Span::styled(
            "No projects to display",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::styled(": New project", Style::default().fg(Color::DarkGray)),
        ]),
    ])
    .alignment(Alignment::Center);

    frame.render_widget(message, centered_rect(area.width, 3, area));
}

pub fn render_loading(frame: &mut Frame, app: &mut App, area: Rect) {
    const LABEL: &str = "Loading your projects...";

    let row = centered_rect(LABEL.len() as u16 + 2, 1, area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(row);

    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(Color::Yellow))
        .throbber_style(Style::default().fg(Color::Yellow))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(throbber_widgets_tui::WhichUse::Spin);
    frame.render_stateful_widget(throbber, cols[0], &mut app.throbber_state);
    frame.render_widget(
        Paragraph::new(Span::styled(LABEL, Style::default().fg(Color::DarkGray))),
        cols[1],
    );
}

/// Grid y grows downward, canvas y grows upward.
fn canvas_y(y: f64) -> f64 {
    GRID_SIZE - y
}

fn draw_quadrants(ctx: &mut Context<'_>, cell: &CellSize) {
    let half = GRID_SIZE / 2.0;
    ctx.draw(&CanvasLine {
        x1: half,
        y1: 0.0,
        x2: half,
        y2: GRID_SIZE,
        color: Color::DarkGray,
    });
    ctx.draw(&CanvasLine {
        x1: 0.0,
        y1: half,
        x2: GRID_SIZE,
        y2: half,
        color: Color::DarkGray,
    });

    for (caption, right, top) in QUADRANTS {
        let width = caption.chars().count() as f64 * cell.w;
        let x = if right {
            GRID_SIZE - width - cell.w
        } else {
            cell.w
        };
        let y = if top {
            GRID_SIZE - cell.h
        } else {
            cell.h
        };
        ctx.print(
            x.max(0.0),
            y,
            Span::styled(caption, Style::default().fg(Color::DarkGray)),
        );
    }
}

fn draw_marker(ctx: &mut Context<'_>, marker: &Marker, cell: &CellSize) {
    let x = marker.center.x;
    let y = canvas_y(marker.center.y);

    // Braille dots are half a cell wide and a quarter cell tall.
    let step = (cell.w / 2.0).min(cell.h / 4.0).max(0.5);
    let mut radius = marker.radius();
    while radius > 0.0 {
        ctx.draw(&Circle {
            x,
            y,
            radius,
            color: marker.color,
        });
        radius -= step;
    }

    let label_x = x - marker.label.chars().count() as f64 * cell.w / 2.0;
    ctx.print(
        label_x.max(0.0),
        y,
        Span::styled(
            marker.label.clone(),
            Style::default()
                .fg(Color::Black)
                .bg(marker.color)
                .add_modifier(Modifier::BOLD),
        ),
    );
}

fn draw_focus(ctx: &mut Context<'_>, marker: &Marker, cell: &CellSize) {
    let x = marker.center.x;
    let y = canvas_y(marker.center.y);

    ctx.draw(&Circle {
        x,
        y,
        radius: marker.radius() + cell.w.min(cell.h) / 2.0,
        color: Color::White,
    });

    let title = truncate(&marker.title, 40);
    let width = title.chars().count() as f64 * cell.w;
    let tooltip_x = (x - width / 2.0).clamp(0.0, (GRID_SIZE - width).max(0.0));
    let tooltip_y = (y + marker.radius() + cell.h).min(GRID_SIZE - cell.h);
    ctx.print(
        tooltip_x,
        tooltip_y,
        Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    );
}
