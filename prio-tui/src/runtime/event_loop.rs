use crate::app::App;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

use super::action_queue::{channel, Action};
use super::actions::run_action;
use super::views::{handle_mouse, handle_view_key};

const INPUT_POLL: Duration = Duration::from_millis(100);

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let _ = action_tx.send(Action::Refresh);

    loop {
        app.sync(Instant::now());
        if app.is_loading() {
            app.throbber_state.calc_next();
        }

        terminal.draw(|f| ui::render(f, app))?;

        // After the draw, so a dialog shows its pending state while the request runs.
        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app).await;
        }

        if event::poll(INPUT_POLL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_view_key(key, app, &action_tx);
                }
                Event::Mouse(mouse) => handle_mouse(mouse, app),
                _ => {}
            }
        }

        let now = Instant::now();
        if app.refresh_due(now) {
            tracing::debug!("background refresh");
            app.mark_refreshed(now);
            let _ = action_tx.send(Action::Refresh);
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
