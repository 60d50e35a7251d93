mod api;
mod app;
mod cli;
mod config;
mod draft;
mod layout;
mod logging;
mod login;
mod matrix;
mod notify;
mod palette;
mod repository;
mod runtime;
mod session_store;
mod types;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use repository::{ProjectRepository, ProjectStore};
use std::io;
use std::sync::Arc;
use types::UserId;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();
    let config = config::PrioConfig::load()?;
    logging::init(&config::PrioConfig::log_path()?, &config.log_filter)?;

    match cli.command() {
        cli::Commands::ConfigPath => {
            let path = config::PrioConfig::config_path()?;
            if !path.exists() {
                config.save_to(&path)?;
                println!("Created default config at {}", path.display());
            }
            println!("{}", path.display());
            Ok(())
        }
        cli::Commands::Login => {
            login::run_login(&config).await?;
            Ok(())
        }
        cli::Commands::Logout => {
            session_store::clear_session()?;
            println!("Logged out.");
            Ok(())
        }
        cli::Commands::Dev => {
            tracing::info!("starting with in-memory dev backend");
            let store: Arc<dyn ProjectStore> = Arc::new(api::DevBackend::new());
            run_tui(
                store,
                UserId::from(api::DEV_USER_ID),
                "dev@localhost".to_string(),
                &config,
            )
            .await
        }
        cli::Commands::Run => {
            config.require_backend()?;
            let credentials = login::restore_session(&config).await?;
            let label = credentials
                .email
                .clone()
                .unwrap_or_else(|| credentials.user_id.clone());
            let client = api::ApiClient::new(&config, credentials)?;
            let user = client.user_id().await;
            tracing::info!("starting as {}", user);
            run_tui(Arc::new(client), user, label, &config).await
        }
    }
}

async fn run_tui(
    store: Arc<dyn ProjectStore>,
    user: UserId,
    user_label: String,
    config: &config::PrioConfig,
) -> Result<()> {
    let (notify_tx, notify_rx) = notify::channel();
    let repository = ProjectRepository::new(store, Some(user), notify_tx);
    let mut app = App::new(
        repository,
        notify_rx,
        user_label,
        config.refresh_interval(),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!("TUI exited with error: {:?}", err);
    }
    res
}
