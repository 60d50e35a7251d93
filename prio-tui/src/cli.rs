use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "prio")]
#[command(about = "Terminal effort/benefit matrix for prioritizing projects")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the configured backend (default)
    Run,
    /// Run with local in-memory sample projects
    Dev,
    /// Sign in with email and password
    Login,
    /// Remove the local session
    Logout,
    /// Print config path and create default file if missing
    ConfigPath,
}

impl Cli {
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Run)
    }
}
