use anyhow::{Context, Result};
use chrono::Utc;
use pgrest::{Credentials, ServiceUrl};
use std::io::{BufRead, Write};

use crate::config::PrioConfig;
use crate::session_store;

const NOT_LOGGED_IN: &str = "Not logged in. Run `prio login` to authenticate.";
const SESSION_EXPIRED: &str = "Session expired. Run `prio login` to re-authenticate.";

/// Prompt for email and password, sign in, and save the session.
pub async fn run_login(config: &PrioConfig) -> Result<Credentials> {
    config.require_backend()?;

    let email = prompt("Email: ")?;
    if email.is_empty() {
        anyhow::bail!("Email is required");
    }
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let credentials = Credentials::sign_in(
        &ServiceUrl::new(&config.api_url),
        &config.api_key,
        &email,
        &password,
    )
    .await
    .context("Login failed")?;

    session_store::save_session(&credentials)?;
    tracing::info!("signed in as {}", credentials.user_id);
    println!("Login successful. Session saved.");

    Ok(credentials)
}

/// The saved session, refreshed and re-saved if its access token has expired.
pub async fn restore_session(config: &PrioConfig) -> Result<Credentials> {
    let credentials = session_store::load_session()?.context(NOT_LOGGED_IN)?;
    if !credentials.is_expired(Utc::now()) {
        return Ok(credentials);
    }

    tracing::info!("saved session expired, refreshing");
    let refreshed = credentials
        .refresh(&ServiceUrl::new(&config.api_url), &config.api_key)
        .await
        .map_err(|e| {
            tracing::warn!("Session refresh failed: {}", e);
            anyhow::anyhow!(SESSION_EXPIRED)
        })?;
    session_store::save_session(&refreshed)?;
    Ok(refreshed)
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    read_trimmed_line(&mut std::io::stdin().lock())
}

fn read_trimmed_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read input")?;
    Ok(line.trim().to_string())
}
