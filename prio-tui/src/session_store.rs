use anyhow::{Context, Result};
use pgrest::Credentials;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

use crate::config::app_config_dir;

fn secure_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

pub fn session_path() -> Result<PathBuf> {
    Ok(app_config_dir()?.join("session.json"))
}

pub fn load_session() -> Result<Option<Credentials>> {
    load_session_from(&session_path()?)
}

pub fn save_session(credentials: &Credentials) -> Result<()> {
    save_session_to(&session_path()?, credentials)
}

pub fn clear_session() -> Result<()> {
    clear_session_at(&session_path()?)
}

pub(crate) fn load_session_from(path: &Path) -> Result<Option<Credentials>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path).context("Failed to read session file")?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let credentials = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse session file at {}", path.display()))?;
    Ok(Some(credentials))
}

pub(crate) fn save_session_to(path: &Path, credentials: &Credentials) -> Result<()> {
    let content = serde_json::to_string_pretty(credentials)?;
    secure_write(path, &content)
}

pub(crate) fn clear_session_at(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            access_token: "jwt".to_string(),
            refresh_token: "rt".to_string(),
            expires_at: Some(1_740_830_400),
            user_id: "5b1f".to_string(),
            email: Some("me@example.com".to_string()),
        }
    }

    #[test]
    fn session_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prio").join("session.json");

        assert_eq!(load_session_from(&path).unwrap(), None);
        save_session_to(&path, &credentials()).unwrap();
        assert_eq!(load_session_from(&path).unwrap(), Some(credentials()));

        clear_session_at(&path).unwrap();
        assert!(!path.exists());
        clear_session_at(&path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        save_session_to(&path, &credentials()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn blank_file_means_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "\n").unwrap();

        assert_eq!(load_session_from(&path).unwrap(), None);
    }
}
