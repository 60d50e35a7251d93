use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "prio";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioConfig {
    /// Base URL of the hosted backend, e.g. "https://xyzcompany.supabase.co"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Public (anon) API key sent with every request.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// `tracing` filter directives. `PRIO_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_api_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_log_filter() -> String {
    "prio=info,pgrest=info".to_string()
}

impl Default for PrioConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            refresh_interval_secs: default_refresh_interval_secs(),
            log_filter: default_log_filter(),
        }
    }
}

pub fn app_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Cannot determine config directory")?
        .join(APP_DIR))
}

impl PrioConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(app_config_dir()?.join("config.toml"))
    }

    /// Where the log file goes. The terminal belongs to the UI.
    pub fn log_path() -> Result<PathBuf> {
        Ok(dirs::cache_dir()
            .context("Cannot determine cache directory")?
            .join(APP_DIR)
            .join("prio.log"))
    }

    /// Load config from the default location, then `PRIO_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Layering: built-in defaults, the TOML file at `path` if it exists, then `PRIO_*`
    /// environment variables (`PRIO_API_URL`, `PRIO_REFRESH_INTERVAL_SECS`, ...).
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("PRIO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config at {}", path.display()))?;

        settings
            .try_deserialize::<Self>()
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }

    /// Background refresh period. Zero is bumped to one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Reject configurations that cannot reach a backend at all.
    pub fn require_backend(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!(
                "No API key configured. Set `api_key` in {} or PRIO_API_KEY.",
                Self::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "config.toml".to_string())
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PrioConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.api_url, "http://localhost:54321");
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.log_filter, "prio=info,pgrest=info");
    }

    #[test]
    fn saved_file_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = PrioConfig {
            api_url: "https://example.supabase.co".to_string(),
            api_key: "anon".to_string(),
            refresh_interval_secs: 15,
            ..PrioConfig::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(PrioConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "refresh_interval_secs = 0\n").unwrap();

        let config = PrioConfig::load_from(&path).unwrap();
        assert_eq!(config.refresh_interval_secs, 0);
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
        assert_eq!(config.api_url, "http://localhost:54321");
    }

    #[test]
    fn blank_api_key_is_rejected() {
        assert!(PrioConfig::default().require_backend().is_err());
        let config = PrioConfig {
            api_key: "anon".to_string(),
            ..PrioConfig::default()
        };
        assert!(config.require_backend().is_ok());
    }
}
