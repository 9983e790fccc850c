//! Configuration loader for the `parley` binary.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` by default) and
//! deserializes it into [`ParleyConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use parley_types::config::ParleyConfig;
use parley_types::error::ConfigError;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PARLEY_HOME` environment variable
/// 2. `~/.parley`
/// 3. `./.parley`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARLEY_HOME") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".parley");
    }

    PathBuf::from(".parley")
}

pub fn parse_config(content: &str) -> Result<ParleyConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Load configuration from `path`, or `{data_dir}/config.toml` when `None`.
///
/// - Missing file: defaults.
/// - Unreadable or unparsable file: logs a warning and returns defaults.
pub async fn load_config(path: Option<&Path>) -> ParleyConfig {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => resolve_data_dir().join("config.toml"),
    };

    match read_config(&config_path).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            ParleyConfig::default()
        }
        Err(err) => {
            tracing::warn!("{} ({err}), using defaults", config_path.display());
            ParleyConfig::default()
        }
    }
}

async fn read_config(path: &Path) -> Result<Option<ParleyConfig>, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ConfigError::Read(err.to_string())),
    };
    parse_config(&content).map(Some)
}

/// Apply CLI overrides on top of file configuration.
pub fn apply_overrides(
    mut config: ParleyConfig,
    seed: Option<u64>,
    user_name: Option<String>,
) -> ParleyConfig {
    if seed.is_some() {
        config.seed = seed;
    }
    if user_name.is_some() {
        config.user_name = user_name;
    }
    config
}
