pub mod schema;
pub mod watcher;

pub use schema::{
    AlertConfig, DashConfig, DashboardConfig, GlobalConfig, HistoryConfig, InterfaceStatsConfig,
    OverlapPolicy, PbxConfig,
};
pub use watcher::ConfigWatcher;

use dash_core::{DashError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `DashConfig::default()` if
/// the file doesn't exist so the console always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<DashConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(DashConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| DashError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: DashConfig =
        toml::from_str(&raw).map_err(|e| DashError::Config(format!("TOML parse error: {e}")))?;
    validate(&config)?;
    Ok(config)
}

/// Reject values that would make the poll tasks misbehave.
pub fn validate(config: &DashConfig) -> Result<()> {
    if !config.global.base_url.starts_with("http://") && !config.global.base_url.starts_with("https://") {
        return Err(DashError::Config(format!(
            "base_url must start with http:// or https:// (got '{}')",
            config.global.base_url
        )));
    }

    let intervals = [
        ("dashboard.interval_ms", config.dashboard.interval_ms),
        ("pbx.interval_ms", config.pbx.interval_ms),
    ]
    .into_iter()
    .chain(
        config
            .interface_stats
            .iter()
            .map(|s| ("interface_stats.interval_ms", s.interval_ms)),
    );

    for (name, value) in intervals {
        if value == 0 {
            return Err(DashError::Config(format!("{name} must be greater than zero")));
        }
    }
    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("routerdash").join("routerdash.toml")
}
