use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::source::{DEFAULT_SOURCE_URL, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_STORAGE: &str = "facts_database.json";
pub const DEFAULT_INTERVAL_MINUTES: u64 = 5;
/// One week
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub storage: PathBuf,
    pub source_url: String,
    pub timeout_secs: u64,
    pub interval_minutes: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            storage: PathBuf::from(DEFAULT_STORAGE),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
        }
    }
}

impl CollectorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_INTERVAL_MINUTES).contains(&self.interval_minutes) {
            anyhow::bail!("interval_minutes must be between 1 and {}", MAX_INTERVAL_MINUTES);
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be at least 1");
        }
        if self.source_url.trim().is_empty() {
            anyhow::bail!("source_url must not be empty");
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("factcollector.toml")
}

/// Load the config file, or defaults when it does not exist
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CollectorConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(CollectorConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: CollectorConfig = toml::from_str(&contents)
        .map_err(|e| crate::Error::Config(format!("{}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

pub fn write_config(path: &Path, config: &CollectorConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
