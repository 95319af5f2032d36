use chrono::Weekday;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::calendar::locale_week_start;
use crate::tasks::DEFAULT_SAMPLE_COUNT;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config in {}: {source}", .path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("sample_tasks must be at least 1")]
    NoSampleTasks,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Overrides the locale's first day of the week, e.g. `"Mon"` or `"sunday"`.
    pub week_start:   Option<Weekday>,
    pub sample_tasks: Option<usize>,
    pub theme:        Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_dir().join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        let cfg: AppConfig = toml::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.to_owned(), source })?;
        if cfg.sample_tasks == Some(0) {
            return Err(ConfigError::NoSampleTasks);
        }
        Ok(cfg)
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start.unwrap_or_else(locale_week_start)
    }

    pub fn sample_task_count(&self) -> usize {
        self.sample_tasks.unwrap_or(DEFAULT_SAMPLE_COUNT)
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notorious")
}
