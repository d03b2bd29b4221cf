use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "duesync.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    pub calendar_url: String,
    /// Events ending on or before this date are ignored. Quoted `YYYY-MM-DD`.
    pub start_date: NaiveDate,
    #[serde(default = "default_board")]
    pub board: String,
    #[serde(default = "default_list")]
    pub list: String,
    #[serde(default)]
    pub courses: Vec<String>,
}

fn default_board() -> String {
    "School".to_string()
}

fn default_list() -> String {
    "Backlog".to_string()
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, AppError> {
        toml::from_str(content)
            .map_err(|e| AppError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// First CLI argument, then `DUESYNC_CONFIG`, then `duesync.toml`.
    pub fn resolve_path(arg: Option<String>) -> PathBuf {
        arg.or_else(|| std::env::var("DUESYNC_CONFIG").ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn start_instant(&self) -> DateTime<Utc> {
        self.start_date.and_time(NaiveTime::MIN).and_utc()
    }
}
