use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::api_connection::endpoints::DEFAULT_IMPORT_MODEL;
use crate::seasonal::{SeasonalCalendar, DEFAULT_SUGGESTION_LIMIT};

pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const MODEL_ENV_VAR: &str = "RECIPE_BOX_MODEL";
pub const CALENDAR_ENV_VAR: &str = "RECIPE_BOX_CALENDAR";
pub const SUGGESTION_LIMIT_ENV_VAR: &str = "RECIPE_BOX_SUGGESTION_LIMIT";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Name of the variable holding the key, not the key itself.
    pub api_key_env_var: String,
    pub model: String,
    pub calendar_path: Option<PathBuf>,
    pub suggestion_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            model: DEFAULT_IMPORT_MODEL.to_string(),
            calendar_path: None,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl AppConfig {
    /// Reads settings from the environment, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(model) = lookup(MODEL_ENV_VAR).filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(path) = lookup(CALENDAR_ENV_VAR).filter(|p| !p.trim().is_empty()) {
            config.calendar_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(limit) = lookup(SUGGESTION_LIMIT_ENV_VAR) {
            config.suggestion_limit = limit
                .trim()
                .parse()
                .with_context(|| format!("{} must be a non-negative integer, got '{}'", SUGGESTION_LIMIT_ENV_VAR, limit))?;
        }
        Ok(config)
    }

    /// The configured calendar file, or the built-in Colorado table.
    pub fn load_calendar(&self) -> Result<SeasonalCalendar> {
        match &self.calendar_path {
            Some(path) => SeasonalCalendar::from_csv(path)
                .with_context(|| format!("Failed to load seasonal calendar from '{}'", path.display())),
            None => Ok(SeasonalCalendar::colorado()),
        }
    }
}
