// src/config.rs
use std::time::Duration;

use crate::errors::{PipelineError, Result};
use crate::pacing::PacingSchedule;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

/// Whether the scripted pauses run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingMode {
    Scripted,
    Off,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the generation service.
    pub api_base: String,
    /// Request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    pub pacing_mode: PacingMode,
    pub pacing: PacingSchedule,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: None,
            pacing_mode: PacingMode::Scripted,
            pacing: PacingSchedule::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so it can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup("EDUAGENT_API_BASE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(PipelineError::Config(format!(
                "EDUAGENT_API_BASE must be an http(s) URL, got '{}'",
                api_base
            )));
        }

        let timeout = match lookup("EDUAGENT_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                    PipelineError::Config(format!(
                        "EDUAGENT_TIMEOUT_SECS must be a positive integer, got '{}'",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let pacing_mode = match lookup("EDUAGENT_PACING").as_deref().map(str::trim) {
            None | Some("") | Some("scripted") => PacingMode::Scripted,
            Some("off") => PacingMode::Off,
            Some(other) => {
                return Err(PipelineError::Config(format!(
                    "EDUAGENT_PACING must be 'scripted' or 'off', got '{}'",
                    other
                )));
            }
        };

        let pacing = match lookup("EDUAGENT_PACING_PATH") {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)?;
                let schedule = PacingSchedule::from_toml(&contents)?;
                log::info!("Loaded pacing schedule from {}", path);
                schedule
            }
            None => PacingSchedule::default(),
        };

        Ok(AppConfig { api_base, timeout, pacing_mode, pacing })
    }

    /// The schedule the controller should follow.
    pub fn effective_pacing(&self) -> PacingSchedule {
        match self.pacing_mode {
            PacingMode::Scripted => self.pacing,
            PacingMode::Off => PacingSchedule::instant(),
        }
    }
}
