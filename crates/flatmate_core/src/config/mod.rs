use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "FLATMATE_CONFIG_PATH";

pub const DEFAULT_SUMMARIZATION_MODEL: &str = "philschmid/bart-large-cnn-samsum";
pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";
pub const DEFAULT_REMINDER_INTERVAL_HOURS: u64 = 6;
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 60;
/// Largest interval whose length in seconds still fits a `u64`.
pub const MAX_REMINDER_INTERVAL_HOURS: u64 = u64::MAX / 3600;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub hf_token: Option<String>,
    #[serde(default)]
    pub summarization_model: Option<String>,
    #[serde(default)]
    pub sentiment_model: Option<String>,
    #[serde(default)]
    pub reminder_interval_hours: Option<u64>,
    #[serde(default)]
    pub poll_interval_seconds: Option<u64>,
    #[serde(default)]
    pub desktop_notifications: bool,
}

impl Config {
    pub fn summarization_model(&self) -> &str {
        self.summarization_model
            .as_deref()
            .unwrap_or(DEFAULT_SUMMARIZATION_MODEL)
    }

    pub fn sentiment_model(&self) -> &str {
        self.sentiment_model
            .as_deref()
            .unwrap_or(DEFAULT_SENTIMENT_MODEL)
    }

    pub fn reminder_interval(&self) -> Duration {
        let hours = self
            .reminder_interval_hours
            .unwrap_or(DEFAULT_REMINDER_INTERVAL_HOURS);
        Duration::from_secs(hours.saturating_mul(60 * 60))
    }

    pub fn poll_interval(&self) -> Duration {
        let seconds = self
            .poll_interval_seconds
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECONDS);
        Duration::from_secs(seconds)
    }

    /// Checks values that deserialization alone cannot rule out.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(hours) = self.reminder_interval_hours
            && !(1..=MAX_REMINDER_INTERVAL_HOURS).contains(&hours)
        {
            return Err(AppError::invalid_data(format!(
                "reminder_interval_hours must be between 1 and {MAX_REMINDER_INTERVAL_HOURS}"
            )));
        }
        if self.poll_interval_seconds == Some(0) {
            return Err(AppError::invalid_data(
                "poll_interval_seconds must be a positive integer",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

/// A single `KEY=VALUE` override from the command line, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverride {
    DataDir(PathBuf),
    HfToken(String),
    SummarizationModel(String),
    SentimentModel(String),
    ReminderIntervalHours(u64),
    PollIntervalSeconds(u64),
    DesktopNotifications(bool),
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("flatmate")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("flatmate")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config
        .validate()
        .map_err(|err| AppError::invalid_data(format!("{}: {}", path.display(), err.message())))?;
    Ok(config)
}

/// Parse a raw `KEY=VALUE` override string.
pub fn parse_config_override(raw: &str) -> Result<ConfigOverride, AppError> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| AppError::invalid_input("override must be in KEY=VALUE format"))?;

    let key = canonical_key(key_raw)
        .ok_or_else(|| AppError::invalid_input("override key cannot be empty"))?;
    let value = value_raw.trim();

    match key.as_str() {
        "data_dir" => Ok(ConfigOverride::DataDir(PathBuf::from(non_empty(&key, value)?))),
        "hf_token" | "token" => Ok(ConfigOverride::HfToken(non_empty(&key, value)?)),
        "summarization_model" => Ok(ConfigOverride::SummarizationModel(non_empty(&key, value)?)),
        "sentiment_model" => Ok(ConfigOverride::SentimentModel(non_empty(&key, value)?)),
        "reminder_interval_hours" => Ok(ConfigOverride::ReminderIntervalHours(positive(
            &key,
            value,
            MAX_REMINDER_INTERVAL_HOURS,
        )?)),
        "poll_interval_seconds" => Ok(ConfigOverride::PollIntervalSeconds(positive(
            &key,
            value,
            u64::MAX,
        )?)),
        "desktop_notifications" => Ok(ConfigOverride::DesktopNotifications(boolean(
            &key, value,
        )?)),
        other => Err(AppError::invalid_input(format!(
            "unknown config field '{other}'"
        ))),
    }
}

pub fn merge_overrides(base: &Config, overrides: &[ConfigOverride]) -> Config {
    let mut merged = base.clone();
    for item in overrides {
        match item {
            ConfigOverride::DataDir(dir) => merged.data_dir = Some(dir.clone()),
            ConfigOverride::HfToken(token) => merged.hf_token = Some(token.clone()),
            ConfigOverride::SummarizationModel(model) => {
                merged.summarization_model = Some(model.clone())
            }
            ConfigOverride::SentimentModel(model) => merged.sentiment_model = Some(model.clone()),
            ConfigOverride::ReminderIntervalHours(hours) => {
                merged.reminder_interval_hours = Some(*hours)
            }
            ConfigOverride::PollIntervalSeconds(seconds) => {
                merged.poll_interval_seconds = Some(*seconds)
            }
            ConfigOverride::DesktopNotifications(enabled) => {
                merged.desktop_notifications = *enabled
            }
        }
    }
    merged
}

fn canonical_key(raw: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, AppError> {
    if value.is_empty() {
        return Err(AppError::invalid_input(format!("{key} requires a value")));
    }
    Ok(value.to_string())
}

fn positive(key: &str, value: &str, max: u64) -> Result<u64, AppError> {
    match value.parse::<u64>() {
        Ok(number) if number > max => Err(AppError::invalid_input(format!(
            "{key} must be at most {max}"
        ))),
        Ok(number) if number > 0 => Ok(number),
        _ => Err(AppError::invalid_input(format!(
            "{key} must be a positive integer"
        ))),
    }
}

fn boolean(key: &str, value: &str) -> Result<bool, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(AppError::invalid_input(format!("{key} must be true or false"))),
    }
}
