use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_EVENTS_PATH, DEFAULT_LOG_LEVEL};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// JSON export of event definitions used to seed the store.
    pub events_path: String,
    /// Stop emitting recurrences once they start after the window end.
    pub truncate_at_window_end: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedConfig {
    /// Month to render, formatted `YYYY-MM`. Defaults to the current month.
    pub month: Option<String>,
}

impl Settings {
    /// ## Summary
    /// Returns a config builder seeded with the default values.
    ///
    /// ## Errors
    /// Returns an error if a default value cannot be set.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("calendar.events_path", DEFAULT_EVENTS_PATH)?
            .set_default("calendar.truncate_at_window_end", false)?)
    }

    /// ## Summary
    /// Loads configuration from environment variables and `config.toml` into a `Settings`.
    /// Environment variables are prefixed with `UPKEEP_` and use `__` between sections,
    /// e.g. `UPKEEP_CALENDAR__EVENTS_PATH`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::defaults()?
            .add_source(
                config::Environment::with_prefix("UPKEEP")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(events_path = %settings.calendar.events_path, "Settings resolved");
    Ok(settings)
}
