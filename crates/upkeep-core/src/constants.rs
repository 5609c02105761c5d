/// Optional configuration file read after the environment
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default location of the event definition export loaded by the feed tool
pub const DEFAULT_EVENTS_PATH: &str = "events.json";

pub const DEFAULT_LOG_LEVEL: &str = "info";
