/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Config file location
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

// Proxy defaults
// Note: an empty endpoint list is valid; resolution then passes URLs through
pub const PROXY_URLS_ENV: &str = "PLAYBACK_PROXY_URLS";

// Preference defaults
pub const DEFAULT_PERSIST_PREFERENCES: bool = true;
pub const DEFAULT_PREFERENCES_PATH: &str = "./data/quality.json";
pub const DEFAULT_AUTOMATIC_QUALITY: bool = true;

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";
