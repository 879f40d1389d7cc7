//! Configuration file loading with precedence handling.

use crate::layout::DEFAULT_LAYOUT_CACHE_CAPACITY;
use crate::pagination::{DEFAULT_COLLAPSED_LINES, DEFAULT_PAGE_LIMIT, DEFAULT_PREFETCH_SCREENS};
use crate::resource::DEFAULT_RESOURCE_CACHE_CAPACITY;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "REVIEWFEED_CONFIG";
/// Environment variable overriding the page size.
pub const PAGE_LIMIT_ENV: &str = "REVIEWFEED_PAGE_LIMIT";
/// Environment variable overriding the prefetch threshold.
pub const PREFETCH_SCREENS_ENV: &str = "REVIEWFEED_PREFETCH_SCREENS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting has a value the feed cannot run with.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Setting name (config key or environment variable).
        key: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/reviewfeed/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Items requested per page.
    #[serde(default)]
    pub page_limit: Option<usize>,

    /// Screens of remaining content that trigger the next page.
    #[serde(default)]
    pub prefetch_screens: Option<f64>,

    /// Lines a review body shows before it is expanded.
    #[serde(default)]
    pub collapsed_lines: Option<usize>,

    /// Entries kept by the shared resource cache.
    #[serde(default)]
    pub image_cache_capacity: Option<usize>,

    /// Row layouts kept by the layout cache.
    #[serde(default)]
    pub layout_cache_capacity: Option<usize>,

    /// Simulated latency of the fixture provider, in milliseconds.
    #[serde(default)]
    pub provider_latency_ms: Option<u64>,

    /// Timeout of HTTP page and resource requests, in seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Items requested per page.
    pub page_limit: usize,
    /// Prefetch threshold in screens.
    pub prefetch_screens: f64,
    /// Collapsed body lines.
    pub collapsed_lines: usize,
    /// Resource cache capacity.
    pub image_cache_capacity: usize,
    /// Layout cache capacity.
    pub layout_cache_capacity: usize,
    /// Fixture provider latency in milliseconds.
    pub provider_latency_ms: u64,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            prefetch_screens: DEFAULT_PREFETCH_SCREENS,
            collapsed_lines: DEFAULT_COLLAPSED_LINES,
            image_cache_capacity: DEFAULT_RESOURCE_CACHE_CAPACITY,
            layout_cache_capacity: DEFAULT_LAYOUT_CACHE_CAPACITY,
            provider_latency_ms: 0,
            request_timeout_secs: 10,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/reviewfeed/reviewfeed.log` on Linux, or the
/// platform's state directory elsewhere. Falls back to the current directory
/// when no state directory exists.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("reviewfeed").join("reviewfeed.log")
    } else {
        PathBuf::from("reviewfeed.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/reviewfeed/config.toml` on Linux, appropriate path on
/// other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reviewfeed").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `REVIEWFEED_CONFIG` environment variable
/// 3. Default path `~/.config/reviewfeed/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        page_limit: config.page_limit.unwrap_or(defaults.page_limit),
        prefetch_screens: config.prefetch_screens.unwrap_or(defaults.prefetch_screens),
        collapsed_lines: config.collapsed_lines.unwrap_or(defaults.collapsed_lines),
        image_cache_capacity: config
            .image_cache_capacity
            .unwrap_or(defaults.image_cache_capacity),
        layout_cache_capacity: config
            .layout_cache_capacity
            .unwrap_or(defaults.layout_cache_capacity),
        provider_latency_ms: config
            .provider_latency_ms
            .unwrap_or(defaults.provider_latency_ms),
        request_timeout_secs: config
            .request_timeout_secs
            .unwrap_or(defaults.request_timeout_secs),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: name.to_string(),
                reason: format!("{raw:?}: {e}"),
            }),
        Err(_) => Ok(None),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `REVIEWFEED_PAGE_LIMIT`: Override page size
/// - `REVIEWFEED_PREFETCH_SCREENS`: Override prefetch threshold
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a set variable does not parse.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Some(limit) = parse_env(PAGE_LIMIT_ENV)? {
        config.page_limit = limit;
    }
    if let Some(screens) = parse_env(PREFETCH_SCREENS_ENV)? {
        config.prefetch_screens = screens;
    }
    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    page_limit_override: Option<usize>,
    collapsed_lines_override: Option<usize>,
) -> ResolvedConfig {
    if let Some(limit) = page_limit_override {
        config.page_limit = limit;
    }

    if let Some(lines) = collapsed_lines_override {
        config.collapsed_lines = lines;
    }

    config
}

/// Reject values the feed cannot run with.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for a zero page limit or a prefetch
/// threshold that is not a positive finite number.
pub fn validate(config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if config.page_limit == 0 {
        return Err(ConfigError::InvalidValue {
            key: "page_limit".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    if !config.prefetch_screens.is_finite() || config.prefetch_screens <= 0.0 {
        return Err(ConfigError::InvalidValue {
            key: "prefetch_screens".to_string(),
            reason: format!("must be a positive number, got {}", config.prefetch_screens),
        });
    }
    Ok(config)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
