//! Configuration module.
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! file, environment variables, and command-line flags.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, validate, ConfigError,
    ConfigFile, ResolvedConfig,
};

use std::path::PathBuf;

/// Run the whole precedence chain and validate the result.
///
/// # Errors
///
/// Returns `ConfigError` if a config file exists but is unusable, or if the
/// resolved values are invalid.
pub fn resolve(
    config_path: Option<PathBuf>,
    page_limit_override: Option<usize>,
    collapsed_lines_override: Option<usize>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file))?;
    validate(apply_cli_overrides(
        config,
        page_limit_override,
        collapsed_lines_override,
    ))
}
