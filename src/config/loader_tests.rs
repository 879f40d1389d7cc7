//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

fn temp_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("reviewfeed_{}_{name}", std::process::id()))
}

#[test]
fn default_config_path_contains_reviewfeed_config_toml() {
    let Some(path) = default_config_path() else {
        return;
    };
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("reviewfeed") && path_str.ends_with("config.toml"),
        "Path should contain 'reviewfeed' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = temp_path("valid.toml");
    let toml_content = r#"
page_limit = 50
prefetch_screens = 1.5
collapsed_lines = 4
image_cache_capacity = 64
layout_cache_capacity = 200
provider_latency_ms = 120
request_timeout_secs = 3
log_file_path = "/tmp/feed.log"
"#;
    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should parse valid TOML")
        .expect("Should return Some for existing file");

    assert_eq!(config.page_limit, Some(50));
    assert_eq!(config.prefetch_screens, Some(1.5));
    assert_eq!(config.collapsed_lines, Some(4));
    assert_eq!(config.image_cache_capacity, Some(64));
    assert_eq!(config.layout_cache_capacity, Some(200));
    assert_eq!(config.provider_latency_ms, Some(120));
    assert_eq!(config.request_timeout_secs, Some(3));
    assert_eq!(config.log_file_path, Some(PathBuf::from("/tmp/feed.log")));

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = temp_path("invalid.toml");
    fs::write(&config_path, "page_limit = = 3").expect("Failed to write test config");

    let result = load_config_file(&config_path);
    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "Invalid TOML should be a ParseError, got {:?}",
        result
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"dark\"");
    assert!(result.is_err(), "Unknown keys must be rejected");
}

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_uses_defaults_for_none_fields() {
    let resolved = merge_config(Some(ConfigFile {
        page_limit: Some(10),
        ..ConfigFile::default()
    }));
    let defaults = ResolvedConfig::default();

    assert_eq!(resolved.page_limit, 10);
    assert_eq!(resolved.prefetch_screens, defaults.prefetch_screens);
    assert_eq!(resolved.collapsed_lines, defaults.collapsed_lines);
    assert_eq!(resolved.image_cache_capacity, defaults.image_cache_capacity);
}

#[test]
fn resolved_config_default_has_expected_values() {
    let config = ResolvedConfig::default();
    assert_eq!(config.page_limit, 20);
    assert_eq!(config.prefetch_screens, 2.5);
    assert_eq!(config.collapsed_lines, 3);
    assert_eq!(config.image_cache_capacity, 256);
    assert_eq!(config.layout_cache_capacity, 1000);
    assert_eq!(config.provider_latency_ms, 0);
    assert_eq!(config.request_timeout_secs, 10);
}

/// RAII guard to ensure environment variable cleanup even under test parallelism.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(reviewfeed_env)]
fn apply_env_overrides_respects_page_limit_and_prefetch() {
    let _limit = EnvGuard::new(PAGE_LIMIT_ENV);
    let _screens = EnvGuard::new(PREFETCH_SCREENS_ENV);
    env::set_var(PAGE_LIMIT_ENV, "35");
    env::set_var(PREFETCH_SCREENS_ENV, " 1.25 ");

    let result = apply_env_overrides(ResolvedConfig::default()).unwrap();

    assert_eq!(result.page_limit, 35);
    assert_eq!(result.prefetch_screens, 1.25);
    assert_eq!(result.collapsed_lines, 3, "Other fields untouched");
}

#[test]
#[serial(reviewfeed_env)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _limit = EnvGuard::new(PAGE_LIMIT_ENV);
    let _screens = EnvGuard::new(PREFETCH_SCREENS_ENV);

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), Ok(base));
}

#[test]
#[serial(reviewfeed_env)]
fn apply_env_overrides_rejects_unparsable_value() {
    let _limit = EnvGuard::new(PAGE_LIMIT_ENV);
    env::set_var(PAGE_LIMIT_ENV, "twenty");

    let err = apply_env_overrides(ResolvedConfig::default()).unwrap_err();

    assert!(
        matches!(&err, ConfigError::InvalidValue { key, .. } if key == PAGE_LIMIT_ENV),
        "got {err:?}"
    );
}

#[test]
#[serial(reviewfeed_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let explicit_path = temp_path("explicit.toml");
    let env_path = temp_path("env.toml");
    fs::write(&explicit_path, "page_limit = 11").expect("Failed to write explicit config");
    fs::write(&env_path, "page_limit = 22").expect("Failed to write env config");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(
        config.page_limit,
        Some(11),
        "Should use explicit path, not REVIEWFEED_CONFIG"
    );

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(reviewfeed_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let env_path = temp_path("env_only.toml");
    fs::write(&env_path, "collapsed_lines = 6").expect("Failed to write env config");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(config.collapsed_lines, Some(6));

    fs::remove_file(env_path).ok();
}

#[test]
fn apply_cli_overrides_only_touches_given_flags() {
    let base = ResolvedConfig::default();

    let result = apply_cli_overrides(base.clone(), Some(5), None);

    assert_eq!(result.page_limit, 5);
    assert_eq!(result.collapsed_lines, base.collapsed_lines);
    assert_eq!(apply_cli_overrides(base.clone(), None, None), base);
}

#[test]
#[serial(reviewfeed_env)]
fn precedence_chain_full_defaults_to_cli() {
    let _limit = EnvGuard::new(PAGE_LIMIT_ENV);
    let _screens = EnvGuard::new(PREFETCH_SCREENS_ENV);
    env::set_var(PREFETCH_SCREENS_ENV, "4");

    let file = ConfigFile {
        page_limit: Some(30),
        prefetch_screens: Some(1.0),
        collapsed_lines: Some(5),
        ..ConfigFile::default()
    };
    let resolved = apply_cli_overrides(
        apply_env_overrides(merge_config(Some(file))).unwrap(),
        Some(7),
        None,
    );

    assert_eq!(resolved.page_limit, 7, "CLI beats file");
    assert_eq!(resolved.prefetch_screens, 4.0, "Env beats file");
    assert_eq!(resolved.collapsed_lines, 5, "File beats default");
}

#[test]
fn validate_rejects_zero_page_limit() {
    let config = ResolvedConfig {
        page_limit: 0,
        ..ResolvedConfig::default()
    };
    assert!(matches!(
        validate(config),
        Err(ConfigError::InvalidValue { key, .. }) if key == "page_limit"
    ));
}

#[test]
fn validate_rejects_non_positive_prefetch() {
    for screens in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let config = ResolvedConfig {
            prefetch_screens: screens,
            ..ResolvedConfig::default()
        };
        assert!(validate(config).is_err(), "{screens} should be rejected");
    }
}

#[test]
fn validate_accepts_defaults() {
    let config = ResolvedConfig::default();
    assert_eq!(validate(config.clone()), Ok(config));
}
