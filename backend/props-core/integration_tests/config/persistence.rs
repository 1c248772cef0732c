use props_core::config::{AppConfig, CONFIG_FILE_NAME, PathSource, Preferences, detect_config_dir};
use props_core::config::paths::CONFIG_DIR_ENV_VAR;
use props_core::error::ConfigError;

use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

/// **VALUE**: Verifies saved preferences survive a reload.
///
/// **WHY THIS MATTERS**: The default password is the only persisted preference; losing it
/// turns every call into "No password provided".
///
/// **BUG THIS CATCHES**: Would catch field renames that break deserialization.
#[test]
fn given_saved_config_when_loaded_then_values_round_trip() {
    // GIVEN: A config with a default password and custom timeouts
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.preferences = Preferences {
        default_password: Some("s3cret".to_string()),
    };
    config.timeouts.execute_timeout_secs = 0;
    config.timeouts.download_timeout_secs = 42;

    // WHEN: Saving then loading
    config.save(dir.path()).unwrap();
    let loaded = AppConfig::load(dir.path()).unwrap();

    // THEN: Everything comes back and no temp file is left
    assert_eq!(
        loaded.preferences.default_password().unwrap().expose(),
        "s3cret"
    );
    assert_eq!(loaded.timeouts.execute_timeout(), None);
    assert_eq!(
        loaded.timeouts.download_timeout(),
        Some(Duration::from_secs(42))
    );
    assert!(dir.path().join(CONFIG_FILE_NAME).is_file());
    assert!(!dir.path().join(format!("{CONFIG_FILE_NAME}.tmp")).exists());
}

#[test]
fn given_missing_file_when_loaded_then_defaults() {
    let dir = TempDir::new().unwrap();

    let config = AppConfig::load(dir.path()).unwrap();

    assert_eq!(config.version, 1);
    assert!(config.preferences.default_password().is_none());
    assert_eq!(
        config.timeouts.download_timeout(),
        Some(Duration::from_secs(300))
    );
    assert_eq!(
        config.timeouts.execute_timeout(),
        Some(Duration::from_secs(60))
    );
}

#[test]
fn given_save_into_missing_dir_when_saved_then_dir_is_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");

    AppConfig::default().save(&nested).unwrap();

    assert!(AppConfig::file_path(&nested).is_file());
}

/// **VALUE**: Verifies a corrupt config is reported, not silently replaced.
///
/// **WHY THIS MATTERS**: Falling back to defaults would drop the stored default password
/// without telling anyone, and the next save would overwrite the file.
///
/// **BUG THIS CATCHES**: Would catch parse errors being swallowed.
#[test]
fn given_corrupt_file_when_loaded_then_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();

    let err = AppConfig::load(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::ParseError { .. }), "{err:?}");
}

#[test]
fn given_future_version_when_loaded_then_validation_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"version": 99}"#).unwrap();

    let err = AppConfig::load(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::ValidationError { .. }), "{err:?}");
}

#[test]
fn given_partial_file_when_loaded_then_missing_fields_default() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"{"preferences": {"default_password": "pw"}}"#,
    )
    .unwrap();

    let config = AppConfig::load(dir.path()).unwrap();

    assert_eq!(config.version, 1);
    assert_eq!(config.preferences.default_password().unwrap().expose(), "pw");
    assert_eq!(config.timeouts.execute_timeout_secs, 60);
}

#[test]
#[serial]
fn given_explicit_dir_when_detecting_then_explicit_wins_over_env() {
    let dir = TempDir::new().unwrap();
    // SAFETY: serialized with every other test that touches the environment.
    unsafe { std::env::set_var(CONFIG_DIR_ENV_VAR, "/ignored") };

    let paths = detect_config_dir(Some(dir.path().to_path_buf()));

    unsafe { std::env::remove_var(CONFIG_DIR_ENV_VAR) };
    let paths = paths.unwrap();
    assert_eq!(paths.source, PathSource::Explicit);
    assert_eq!(paths.config_dir, dir.path());
}

#[test]
#[serial]
fn given_env_var_when_detecting_then_env_dir_is_used() {
    let dir = TempDir::new().unwrap();
    // SAFETY: serialized with every other test that touches the environment.
    unsafe { std::env::set_var(CONFIG_DIR_ENV_VAR, dir.path()) };

    let paths = detect_config_dir(None);

    unsafe { std::env::remove_var(CONFIG_DIR_ENV_VAR) };
    let paths = paths.unwrap();
    assert_eq!(paths.source, PathSource::EnvVar);
    assert_eq!(paths.config_dir, dir.path());
}

#[test]
#[serial]
fn given_empty_env_var_when_detecting_then_env_is_ignored() {
    // SAFETY: serialized with every other test that touches the environment.
    unsafe { std::env::set_var(CONFIG_DIR_ENV_VAR, "") };

    let paths = detect_config_dir(None);

    unsafe { std::env::remove_var(CONFIG_DIR_ENV_VAR) };
    if let Ok(paths) = paths {
        assert_ne!(paths.source, PathSource::EnvVar);
    }
}
