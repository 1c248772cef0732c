use crate::ARTIFACT_FILE_NAME;
use crate::config::{AppConfig, Preferences, Timeouts, ToolConfig};
use crate::error::ConfigError;

use std::time::Duration;

/// **VALUE**: Verifies the artifact path is fixed under the home directory.
///
/// **WHY THIS MATTERS**: Existing installs already have the JAR at `~/secure-properties-tool.jar`.
/// Moving it would trigger a fresh download for every user.
///
/// **BUG THIS CATCHES**: Would catch a renamed file or a different parent directory.
#[test]
fn given_home_dir_when_tool_config_created_then_artifact_is_in_home() {
    let tool = ToolConfig::new("/home/user").unwrap();

    assert_eq!(
        tool.artifact_path(),
        std::path::Path::new("/home/user").join(ARTIFACT_FILE_NAME)
    );
    assert_eq!(tool.java_binary(), "java");
    assert_eq!(tool.classpath_flag(), "-cp");
    assert_eq!(tool.main_class(), "com.mulesoft.tools.SecurePropertiesTool");
    assert!(tool.download_url().as_str().ends_with("secure-properties-tool-j17.jar"));
}

#[test]
fn given_invalid_url_when_overridden_then_returns_validation_error() {
    let result = ToolConfig::new("/home/user")
        .unwrap()
        .with_download_url("not a url");

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

/// **VALUE**: Verifies the documented timeout defaults and that `0` disables a timeout.
///
/// **WHY THIS MATTERS**: Slow corporate proxies need a way to turn the download timeout off
/// without editing code.
///
/// **BUG THIS CATCHES**: Would catch `0` being passed through as a zero-length timeout,
/// which fails every request instantly.
#[test]
fn given_timeouts_when_converted_then_zero_means_none() {
    let defaults = Timeouts::default();
    assert_eq!(defaults.download_timeout(), Some(Duration::from_secs(300)));
    assert_eq!(defaults.execute_timeout(), Some(Duration::from_secs(60)));

    let disabled = Timeouts {
        download_timeout_secs: 0,
        execute_timeout_secs: 0,
    };
    assert_eq!(disabled.download_timeout(), None);
    assert_eq!(disabled.execute_timeout(), None);
}

#[test]
fn given_empty_default_password_when_resolved_then_returns_none() {
    let prefs = Preferences {
        default_password: Some(String::new()),
    };
    assert!(prefs.default_password().is_none());

    let prefs = Preferences {
        default_password: Some("pw".to_string()),
    };
    assert_eq!(prefs.default_password().unwrap().expose(), "pw");
}

#[test]
fn given_preferences_when_debug_formatted_then_password_is_redacted() {
    let prefs = Preferences {
        default_password: Some("hunter2".to_string()),
    };

    let debug = format!("{prefs:?}");

    assert!(!debug.contains("hunter2"), "{debug}");
    assert!(debug.contains("REDACTED"));
}

/// **VALUE**: Verifies partial JSON fills missing sections from defaults.
///
/// **WHY THIS MATTERS**: Users hand-edit the config and often only set the password.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[serde(default)]` making the whole file
/// fail to parse.
#[test]
fn given_partial_json_when_parsed_then_missing_fields_use_defaults() {
    let config: AppConfig =
        serde_json::from_str(r#"{ "preferences": { "default_password": "pw" } }"#).unwrap();

    assert_eq!(config.version, 1);
    assert_eq!(config.timeouts.download_timeout_secs, 300);
    assert!(config.validate().is_ok());
}

#[test]
fn given_future_version_when_validated_then_returns_error() {
    let config = AppConfig {
        version: 99,
        ..AppConfig::default()
    };

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Invalid version: 99"));
}
