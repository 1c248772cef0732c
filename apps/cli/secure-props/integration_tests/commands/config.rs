use secure_props::cli::ConfigAction;
use secure_props::commands::config::{
    EMPTY_PASSWORD_MESSAGE, PASSWORD_CLEARED_MESSAGE, PASSWORD_SAVED_MESSAGE, run,
};
use secure_props::commands::{Context, Report};
use secure_props::error::SecurePropsError;

use props_core::config::{AppConfig, ConfigPaths, PathSource, ToolConfig};

use std::io::{self, Cursor};

use tempfile::TempDir;

fn context(dir: &TempDir) -> Context {
    Context {
        paths: ConfigPaths {
            config_dir: dir.path().to_path_buf(),
            source: PathSource::Explicit,
        },
        config: AppConfig::load(dir.path()).unwrap(),
        tool: ToolConfig::new(dir.path()).unwrap(),
    }
}

/// **VALUE**: Verifies a stored default password is persisted and picked up on reload.
///
/// **WHY THIS MATTERS**: Every later call without `--password` depends on it.
///
/// **BUG THIS CATCHES**: Would catch the command mutating memory without saving.
#[test]
fn given_set_default_password_when_run_then_persisted() {
    // GIVEN: An empty config dir
    let dir = TempDir::new().unwrap();
    let mut context = context(&dir);

    // WHEN: Setting a default password
    let report = run(
        &mut context,
        ConfigAction::SetDefaultPassword {
            password: Some("s3cret".to_string()),
        },
        io::empty(),
    )
    .unwrap();

    // THEN: Saved on disk and reported
    assert_eq!(
        report,
        Report::ConfigUpdated {
            message: PASSWORD_SAVED_MESSAGE.to_string()
        }
    );
    let reloaded = AppConfig::load(dir.path()).unwrap();
    assert_eq!(
        reloaded.preferences.default_password().unwrap().expose(),
        "s3cret"
    );
}

#[test]
fn given_empty_default_password_when_set_then_rejected_and_nothing_written() {
    let dir = TempDir::new().unwrap();
    let mut context = context(&dir);

    let err = run(
        &mut context,
        ConfigAction::SetDefaultPassword {
            password: Some(String::new()),
        },
        io::empty(),
    )
    .unwrap_err();

    assert!(matches!(err, SecurePropsError::Input { .. }), "{err:?}");
    assert_eq!(err.message(), EMPTY_PASSWORD_MESSAGE);
    assert!(!AppConfig::file_path(dir.path()).exists());
}

#[test]
fn given_stored_password_when_cleared_then_removed_from_disk() {
    let dir = TempDir::new().unwrap();
    let mut context = context(&dir);
    run(
        &mut context,
        ConfigAction::SetDefaultPassword {
            password: Some("s3cret".to_string()),
        },
        io::empty(),
    )
    .unwrap();

    let report = run(&mut context, ConfigAction::ClearDefaultPassword, io::empty()).unwrap();

    assert_eq!(
        report,
        Report::ConfigUpdated {
            message: PASSWORD_CLEARED_MESSAGE.to_string()
        }
    );
    let reloaded = AppConfig::load(dir.path()).unwrap();
    assert!(reloaded.preferences.default_password().is_none());
}

/// **VALUE**: Verifies `config show` never includes the password itself.
///
/// **WHY THIS MATTERS**: `config show` output is the first thing people paste into issues.
///
/// **BUG THIS CATCHES**: Would catch the report growing a password field.
#[test]
fn given_stored_password_when_shown_then_only_presence_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut context = context(&dir);
    run(
        &mut context,
        ConfigAction::SetDefaultPassword {
            password: Some("s3cret".to_string()),
        },
        io::empty(),
    )
    .unwrap();

    let report = run(&mut context, ConfigAction::Show, io::empty()).unwrap();

    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("s3cret"));
    match report {
        Report::Config(config) => {
            assert!(config.default_password_set);
            assert_eq!(config.path, AppConfig::file_path(dir.path()));
            assert_eq!(config.source, "explicit");
            assert_eq!(config.execute_timeout_secs, 60);
        }
        other => panic!("expected config report, got {other:?}"),
    }
}

#[test]
fn given_path_action_when_run_then_reports_config_file() {
    let dir = TempDir::new().unwrap();
    let mut context = context(&dir);

    let report = run(&mut context, ConfigAction::Path, io::empty()).unwrap();

    assert_eq!(
        report,
        Report::ConfigPath {
            path: dir.path().join("config.json")
        }
    );
}

/// **VALUE**: Verifies an omitted password is read from the input stream.
///
/// **WHY THIS MATTERS**: Piping the password in (`echo pw | secure-props config
/// set-default-password`) is the only way to store it without leaving it in shell history.
///
/// **BUG THIS CATCHES**: Would catch the trailing newline from `echo` being stored as part of
/// the password, which would then fail every later decryption.
#[test]
fn given_password_on_stdin_when_set_without_argument_then_stored_without_newline() {
    // GIVEN: No password argument and a piped line
    let dir = TempDir::new().unwrap();
    let mut context = context(&dir);

    // WHEN: Setting the default password
    let report = run(
        &mut context,
        ConfigAction::SetDefaultPassword { password: None },
        Cursor::new("from-stdin\n"),
    )
    .unwrap();

    // THEN: Stored exactly as typed
    assert_eq!(
        report,
        Report::ConfigUpdated {
            message: PASSWORD_SAVED_MESSAGE.to_string()
        }
    );
    let reloaded = AppConfig::load(dir.path()).unwrap();
    assert_eq!(
        reloaded.preferences.default_password().unwrap().expose(),
        "from-stdin"
    );
}

#[test]
fn given_empty_stdin_when_set_without_argument_then_rejected() {
    let dir = TempDir::new().unwrap();
    let mut context = context(&dir);

    let err = run(
        &mut context,
        ConfigAction::SetDefaultPassword { password: None },
        Cursor::new("\n"),
    )
    .unwrap_err();

    assert_eq!(err.message(), EMPTY_PASSWORD_MESSAGE);
    assert!(!AppConfig::file_path(dir.path()).exists());
}

/// **VALUE**: Verifies a failed save reports the location of the save call.
///
/// **WHY THIS MATTERS**: The error location is how a bug report gets traced back to the
/// failing step. `config_error` is `#[track_caller]` and only sees its caller through a
/// direct call inside a closure; passing it to `map_err` by name reports a location inside
/// the helper or the standard library instead.
///
/// **BUG THIS CATCHES**: Would catch the closure around `config_error` being "simplified" away.
#[test]
fn given_unwritable_config_dir_when_saving_then_error_points_at_config_command() {
    // GIVEN: A config dir path that is actually a regular file
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();
    let mut context = context(&dir);
    context.paths.config_dir = blocker;

    // WHEN: Saving a password
    let err = run(
        &mut context,
        ConfigAction::SetDefaultPassword {
            password: Some("s3cret".to_string()),
        },
        io::empty(),
    )
    .unwrap_err();

    // THEN: A config error located in the config command, not in the shared helper
    assert!(matches!(err, SecurePropsError::Config { .. }), "{err:?}");
    let json = serde_json::to_value(&err).unwrap();
    let file = json["data"]["location"]["file"].as_str().unwrap().to_string();
    assert!(file.ends_with("config.rs"), "{file}");
    assert!(!file.ends_with("mod.rs"), "{file}");
}
