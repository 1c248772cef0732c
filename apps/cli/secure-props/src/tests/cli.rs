use crate::cli::{Cli, Commands, ConfigAction};

use props_core::command::{Algorithm, Mode};

use std::path::PathBuf;

use clap::CommandFactory;
use clap::Parser;
use clap::error::ErrorKind;

#[test]
fn given_cli_definition_when_asserted_then_is_consistent() {
    Cli::command().debug_assert();
}

/// **VALUE**: Verifies omitted flags fall back to the tool defaults.
///
/// **WHY THIS MATTERS**: Values encrypted with one algorithm/mode can only be decrypted
/// with the same pair. A silently changed default breaks every existing property file.
///
/// **BUG THIS CATCHES**: Would catch a changed `default_value` on `--algorithm`/`--mode`.
#[test]
fn given_bare_encrypt_when_parsed_then_uses_blowfish_cbc() {
    // GIVEN/WHEN: Parsing an encrypt with only the text
    let cli = Cli::try_parse_from(["secure-props", "encrypt", "hello"]).unwrap();

    // THEN: Defaults are Blowfish/CBC with no IV, clipboard output
    match cli.command {
        Commands::Encrypt { args, random_iv } => {
            assert_eq!(args.text.as_deref(), Some("hello"));
            assert_eq!(args.algorithm, Algorithm::Blowfish);
            assert_eq!(args.mode, Mode::Cbc);
            assert!(args.password.is_none());
            assert!(!args.print);
            assert!(!args.dry_run);
            assert!(!random_iv);
        }
        other => panic!("expected encrypt, got {other:?}"),
    }
}

#[test]
fn given_lowercase_algorithm_when_parsed_then_maps_to_canonical_token() {
    let cli = Cli::try_parse_from([
        "secure-props",
        "decrypt",
        "--algorithm",
        "desede",
        "--mode",
        "ofb",
        "--keep-wrapper",
        "![abc]",
    ])
    .unwrap();

    match cli.command {
        Commands::Decrypt { args, keep_wrapper } => {
            assert_eq!(args.algorithm, Algorithm::DesEde);
            assert_eq!(args.algorithm.token(), "DESede");
            assert_eq!(args.mode, Mode::Ofb);
            assert!(keep_wrapper);
        }
        other => panic!("expected decrypt, got {other:?}"),
    }
}

/// **VALUE**: Verifies unknown algorithms are rejected as usage errors.
///
/// **WHY THIS MATTERS**: The tool would otherwise fail with an opaque Java exception
/// after the JAR download.
///
/// **BUG THIS CATCHES**: Would catch the value parser accepting arbitrary strings.
#[test]
fn given_unknown_algorithm_when_parsed_then_value_validation_error() {
    let err = Cli::try_parse_from(["secure-props", "encrypt", "-a", "ROT13", "x"]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValueValidation);
    assert!(err.to_string().contains("ROT13"));
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_applied() {
    let cli = Cli::try_parse_from([
        "secure-props",
        "config",
        "show",
        "-vv",
        "--json",
        "--config-dir",
        "/tmp/sp",
    ])
    .unwrap();

    assert_eq!(cli.verbose, 2);
    assert!(cli.json);
    assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/sp")));
    assert!(matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::Show
        }
    ));
}

#[test]
fn given_set_default_password_when_parsed_then_password_captured() {
    let cli =
        Cli::try_parse_from(["secure-props", "config", "set-default-password", "s3cret"]).unwrap();

    match cli.command {
        Commands::Config {
            action: ConfigAction::SetDefaultPassword { password },
        } => assert_eq!(password.as_deref(), Some("s3cret")),
        other => panic!("expected set-default-password, got {other:?}"),
    }
}

/// **VALUE**: Verifies the password argument is optional.
///
/// **WHY THIS MATTERS**: A password typed on the command line lands in shell history. Leaving
/// it out is how the user asks for it to be read from stdin instead.
///
/// **BUG THIS CATCHES**: Would catch the argument becoming required again.
#[test]
fn given_set_default_password_without_value_when_parsed_then_password_is_none() {
    // WHEN: Parsing without a positional password
    let cli = Cli::try_parse_from(["secure-props", "config", "set-default-password"]).unwrap();

    // THEN: The password is left for stdin
    assert!(matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::SetDefaultPassword { password: None }
        }
    ));
}

#[test]
fn given_random_iv_on_decrypt_when_parsed_then_rejected() {
    let err = Cli::try_parse_from(["secure-props", "decrypt", "--random-iv", "x"]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
}
