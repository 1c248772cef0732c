use crate::command::{
    Algorithm, CommandArg, CommandBuilder, Mode, OperationKind, OperationRequest,
    escape_for_script, tool_args,
};
use crate::config::ToolConfig;
use crate::error::RequestError;

use common::RedactedPassword;

fn builder() -> CommandBuilder {
    CommandBuilder::new(ToolConfig::new("/home/user").unwrap())
}

fn pw() -> RedactedPassword {
    RedactedPassword::new("pw")
}

/// **VALUE**: Pins the exact tool parameter line for a plain AES encryption.
///
/// **WHY THIS MATTERS**: The tool parses arguments positionally. Any reordering silently
/// swaps password and input, or algorithm and mode.
///
/// **BUG THIS CATCHES**: Would catch argument reordering or a stray `true` flag.
#[test]
fn given_aes_encrypt_request_when_built_then_tool_line_matches_contract() {
    // GIVEN: Encrypt "hello" with AES/CBC, no random IV
    let request = OperationRequest::encrypt("hello")
        .with_algorithm(Algorithm::Aes)
        .with_mode(Mode::Cbc);

    // WHEN: Building the command
    let command = builder().build(&request, &pw());

    // THEN: Tool parameters match the contract exactly
    assert_eq!(command.tool_line(), r#"string encrypt AES CBC "pw" "hello""#);
}

/// **VALUE**: Verifies the `true` flag appears iff encrypting with a random IV.
///
/// **WHY THIS MATTERS**: The decrypt side has no IV flag; passing `true` there shifts the
/// password into the input slot.
///
/// **BUG THIS CATCHES**: Would catch the flag leaking into decrypt commands, or missing from
/// encrypt commands that asked for it.
#[test]
fn given_every_kind_and_iv_setting_when_built_then_true_only_for_encrypt_with_iv() {
    for kind in [OperationKind::Encrypt, OperationKind::Decrypt] {
        for use_random_iv in [false, true] {
            // GIVEN: A request of this kind/IV combination
            let request = OperationRequest::new(kind, "x").with_random_iv(use_random_iv);

            // WHEN: Building tool args
            let args = tool_args(&request, &pw());

            // THEN: `true` sits at index 4 only for encrypt + IV
            let has_flag = args.iter().any(|a| *a == CommandArg::Bare("true".to_string()));
            let expected = kind == OperationKind::Encrypt && use_random_iv;
            assert_eq!(has_flag, expected, "kind={kind}, iv={use_random_iv}");
            if expected {
                assert_eq!(args[4].value(), "true");
            }
        }
    }
}

/// **VALUE**: Verifies algorithm and mode land in positions 2 and 3 for every combination.
///
/// **WHY THIS MATTERS**: Users pick these from a fixed list; each pair must produce a
/// command the tool accepts.
///
/// **BUG THIS CATCHES**: Would catch a token spelled differently from the tool's names
/// (e.g. `DESEDE` instead of `DESede`).
#[test]
fn given_all_algorithms_and_modes_when_built_then_tokens_in_fixed_positions() {
    for algorithm in Algorithm::ALL {
        for mode in Mode::ALL {
            let request = OperationRequest::decrypt("x")
                .with_algorithm(algorithm)
                .with_mode(mode);

            let args = tool_args(&request, &pw());

            assert_eq!(args[0].value(), "string");
            assert_eq!(args[1].value(), "decrypt");
            assert_eq!(args[2].value(), algorithm.token());
            assert_eq!(args[3].value(), mode.token());
            assert_eq!(args.len(), 6);
        }
    }
}

#[test]
fn given_decrypt_request_when_built_then_full_command_has_launcher_prefix() {
    let request = OperationRequest::decrypt("XYZ123").with_algorithm(Algorithm::Blowfish);

    let command = builder().build(&request, &pw());

    assert_eq!(command.program(), "java");
    let expected_jar = std::path::Path::new("/home/user")
        .join("secure-properties-tool.jar")
        .display()
        .to_string();
    assert_eq!(
        command.command_line(),
        format!(
            r#"java -cp "{expected_jar}" com.mulesoft.tools.SecurePropertiesTool string decrypt Blowfish CBC "pw" "XYZ123""#
        )
    );
}

/// **VALUE**: Verifies the password never appears when a command is logged.
///
/// **WHY THIS MATTERS**: Dry-run plans and debug output print `{command}`, and either can
/// end up pasted into a ticket or a log file.
///
/// **BUG THIS CATCHES**: Would catch Display or Debug rendering `Secret` args revealed.
#[test]
fn given_command_when_displayed_then_password_is_redacted() {
    let request = OperationRequest::encrypt("hello");
    let command = builder().build(&request, &RedactedPassword::new("s3cret-pw"));

    let display = command.to_string();
    let debug = format!("{command:?}");

    assert!(!display.contains("s3cret-pw"), "{display}");
    assert!(!debug.contains("s3cret-pw"), "{debug}");
    assert!(display.contains("[REDACTED]"));
    assert!(command.command_line().contains("s3cret-pw"));
}

/// **VALUE**: Verifies the line the runner logs carries neither the input nor the password.
///
/// **WHY THIS MATTERS**: Every run is logged at info level to a file on disk. The input of an
/// encryption is the plaintext secret itself.
///
/// **BUG THIS CATCHES**: Would catch the runner going back to logging the rendered command,
/// whose `Quoted` input argument is not redacted.
#[test]
fn given_encrypt_command_when_summarized_then_input_and_password_are_absent() {
    // GIVEN: An encryption of a plaintext secret
    let request = OperationRequest::encrypt("db-secret-plaintext");
    let command = builder().build(&request, &RedactedPassword::new("s3cret-pw"));

    // WHEN: Summarizing for the run log
    let summary = command.summary();

    // THEN: Only the program and argument count remain
    assert!(!summary.contains("db-secret-plaintext"), "{summary}");
    assert!(!summary.contains("s3cret-pw"), "{summary}");
    assert_eq!(summary, format!("java ({} arguments)", command.args().count()));
}

#[test]
fn given_request_password_when_built_then_resolved_password_is_used() {
    // The builder takes the resolved password; the request's own field is ignored.
    let request = OperationRequest::encrypt("hello").with_password("from-request");

    let command = builder().build(&request, &RedactedPassword::new("resolved"));

    assert!(command.tool_line().contains(r#""resolved""#));
    assert!(!command.tool_line().contains("from-request"));
}

/// **VALUE**: Verifies membership validation when parsing user-supplied names.
///
/// **WHY THIS MATTERS**: The library can be driven from strings (CLI, config); an unknown
/// algorithm must be rejected before it reaches the tool.
///
/// **BUG THIS CATCHES**: Would catch a permissive parser passing unknown names through.
#[test]
fn given_algorithm_and_mode_strings_when_parsed_then_only_members_accepted() {
    assert_eq!("AES".parse::<Algorithm>().unwrap(), Algorithm::Aes);
    assert_eq!("desede".parse::<Algorithm>().unwrap(), Algorithm::DesEde);
    assert_eq!("ofb".parse::<Mode>().unwrap(), Mode::Ofb);
    assert_eq!("Decrypt".parse::<OperationKind>().unwrap(), OperationKind::Decrypt);

    let err = "Twofish".parse::<Algorithm>().unwrap_err();
    assert!(matches!(err, RequestError::UnknownAlgorithm { .. }));
    assert!(err.to_string().contains("DESede"), "Should list valid names: {err}");

    assert!(matches!(
        "GCM".parse::<Mode>().unwrap_err(),
        RequestError::UnknownMode { .. }
    ));
    assert!(matches!(
        "sign".parse::<OperationKind>().unwrap_err(),
        RequestError::UnknownOperation { .. }
    ));
}

#[test]
fn given_new_request_when_defaults_inspected_then_match_form_defaults() {
    let request = OperationRequest::decrypt("x");

    assert_eq!(request.algorithm, Algorithm::Blowfish);
    assert_eq!(request.mode, Mode::Cbc);
    assert!(!request.use_random_iv);
    assert!(request.strip_wrapper);
    assert!(request.password.is_none());
    assert!(OperationRequest::encrypt("x").with_password("").password.is_none());
}

#[test]
fn given_labels_when_listed_then_docs_defaults_are_marked() {
    assert_eq!(Algorithm::Aes.label(), "AES (default in docs)");
    assert_eq!(Algorithm::Rc2.label(), "RC2");
    assert_eq!(Mode::Cbc.label(), "CBC (default)");
    assert_eq!(Mode::Ecb.label(), "ECB");
}

/// **VALUE**: Verifies the legacy script-escaping rule.
///
/// **WHY THIS MATTERS**: Anyone embedding a rendered command inside another double-quoted
/// layer must escape quotes, backslashes and newlines across the whole line, not just the
/// password and input.
///
/// **BUG THIS CATCHES**: Would catch escaping backslashes after quotes (double-escaping the
/// inserted backslashes) or missing newlines.
#[test]
fn given_command_line_with_specials_when_escaped_then_each_is_prefixed_once() {
    let line = "cd \"/home/u\" && java \"a\\b\"\nnext";

    let escaped = escape_for_script(line);

    assert_eq!(escaped, "cd \\\"/home/u\\\" && java \\\"a\\\\b\\\"\\\nnext");
    assert_eq!(escape_for_script("plain"), "plain");
}
