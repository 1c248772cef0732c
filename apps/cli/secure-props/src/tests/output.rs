use crate::commands::Report;
use crate::commands::fetch::FetchReport;
use crate::commands::list;
use crate::commands::operation::{OperationReport, PlanReport};
use crate::error::SecurePropsError;
use crate::output::{
    DECRYPT_SUCCESS_MESSAGE, ENCRYPT_SUCCESS_MESSAGE, JAR_DOWNLOADED_MESSAGE, render_error_text,
    render_json, render_text,
};

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

fn operation_report(operation: &'static str, copied: bool) -> OperationReport {
    OperationReport {
        operation,
        output: "cipher==".to_string(),
        copied,
        clipboard_error: None,
        artifact_downloaded: false,
    }
}

/// **VALUE**: Verifies a copied result is announced on stderr and stdout stays empty.
///
/// **WHY THIS MATTERS**: Stdout is for data. Printing the status there would break
/// `secure-props encrypt x --print | ...` style pipelines and mixing both is confusing.
///
/// **BUG THIS CATCHES**: Would catch status lines leaking to stdout.
#[test]
fn given_copied_encrypt_when_rendered_then_status_on_stderr_only() {
    // GIVEN: A successful encrypt that was copied
    let report = Report::Operation(operation_report("encrypt", true));

    // WHEN: Rendering as text
    let rendered = render_text(&report);

    // THEN: One success line on stderr, nothing on stdout
    assert!(rendered.stdout.is_empty());
    assert_eq!(
        rendered.stderr,
        vec![format!("{ENCRYPT_SUCCESS_MESSAGE} cipher==")]
    );
}

#[test]
fn given_first_run_decrypt_when_rendered_then_download_notice_precedes_success() {
    let mut report = operation_report("decrypt", true);
    report.artifact_downloaded = true;

    let rendered = render_text(&Report::Operation(report));

    assert_eq!(
        rendered.stderr,
        vec![
            JAR_DOWNLOADED_MESSAGE.to_string(),
            format!("{DECRYPT_SUCCESS_MESSAGE} cipher=="),
        ]
    );
}

#[test]
fn given_print_mode_when_rendered_then_output_on_stdout() {
    let rendered = render_text(&Report::Operation(operation_report("encrypt", false)));

    assert_eq!(rendered.stdout, vec!["cipher==".to_string()]);
    assert!(rendered.stderr.is_empty());
}

#[test]
fn given_clipboard_failure_when_rendered_then_output_still_printed() {
    let mut report = operation_report("encrypt", false);
    report.clipboard_error = Some("no display".to_string());

    let rendered = render_text(&Report::Operation(report));

    assert_eq!(rendered.stdout, vec!["cipher==".to_string()]);
    assert_eq!(rendered.stderr, vec!["Clipboard Error: no display".to_string()]);
}

#[test]
fn given_plan_when_rendered_then_command_on_stdout() {
    let report = Report::Plan(PlanReport {
        operation: "encrypt",
        command: r#"java -cp "/h/secure-properties-tool.jar" M string encrypt AES CBC "[REDACTED]" "x""#
            .to_string(),
    });

    let rendered = render_text(&report);

    assert_eq!(rendered.stdout.len(), 1);
    assert!(rendered.stdout[0].contains("[REDACTED]"));
}

#[test]
fn given_list_when_rendered_then_defaults_are_marked() {
    let rendered = render_text(&Report::List(list::run()));

    assert_eq!(rendered.stdout.first().map(String::as_str), Some("Algorithms:"));
    assert!(rendered.stdout.contains(&"* Blowfish".to_string()));
    assert!(rendered.stdout.contains(&"  AES (default in docs)".to_string()));
    assert!(rendered.stdout.contains(&"Modes:".to_string()));
    assert!(rendered.stdout.contains(&"* CBC (default)".to_string()));
    assert_eq!(rendered.stdout.len(), 2 + 6 + 4);
}

#[test]
fn given_fetch_of_present_jar_when_rendered_then_no_download_notice() {
    let report = Report::Fetch(FetchReport {
        path: PathBuf::from("/home/u/secure-properties-tool.jar"),
        downloaded: false,
        bytes: None,
    });

    let rendered = render_text(&report);

    assert_eq!(
        rendered.stdout,
        vec!["/home/u/secure-properties-tool.jar".to_string()]
    );
    assert!(!rendered.stderr.contains(&JAR_DOWNLOADED_MESSAGE.to_string()));
}

/// **VALUE**: Verifies JSON reports carry a `kind` tag and the report fields.
///
/// **WHY THIS MATTERS**: `--json` output is the scripting contract.
///
/// **BUG THIS CATCHES**: Would catch the tag attribute being dropped from `Report`.
#[test]
fn given_operation_report_when_rendered_as_json_then_tagged() {
    let rendered = render_json(&Report::Operation(operation_report("encrypt", true))).unwrap();

    let value: serde_json::Value = serde_json::from_str(&rendered.stdout[0]).unwrap();
    assert_eq!(value["kind"], "operation");
    assert_eq!(value["operation"], "encrypt");
    assert_eq!(value["output"], "cipher==");
    assert_eq!(value["copied"], true);
    assert!(value.get("clipboard_error").is_none());
}

#[test]
fn given_error_when_rendered_as_text_then_title_and_message() {
    let err = SecurePropsError::Operation {
        title: "Encryption Error".to_string(),
        message: "Something\nOriginal Error: raw".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    let rendered = render_error_text(&err);

    assert!(rendered.stdout.is_empty());
    assert_eq!(
        rendered.stderr,
        vec!["Encryption Error: Something\nOriginal Error: raw".to_string()]
    );
}
