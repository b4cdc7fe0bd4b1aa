//! Tool handler tests against a shell stand-in for the dialog
//!
//! The launcher appends `--prompt=P --output-file=F --predefined-options=O`.
//! The preamble in `sh_launcher` strips the flags into `$prompt`, `$out` and
//! `$opts`.
#![cfg(unix)]

use std::path::{Path, PathBuf};

use interactive_feedback::feedback::DEFAULT_OPTIONS;
use interactive_feedback::{DialogLauncher, FeedbackError};

/// Launcher running `script` with `sh`, recording the result path to `record`
fn sh_launcher(script: &str, record: &Path) -> DialogLauncher {
    let script = format!(
        r#"prompt="${{1#--prompt=}}"
out="${{2#--output-file=}}"
opts="${{3#--predefined-options=}}"
printf '%s' "$out" > '{}'
{}"#,
        record.display(),
        script
    );
    DialogLauncher::new("sh").with_leading_args(["-c".to_string(), script, "sh".to_string()])
}

fn recorded_path(record: &Path) -> PathBuf {
    let path = std::fs::read_to_string(record).expect("dialog did not record its output file");
    PathBuf::from(path)
}

#[test]
fn test_feedback_round_trip_through_dialog() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record");
    let launcher = sh_launcher(
        r#"printf '{"interactive_feedback":"%s","image_paths":[]}' "$opts" > "$out""#,
        &record,
    );

    let response = launcher
        .interactive_feedback("Done?", Some(vec!["Looks good".into(), "Needs fix".into()]))
        .unwrap();

    assert_eq!(response.interactive_feedback, "Looks good|||Needs fix");
    assert!(response.images.is_none());
    assert!(!recorded_path(&record).exists(), "result file must be removed");
}

#[test]
fn test_missing_options_send_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record");
    let launcher = sh_launcher(
        r#"printf '{"interactive_feedback":"%s"}' "$opts" > "$out""#,
        &record,
    );

    let response = launcher.interactive_feedback("Done?", None).unwrap();
    assert_eq!(response.interactive_feedback, DEFAULT_OPTIONS.join("|||"));
}

#[test]
fn test_prompt_is_passed_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record");
    let launcher = sh_launcher(
        r#"[ "$prompt" = "Two words" ] || exit 9
printf '{"interactive_feedback":"ok","image_paths":[]}' > "$out""#,
        &record,
    );

    let response = launcher.interactive_feedback("Two words", None).unwrap();
    assert_eq!(response.interactive_feedback, "ok");
}

#[test]
fn test_markdown_list_prompt_reaches_dialog() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record");
    let seen = dir.path().join("seen");
    let script = format!(
        r#"printf '%s' "$prompt" > '{}'
printf '{{"interactive_feedback":"ok","image_paths":[]}}' > "$out""#,
        seen.display()
    );
    let launcher = sh_launcher(&script, &record);

    let response = launcher
        .interactive_feedback("- Added X\n- Fixed Y", Some(vec!["-1 tests fail".into()]))
        .unwrap();
    assert_eq!(response.interactive_feedback, "ok");
    assert_eq!(std::fs::read_to_string(&seen).unwrap(), "- Added X\n- Fixed Y");
}

#[test]
fn test_nonzero_exit_is_an_error_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record");
    let launcher = sh_launcher("exit 3", &record);

    let err = launcher.interactive_feedback("Done?", None).unwrap_err();
    assert!(matches!(err, FeedbackError::UiExit(3)), "got {err:?}");
    assert!(!recorded_path(&record).exists());
}

#[test]
fn test_invalid_result_is_an_error_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record");
    let launcher = sh_launcher(r#"printf 'not json' > "$out""#, &record);

    let err = launcher.interactive_feedback("Done?", None).unwrap_err();
    assert!(matches!(err, FeedbackError::ResultParse(_)), "got {err:?}");
    assert!(!recorded_path(&record).exists());
}

#[test]
fn test_untouched_result_file_is_a_parse_error() {
    // The dialog exited cleanly without writing anything
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record");
    let launcher = sh_launcher("true", &record);

    let err = launcher.interactive_feedback("Done?", None).unwrap_err();
    assert!(matches!(err, FeedbackError::ResultParse(_)), "got {err:?}");
    assert!(!recorded_path(&record).exists());
}

#[test]
fn test_one_valid_one_missing_image() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record");
    let present = dir.path().join("pasted_image_20240101_120000_abcd1234.png");
    std::fs::write(&present, b"\x89PNG\r\n\x1a\n").unwrap();
    let missing = dir.path().join("deleted.png");

    let script = format!(
        r#"printf '{{"interactive_feedback":"see image","image_paths":["{}","{}"]}}' > "$out""#,
        present.display(),
        missing.display()
    );
    let launcher = sh_launcher(&script, &record);

    let response = launcher.interactive_feedback("Done?", None).unwrap();
    assert_eq!(response.interactive_feedback, "see image");

    let images = response.images.expect("one image should be returned");
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].filename, "pasted_image_20240101_120000_abcd1234.png");
    assert_eq!(images[0].path, present.to_string_lossy());
    assert_eq!(images[0].mime_type(), "image/png");
    assert!(!recorded_path(&record).exists());
}

#[test]
fn test_closed_dialog_yields_empty_feedback() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record");
    let launcher = sh_launcher(
        r#"printf '{"interactive_feedback":"","image_paths":[]}' > "$out""#,
        &record,
    );

    let response = launcher.interactive_feedback("Done?", None).unwrap();
    assert_eq!(response.interactive_feedback, "");
    assert!(response.images.is_none());
}
