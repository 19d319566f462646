use test_case::test_case;

use crate::spantab;
use crate::stderr;
use crate::stdout;

#[test]
fn malformed_input_fails_with_empty_stdout() {
    let output = spantab(&[], &[], "zzz\n");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("cannot parse input line 1"));
}

#[test_case(""; "empty input")]
#[test_case("61..7A\n41..5A\n"; "unsorted input")]
#[test_case("5A..41\n"; "inverted range")]
fn bad_input_fails_with_empty_stdout(input: &str) {
    let output = spantab(&[], &[], input);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn infeasible_catalog_fails() {
    let output = spantab(&["-f", "16x16"], &[], "0..1FFFF\n");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("no table format can encode interval 0"));
}

#[test]
fn capacity_flag_is_enforced() {
    let output = spantab(&["--max-intervals", "1"], &[], "41..5A\n61..7A\n");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("more than 1 intervals"));
}

#[test]
fn capacity_from_environment_is_enforced() {
    let output = spantab(&[], &[("SPANTAB_MAX_INTERVALS", "1")], "41..5A\n61..7A\n");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn capacity_flag_overrides_environment() {
    let output = spantab(
        &["--max-intervals", "2"],
        &[("SPANTAB_MAX_INTERVALS", "1")],
        "41..5A\n61..7A\n",
    );

    assert!(output.status.success(), "{}", stderr(&output));
}

#[test_case(&["-f", "16"]; "incomplete format")]
#[test_case(&["-f", "0x8"]; "zero width")]
#[test_case(&["--max-intervals", "0"]; "zero capacity")]
#[test_case(&["-o", "xml"]; "unknown log format")]
fn invalid_arguments_are_rejected(args: &[&str]) {
    let output = spantab(args, &[], "41\n");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn duplicate_formats_are_rejected() {
    let output = spantab(&["-f", "16x16", "-f", "16x16"], &[], "41\n");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("more than once"));
}

#[test]
fn missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let output = spantab(&[path.to_str().unwrap()], &[], "");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn diagnostics_go_to_stderr() {
    let output = spantab(&[], &[], "41..5A\n61..7A\n");

    assert!(output.status.success());
    assert!(!stdout(&output).contains("loaded intervals"));
    assert!(stderr(&output).contains("loaded intervals"));
}
