//! Tests for the rmx-tsv binary

#[path = "common/mod.rs"]
mod common;

use common::*;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn rmx_tsv(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rmx-tsv"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// Runs the binary from `dir`, so relative file names resolve inside it.
fn rmx_tsv_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rmx-tsv"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// Asserts that `name` was taken as the input file: it does not exist, so the
/// run ends with the open diagnostic and the compatibility exit status.
fn assert_treated_as_missing_file(name: &str) {
    let temp_dir = TempDir::new().unwrap();
    let output = rmx_tsv_in(temp_dir.path(), &[name]);

    assert_eq!(output.status.code(), Some(0), "argument {name}");
    let err = stderr(&output);
    assert!(err.contains("Can't open XML file"), "argument {name}: {err}");
    assert!(err.contains(name), "argument {name}: {err}");
    assert!(stdout(&output).is_empty(), "argument {name}");
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_converts_report_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let xml_path = temp_dir.path().join("report.xml");
    create_test_xml_file(&xml_path, SAMPLE_REPORT.as_bytes());

    let output = rmx_tsv(&[xml_path.as_os_str()]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), SAMPLE_REPORT_TSV);
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_malformed_report_exits_zero_with_diagnostic() {
    let temp_dir = TempDir::new().unwrap();
    let xml_path = temp_dir.path().join("truncated.xml");
    create_test_xml_file(&xml_path, TRUNCATED_REPORT.as_bytes());

    let output = rmx_tsv(&[xml_path.as_os_str()]);

    assert_eq!(output.status.code(), Some(0));
    let err = stderr(&output);
    assert!(err.starts_with("ERROR:"));
    assert!(err.contains("truncated.xml"));
    assert!(stdout(&output).starts_with("Id\t\n1\t\n"));
}

#[test]
fn test_missing_file_exits_zero_with_diagnostic() {
    let temp_dir = TempDir::new().unwrap();
    let xml_path = temp_dir.path().join("absent.xml");

    let output = rmx_tsv(&[xml_path.as_os_str()]);

    assert_eq!(output.status.code(), Some(0));
    let err = stderr(&output);
    assert!(err.contains("Can't open XML file"));
    assert!(err.contains("absent.xml"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_no_arguments_prints_usage() {
    let output = rmx_tsv(&[]);

    assert_eq!(output.status.code(), Some(255));
    assert!(stdout(&output).starts_with("Expecting name of file"));
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_two_arguments_prints_usage_without_reading() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("one.xml");
    let second = temp_dir.path().join("two.xml");
    create_test_xml_file(&first, SAMPLE_REPORT.as_bytes());
    create_test_xml_file(&second, SAMPLE_REPORT.as_bytes());

    let output = rmx_tsv(&[first.as_os_str(), second.as_os_str()]);

    assert_eq!(output.status.code(), Some(255));
    let out = stdout(&output);
    assert!(out.starts_with("Expecting name of file"));
    assert!(!out.contains("Id\tName\tCity\t"));
    assert!(!out.contains("Zürich"));
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_help_flag_is_a_file_name() {
    assert_treated_as_missing_file("--help");
}

#[test]
fn test_version_flag_is_a_file_name() {
    assert_treated_as_missing_file("-V");
}

#[test]
fn test_unknown_option_is_a_file_name() {
    assert_treated_as_missing_file("-x");
}

#[test]
fn test_hyphenated_file_is_converted() {
    let temp_dir = TempDir::new().unwrap();
    create_test_xml_file(&temp_dir.path().join("-report.xml"), SAMPLE_REPORT.as_bytes());

    let output = rmx_tsv_in(temp_dir.path(), &["-report.xml"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), SAMPLE_REPORT_TSV);
}

#[test]
fn test_separator_and_file_prints_usage() {
    let temp_dir = TempDir::new().unwrap();
    create_test_xml_file(&temp_dir.path().join("x.xml"), SAMPLE_REPORT.as_bytes());

    let output = rmx_tsv_in(temp_dir.path(), &["--", "x.xml"]);

    assert_eq!(output.status.code(), Some(255));
    assert!(stdout(&output).starts_with("Expecting name of file"));
    assert!(!stdout(&output).contains("Zürich"));
}
