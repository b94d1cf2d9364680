//! Ags4Cli against a shell stand-in for the real `ags4_cli`.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use agsval_core::{log_is_valid, OutcomeKind};
use agsval_tool::{Ags4Cli, Converter, ToolConfig, ToolInvoker, Validator};
use tempfile::{tempdir, TempDir};

const STUB: &str = r#"#!/bin/sh
case "$1" in
  check)
    read answer
    case "$2" in
      *slow*) sleep 5 ;;
      *crash*) echo "Traceback: KeyError 'PROJ'" >&2; exit 1 ;;
      *.ags) printf 'File Name: \t %s\n\nAll checks passed!\nrename answer: %s\n' "$(basename "$2")" "$answer" > "$4" ;;
      *) echo "ERROR: Only .ags files are accepted as input" ;;
    esac
    ;;
  convert)
    printf 'partial' > "$3"
    case "$2" in
      *crash*) echo "conversion failed" >&2; exit 2 ;;
      *) echo "Done." ;;
    esac
    ;;
esac
"#;

fn install_stub(dir: &Path) -> PathBuf {
    let path = dir.join("ags4_cli");
    std::fs::write(&path, STUB).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn setup(timeout_secs: u64) -> (TempDir, Ags4Cli) {
    let dir = tempdir().unwrap();
    let stub = install_stub(dir.path());
    let config = ToolConfig::default()
        .with_binary(stub.to_string_lossy())
        .with_timeout(timeout_secs);
    (dir, Ags4Cli::new(config))
}

fn input(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\"GROUP\",\"PROJ\"\n").unwrap();
    path
}

#[tokio::test]
async fn check_writes_log_and_answers_rename_prompt() {
    let (dir, cli) = setup(30);
    let file = input(dir.path(), "example1.ags");

    let report = Validator::new(cli).validate(&file).await.unwrap();

    assert!(report.starts_with("File Name: \t example1.ags"));
    assert!(report.contains("rename answer: n"));
    assert!(log_is_valid(&report));
}

#[tokio::test]
async fn check_rejects_other_extensions() {
    let (dir, cli) = setup(30);
    let file = input(dir.path(), "example1.xlsx");

    let detailed = Validator::new(cli).validate_detailed(&file).await.unwrap();

    assert_eq!(detailed.classification.kind, OutcomeKind::InputRejected);
    assert!(detailed
        .report
        .contains("ERROR: Only .ags files are accepted as input"));
}

#[tokio::test]
async fn check_crash_reports_stderr() {
    let (dir, cli) = setup(30);
    let file = input(dir.path(), "crash.ags");

    let outcome = cli.check(&file, &dir.path().join("out.log")).await;
    assert_eq!(outcome.exit_code, 1);
    assert!(outcome.stderr.contains("KeyError"));

    let report = Validator::new(cli).validate(&file).await.unwrap();
    assert!(report.contains("ERROR: Traceback: KeyError 'PROJ'"));
}

#[tokio::test]
async fn check_timeout_is_reported() {
    let (dir, cli) = setup(1);
    let file = input(dir.path(), "slow.ags");

    let detailed = Validator::new(cli).validate_detailed(&file).await.unwrap();

    assert_eq!(detailed.classification.kind, OutcomeKind::ToolInvocationFailure);
    assert!(detailed
        .report
        .contains("ERROR: ags4_cli check timed out after 1 seconds"));
}

#[tokio::test]
async fn convert_round_trip_through_stub() {
    let (dir, cli) = setup(30);
    let file = input(dir.path(), "example1.ags");
    let results = dir.path().join("results");

    let (output, report) = Converter::new(cli).convert(&file, &results).await.unwrap();

    assert_eq!(output, Some(results.join("example1.xlsx")));
    assert!(results.join("example1.xlsx").exists());
    assert!(report.ends_with("SUCCESS: example1.ags converted to example1.xlsx"));
}

#[tokio::test]
async fn convert_crash_deletes_partial_file() {
    let (dir, cli) = setup(30);
    let file = input(dir.path(), "crash.ags");
    let results = dir.path().join("results");

    let (output, report) = Converter::new(cli).convert(&file, &results).await.unwrap();

    assert!(output.is_none());
    assert!(!results.join("crash.xlsx").exists());
    assert!(report.contains("ERROR: conversion failed"));
}
