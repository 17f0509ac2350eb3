// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the config subcommands.

use std::fs;
use std::path::Path;

use appconf::settings;
use appconf::{run, CommandError, ConfigCommand, Outcome, OutputStyle};

fn run_to_string(command: ConfigCommand, path: &Path) -> (Result<Outcome, CommandError>, String) {
    let mut out = Vec::new();
    let result = run(&command, path, &settings::spec(), &mut out, OutputStyle::default());
    (result, String::from_utf8(out).unwrap())
}

/// `path` prints the resolved file path on its own line.
#[test]
fn path_prints_the_resolved_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appconf.conf");
    let (result, out) = run_to_string(ConfigCommand::Path { abbrev: false }, &path);
    assert_eq!(result.unwrap(), Outcome::Success);
    assert_eq!(out, format!("{}\n", path.display()));
}

/// Without a file, `show` prints every default.
#[test]
fn show_prints_defaults_without_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let (result, out) = run_to_string(ConfigCommand::Show, &dir.path().join("appconf.conf"));
    assert_eq!(result.unwrap(), Outcome::Success);
    assert_eq!(
        out,
        "[log]\nlevel = warn\n\n[display]\ncolor = true\nwidth = 50\n"
    );
}

/// `create` writes a commented file once; only `--force` replaces it, even a broken one.
#[test]
fn create_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appconf.conf");

    let (result, out) = run_to_string(ConfigCommand::Create { force: false }, &path);
    assert_eq!(result.unwrap(), Outcome::Success);
    assert!(out.starts_with("created "), "{out}");
    assert!(fs::read_to_string(&path).unwrap().contains("# Log level"));

    let (result, _) = run_to_string(ConfigCommand::Create { force: false }, &path);
    assert!(matches!(result, Err(CommandError::AlreadyExists(_))));

    fs::write(&path, "[log\n").unwrap();
    let (result, _) = run_to_string(ConfigCommand::Create { force: true }, &path);
    assert_eq!(result.unwrap(), Outcome::Success);
    assert!(fs::read_to_string(&path).unwrap().contains("[log]"));
}

/// A clean file gets a one-line `ok` report.
#[test]
fn check_reports_clean_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appconf.conf");
    fs::write(&path, "[log]\nlevel = info\n").unwrap();

    let (result, out) = run_to_string(ConfigCommand::Check, &path);
    assert_eq!(result.unwrap(), Outcome::Success);
    assert!(out.trim_end().ends_with(": ok"), "{out}");
}

/// Issues are listed under a rule, grouped by kind, and exit with 2.
#[test]
fn check_lists_issues_and_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appconf.conf");
    fs::write(&path, "[log]\nlevel = loud\n[dispaly]\ncolor = no\n").unwrap();

    let (result, out) = run_to_string(ConfigCommand::Check, &path);
    let outcome = result.unwrap();
    assert_eq!(outcome, Outcome::IssuesFound);
    assert_eq!(outcome.exit_code(), 2);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[1], "-".repeat(50));
    assert!(lines[2].contains(":3: unknown section `[dispaly]`; did you mean `display`?"), "{out}");
    assert!(lines[3].contains(":2: `log.level` expected one of: error, warn, info, debug, trace"), "{out}");
    assert_eq!(lines[4], "2 issues found");
}

/// Broken INI syntax is an error with exit code 1.
#[test]
fn parse_errors_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appconf.conf");
    fs::write(&path, "level = 'warn\n").unwrap();

    let (result, _) = run_to_string(ConfigCommand::Check, &path);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.render().contains("not valid INI"), "{}", err.render());
}

/// Only `show` and `check` print the file's problems themselves.
#[test]
fn show_and_check_report_issues_themselves() {
    assert!(ConfigCommand::Show.reports_issues());
    assert!(ConfigCommand::Check.reports_issues());
    assert!(!ConfigCommand::Path { abbrev: true }.reports_issues());
    assert!(!ConfigCommand::Create { force: false }.reports_issues());
}
