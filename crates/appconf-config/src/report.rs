// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning issues and errors into text for users.

use std::path::Path;

use miette::{GraphicalReportHandler, GraphicalTheme};
use tracing::warn;

use crate::error::ConfigError;
use crate::issue::ValidationIssue;
use crate::paths::abbreviate;

/// One line per issue, grouped by kind and then ordered by line, each
/// prefixed with `path:line:`.
pub fn render_warnings(path: &Path, issues: &[ValidationIssue]) -> Vec<String> {
    let shown = abbreviate(path);
    sorted(issues)
        .into_iter()
        .map(|issue| format!("{shown}:{}: {issue}", issue.line()))
        .collect()
}

/// Emit every issue as a `warn!` event.
pub fn log_issues(path: &Path, issues: &[ValidationIssue]) {
    let shown = abbreviate(path);
    for issue in sorted(issues) {
        warn!(
            path = %shown,
            line = issue.line(),
            kind = issue.kind().heading(),
            "{issue}"
        );
    }
}

fn sorted(issues: &[ValidationIssue]) -> Vec<&ValidationIssue> {
    let mut sorted: Vec<&ValidationIssue> = issues.iter().collect();
    sorted.sort_by_key(|issue| (issue.kind(), issue.line()));
    sorted
}

/// Render a fatal error with miette's graphical handler, including the
/// offending source line for parse errors.
pub fn render_error(err: &ConfigError) -> String {
    render_error_with(
        err,
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor()),
    )
}

/// Like [`render_error`], with a caller-chosen handler (e.g. colored).
pub fn render_error_with(err: &ConfigError, handler: GraphicalReportHandler) -> String {
    let mut out = String::new();
    match handler.render_report(&mut out, err) {
        Ok(()) => out,
        Err(_) => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ConfigSpec, FieldSpec};
    use crate::store;

    fn issues() -> Vec<ValidationIssue> {
        vec![
            ValidationIssue::TypeMismatch {
                section: vec!["core".into()],
                key: "width".into(),
                raw_value: "wide".into(),
                expected: "integer".into(),
                line: 2,
            },
            ValidationIssue::UnknownKey {
                section: vec!["core".into()],
                key: "editr".into(),
                raw_value: "vim".into(),
                line: 5,
                suggestion: Some("editor".into()),
            },
        ]
    }

    #[test]
    fn warnings_are_grouped_by_kind() {
        let lines = render_warnings(Path::new("/srv/app.conf"), &issues());
        assert_eq!(
            lines,
            [
                "/srv/app.conf:5: unknown setting `core.editr`; did you mean `editor`?",
                "/srv/app.conf:2: `core.width` expected integer, found `wide`; using the default",
            ]
        );
    }

    #[test]
    fn no_issues_no_lines() {
        assert!(render_warnings(Path::new("a.conf"), &[]).is_empty());
    }

    #[test]
    #[tracing_test::traced_test]
    fn log_issues_warns_each_issue() {
        log_issues(Path::new("/srv/app.conf"), &issues());
        assert!(logs_contain("unknown setting `core.editr`"));
        assert!(logs_contain("expected integer"));
    }

    #[test]
    fn parse_error_render_names_file_and_cause() {
        let mut spec = ConfigSpec::new();
        spec.section("core").field(FieldSpec::string("editor", "vim"));
        let err = store::load_str("app.conf", "[core\n", &spec).unwrap_err();

        let rendered = render_error(&err);
        assert!(rendered.contains("app.conf"), "{rendered}");
        assert!(rendered.contains("brackets do not match"), "{rendered}");
    }
}
