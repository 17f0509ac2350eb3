// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The binary's own settings, stored in `appconf.conf`.

use std::io::{self, Write};
use std::path::Path;

use appconf_config::{
    report, ConfigError, ConfigObject, ConfigSpec, FieldSpec, LoadOutcome, Validator,
};

use crate::logging::DEFAULT_LEVEL;

pub const APP_NAME: &str = "appconf";

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Declared settings of the `appconf` binary.
pub fn spec() -> ConfigSpec {
    let mut spec = ConfigSpec::new();
    spec.section("log").field(
        FieldSpec::string("level", DEFAULT_LEVEL)
            .with_doc("Log level: error, warn, info, debug or trace.\nRUST_LOG and --log-level take precedence.")
            .with_validator(Validator::one_of(LEVELS)),
    );
    spec.section("display")
        .field(
            FieldSpec::boolean("color", true)
                .with_doc("Colorize `check` output when stdout is a terminal."),
        )
        .field(
            FieldSpec::integer("width", 50)
                .with_doc("Width of the rule under the `check` heading.")
                .with_validator(Validator::range(10, 200)),
        );
    spec
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_level: String,
    pub color: bool,
    pub width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&appconf_config::store::defaults(&spec()))
    }
}

impl Settings {
    /// Read typed settings from a config loaded against [`spec`].
    pub fn from_config(config: &ConfigObject) -> Self {
        let log_level = config
            .get("log", "level")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_LEVEL)
            .to_string();
        let color = config
            .get("display", "color")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        let width = config
            .get("display", "width")
            .and_then(|v| v.as_integer())
            .and_then(|w| usize::try_from(w).ok())
            .unwrap_or(50);
        Self {
            log_level,
            color,
            width,
        }
    }
}

/// Read the binary's settings from `path`. The load result comes back
/// alongside so [`report_load`] can describe it once logging is set up.
/// A file that cannot be used yields the defaults, which keeps
/// `create --force` able to repair it.
pub fn load(path: &Path, spec: &ConfigSpec) -> (Settings, Result<LoadOutcome, ConfigError>) {
    let loaded = appconf_config::load(path, spec);
    let settings = match &loaded {
        Ok(outcome) => Settings::from_config(&outcome.config),
        Err(_) => Settings::default(),
    };
    (settings, loaded)
}

/// Report problems with the binary's own config file: issues are logged
/// as warnings, a fatal error is rendered to `err`.
pub fn report_load(
    path: &Path,
    loaded: &Result<LoadOutcome, ConfigError>,
    err: &mut impl Write,
) -> io::Result<()> {
    match loaded {
        Ok(outcome) => {
            report::log_issues(path, &outcome.issues);
            Ok(())
        }
        Err(error) => {
            writeln!(err, "warning: using default settings")?;
            writeln!(err, "{}", report::render_error(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "warn");
        assert!(settings.color);
        assert_eq!(settings.width, 50);
    }

    #[test]
    fn invalid_level_falls_back() {
        let outcome =
            appconf_config::load_str("appconf.conf", "[log]\nlevel = loud\n", &spec()).unwrap();
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(Settings::from_config(&outcome.config).log_level, "warn");
    }

    #[test]
    fn file_values_are_used() {
        let outcome = appconf_config::load_str(
            "appconf.conf",
            "[log]\nlevel = debug\n[display]\ncolor = no\nwidth = 72\n",
            &spec(),
        )
        .unwrap();
        assert!(outcome.is_clean());
        assert_eq!(
            Settings::from_config(&outcome.config),
            Settings {
                log_level: "debug".into(),
                color: false,
                width: 72,
            }
        );
    }

    #[test]
    fn broken_file_falls_back_and_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appconf.conf");
        std::fs::write(&path, "[log\n").unwrap();

        let (settings, loaded) = load(&path, &spec());
        assert_eq!(settings, Settings::default());
        let mut err = Vec::new();
        report_load(&path, &loaded, &mut err).unwrap();
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("warning: using default settings\n"), "{err}");
        assert!(err.contains("not valid INI"), "{err}");
    }

    #[test]
    fn issues_in_own_file_are_kept_for_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appconf.conf");
        std::fs::write(&path, "[log]\nlevel = loud\n").unwrap();

        let (settings, loaded) = load(&path, &spec());
        assert_eq!(settings.log_level, "warn");
        assert_eq!(loaded.as_ref().unwrap().issues.len(), 1);
        let mut err = Vec::new();
        report_load(&path, &loaded, &mut err).unwrap();
        assert!(err.is_empty());
    }
}
