// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! appconf - inspect and manage an INI config file.
//!
//! The binary manages its own `appconf.conf`. Its `[log]` and `[display]`
//! settings control the binary itself.

use std::io::IsTerminal;
use std::path::PathBuf;

use appconf::settings::{self, APP_NAME};
use appconf::{logging, ConfigCommand, OutputStyle};
use appconf_config::ConfigLocation;
use clap::Parser;

/// appconf - inspect and manage an INI config file.
#[derive(Parser, Debug)]
#[command(name = "appconf", version, about, long_about = None)]
struct Cli {
    /// Use this config file instead of the per-user one.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep the config file next to the executable.
    #[arg(long, global = true)]
    portable: bool,

    /// error, warn, info, debug or trace. RUST_LOG takes precedence.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: ConfigCommand,
}

impl Cli {
    fn location(&self) -> ConfigLocation {
        let location = ConfigLocation::new(APP_NAME).portable(self.portable);
        match &self.config {
            Some(path) => location.override_path(path),
            None => location,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let path = cli.location().resolve();
    let spec = settings::spec();

    let (settings, loaded) = settings::load(&path, &spec);
    logging::init_tracing(logging::select_level(
        cli.log_level.as_deref(),
        Some(settings.log_level.as_str()),
    ));
    // `show` and `check` report the same file themselves.
    if !cli.command.reports_issues() {
        let _ = settings::report_load(&path, &loaded, &mut std::io::stderr());
    }

    let style = OutputStyle {
        color: settings.color && std::io::stdout().is_terminal(),
        width: settings.width,
    };
    let result = appconf::run(
        &cli.command,
        &path,
        &spec,
        &mut std::io::stdout().lock(),
        style,
    );
    let code = match result {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("{}", err.render());
            err.exit_code()
        }
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "appconf",
            "check",
            "--config",
            "/tmp/x.conf",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.command, ConfigCommand::Check);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.location().resolve(), PathBuf::from("/tmp/x.conf"));
    }

    #[test]
    fn create_accepts_force() {
        let cli = Cli::try_parse_from(["appconf", "create", "--force"]).unwrap();
        assert_eq!(cli.command, ConfigCommand::Create { force: true });
    }
}
