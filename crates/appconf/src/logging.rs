// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Level used when neither the command line nor the config file sets one.
pub const DEFAULT_LEVEL: &str = "warn";

/// The command-line level wins over the configured one.
pub fn select_level<'a>(cli: Option<&'a str>, configured: Option<&'a str>) -> &'a str {
    cli.or(configured).unwrap_or(DEFAULT_LEVEL)
}

/// Our crates log at `level`, everything else at `warn`.
pub fn filter_directive(level: &str) -> String {
    format!("appconf={level},appconf_config={level},appconf_ini={level},warn")
}

/// Install a stderr subscriber. `RUST_LOG`, when set, replaces `level`.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
