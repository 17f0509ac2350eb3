// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Where an application's config file lives.
//!
//! Resolution order:
//! 1. An explicit override path
//! 2. Portable mode: next to the running executable
//! 3. The per-user config directory (`dirs::config_dir()`), e.g.
//!    `~/.config/<app>/<app>.conf` on Linux
//!
//! When the platform reports no config directory, `~/.config` and then the
//! current directory are used instead. Resolution never fails and never
//! touches the filesystem beyond asking where the executable is.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Builder describing how to locate one application's config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    app_name: String,
    author: Option<String>,
    version: Option<String>,
    file_name: Option<String>,
    override_path: Option<PathBuf>,
    portable: bool,
}

impl ConfigLocation {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            author: None,
            version: None,
            file_name: None,
            override_path: None,
            portable: false,
        }
    }

    /// Vendor directory inserted above the app directory. Only used on
    /// Windows, where `%APPDATA%\<author>\<app>` is the convention.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Adds a version directory below the app directory.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// File name inside the config directory. Defaults to `<app>.conf`.
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Use this exact path and skip all other resolution.
    pub fn override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn portable(mut self, portable: bool) -> Self {
        self.portable = portable;
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn config_file_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("{}.conf", self.app_name))
    }

    /// The full path of the config file. The file and its directory need
    /// not exist.
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.override_path {
            debug!(path = %path.display(), "using config path override");
            return path.clone();
        }

        if self.portable {
            if let Some(dir) = executable_dir() {
                let path = dir.join(self.config_file_name());
                debug!(path = %path.display(), "using portable config path");
                return path;
            }
            debug!("executable directory unknown, falling back to user config dir");
        }

        let path = self.compose(&user_config_base(), cfg!(windows));
        debug!(path = %path.display(), "resolved user config path");
        path
    }

    /// `<base>[/<author>]/<app>[/<version>]/<file>`.
    fn compose(&self, base: &Path, include_author: bool) -> PathBuf {
        let mut path = base.to_path_buf();
        if include_author {
            if let Some(author) = &self.author {
                path.push(author);
            }
        }
        path.push(&self.app_name);
        if let Some(version) = &self.version {
            path.push(version);
        }
        path.push(self.config_file_name());
        path
    }
}

fn user_config_base() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        return dir;
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".config");
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn executable_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// `path` for display, with the home directory shown as `~`.
pub fn abbreviate(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => abbreviate_with_home(path, &home),
        None => path.display().to_string(),
    }
}

/// Like [`abbreviate`], against an explicit home directory.
pub fn abbreviate_with_home(path: &Path, home: &Path) -> String {
    if home.as_os_str().is_empty() {
        return path.display().to_string();
    }
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~{}{}", std::path::MAIN_SEPARATOR, rest.display()),
        Err(_) => path.display().to_string(),
    }
}
