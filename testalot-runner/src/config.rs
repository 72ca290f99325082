// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for testalot.
//!
//! The configuration is layered: the embedded default config (see
//! [`TestalotConfig::DEFAULT_CONFIG`]) is read first, and the repository config at
//! `.config/testalot.toml` (or a file passed in explicitly) is layered on top of it.

use crate::errors::{ConfigParseError, ConfigParseErrorKind};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

/// Overall configuration for testalot.
#[derive(Clone, Debug)]
pub struct TestalotConfig {
    workspace_root: Utf8PathBuf,
    inner: TestalotConfigImpl,
}

impl TestalotConfig {
    /// The location of the repository config, relative to the workspace root.
    pub const CONFIG_PATH: &'static str = ".config/testalot.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Repository-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the testalot config from the given file, or if not specified from
    /// `.config/testalot.toml` in the workspace root.
    ///
    /// If the file isn't specified and the workspace root doesn't have `.config/testalot.toml`,
    /// uses the default config options.
    pub fn from_sources(
        workspace_root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let workspace_root = workspace_root.into();

        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = workspace_root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source);
        let inner = Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(&config_file, kind))?;

        Ok(Self {
            workspace_root,
            inner,
        })
    }

    /// Returns the default testalot config, rooted at the given directory.
    pub fn default_config(workspace_root: impl Into<Utf8PathBuf>) -> Self {
        let inner = Self::build_and_deserialize_config(&Self::make_default_config())
            .expect("default config is always valid");
        Self {
            workspace_root: workspace_root.into(),
            inner,
        }
    }

    /// Returns the workspace root.
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Returns the archive directory, resolved against the workspace root.
    pub fn archive_dir(&self) -> Utf8PathBuf {
        self.workspace_root.join(&self.inner.run.archive_dir)
    }

    /// Returns the configuration for `testalot run`.
    pub fn run_config(&self) -> RunConfig<'_> {
        RunConfig {
            workspace_root: &self.workspace_root,
            inner: &self.inner.run,
        }
    }

    // ---
    // Helper methods
    // ---

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<TestalotConfigImpl, ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;
        let inner: TestalotConfigImpl = config
            .try_deserialize()
            .map_err(|error| ConfigParseErrorKind::DeserializeError(Box::new(error)))?;

        if inner.run.command.is_empty() {
            return Err(ConfigParseErrorKind::EmptyCommand);
        }

        Ok(inner)
    }
}

/// Settings for repeatedly running the test command, with paths resolved against the workspace
/// root.
#[derive(Copy, Clone, Debug)]
pub struct RunConfig<'cfg> {
    workspace_root: &'cfg Utf8Path,
    inner: &'cfg RunConfigImpl,
}

impl<'cfg> RunConfig<'cfg> {
    /// Returns the directory the test command is run from.
    pub fn workspace_root(&self) -> &'cfg Utf8Path {
        self.workspace_root
    }

    /// Returns the program to run.
    pub fn program(&self) -> &'cfg str {
        // validated in build_and_deserialize_config
        &self.inner.command[0]
    }

    /// Returns the arguments to pass to the program.
    pub fn args(&self) -> &'cfg [String] {
        &self.inner.command[1..]
    }

    /// Returns the full command line joined by spaces, for display.
    pub fn command_str(&self) -> String {
        self.inner.command.join(" ")
    }

    /// Returns the path of the project marker file.
    pub fn project_marker(&self) -> Utf8PathBuf {
        self.workspace_root.join(&self.inner.project_marker)
    }

    /// Returns the directory the test command writes its reports to.
    pub fn reports_dir(&self) -> Utf8PathBuf {
        self.workspace_root.join(&self.inner.reports_dir)
    }

    /// Returns the directory that accumulates archived reports.
    pub fn archive_dir(&self) -> Utf8PathBuf {
        self.workspace_root.join(&self.inner.archive_dir)
    }

    /// Returns the prefix of each archived reports directory's name.
    pub fn archive_prefix(&self) -> &'cfg str {
        &self.inner.archive_prefix
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TestalotConfigImpl {
    run: RunConfigImpl,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RunConfigImpl {
    command: Vec<String>,
    project_marker: Utf8PathBuf,
    reports_dir: Utf8PathBuf,
    archive_dir: Utf8PathBuf,
    archive_prefix: String,
}
