// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by testalot.

use crate::record::ResultKind;
use camino::Utf8PathBuf;
use config::ConfigError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// An error that occurred while reading the config.
#[derive(Debug, Error)]
#[error("failed to parse testalot config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<ConfigError>),

    /// The test command is empty.
    #[error("run.command must contain at least the program to run")]
    EmptyCommand,
}

/// An error that occurred while parsing a single report document.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ReportParseError {
    line: usize,
    kind: ReportParseErrorKind,
}

impl ReportParseError {
    pub(crate) fn new(line: usize, kind: ReportParseErrorKind) -> Self {
        Self { line, kind }
    }

    /// Returns the 1-based line number at which the error occurred.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ReportParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a report document.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportParseErrorKind {
    /// A test case had more than one outcome marker.
    ///
    /// Each test case in a report is expected to have at most one `<error>` or `<failure>`
    /// element.
    #[error("test `{test}` has more than one outcome (already {existing}, found another {found})")]
    DuplicateOutcome {
        /// The identity of the test.
        test: String,

        /// The outcome the test already had.
        existing: ResultKind,

        /// The outcome indicated by the second marker.
        found: ResultKind,
    },

    /// A test case's duration could not be parsed as a non-negative number of seconds.
    #[error("test `{test}` has invalid duration `{input}`")]
    InvalidDuration {
        /// The identity of the test.
        test: String,

        /// The duration text as found in the document.
        input: String,
    },
}

/// An error that occurred while collecting results from report documents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CollectError {
    /// A path passed in for collection doesn't exist.
    #[error("path `{path}` does not exist")]
    PathNotFound {
        /// The path that was passed in.
        path: Utf8PathBuf,
    },

    /// An error occurred while walking a directory.
    #[error("error walking directory `{root}`")]
    Walk {
        /// The directory being walked.
        root: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: walkdir::Error,
    },

    /// A path found while walking a directory is not valid UTF-8.
    #[error("path `{}` is not valid UTF-8", path.display())]
    NonUtf8Path {
        /// The path that was found.
        path: PathBuf,
    },

    /// A report document could not be read.
    #[error("error reading report `{path}`")]
    ReadDocument {
        /// The report document.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// A report document could not be parsed.
    #[error("error parsing report `{path}`")]
    ParseDocument {
        /// The report document.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: ReportParseError,
    },
}

/// An error that occurred while repeatedly running the test command.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    /// The project marker file wasn't found in the workspace root.
    #[error("project marker `{path}` not found, testalot must be run from the root of the project")]
    ProjectMarkerNotFound {
        /// The expected location of the marker.
        path: Utf8PathBuf,
    },

    /// A reports directory left over from an earlier run could not be removed.
    #[error("failed to remove stale reports directory `{path}`")]
    RemoveStaleReports {
        /// The reports directory.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// The test command could not be started.
    #[error("failed to execute `{command}`")]
    CommandExec {
        /// The command line, joined by spaces.
        command: String,

        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// The test command finished, but didn't produce a reports directory.
    #[error("reports directory `{path}` not found after running `{command}`, no tests were run")]
    ReportsDirMissing {
        /// The expected reports directory.
        path: Utf8PathBuf,

        /// The command line, joined by spaces.
        command: String,
    },

    /// The archive directory could not be created.
    #[error("failed to create archive directory `{path}`")]
    CreateArchiveDir {
        /// The archive directory.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// A reports directory could not be moved into the archive.
    #[error("failed to move `{from}` to `{to}`")]
    ArchiveMove {
        /// The reports directory.
        from: Utf8PathBuf,

        /// The destination within the archive.
        to: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// The archived reports could not be collected.
    #[error("failed to collect archived reports")]
    Collect {
        /// The underlying error.
        #[from]
        err: CollectError,
    },
}
