// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use std::error::Error;
use testalot_metadata::TestalotExitCode;
use testalot_runner::errors::{CollectError, ConfigParseError, RunError};
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected failure of testalot itself.
///
/// Tests failing under the test command are not errors: those are reported, not raised.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine current directory")]
    GetCurrentDirFailed {
        #[source]
        err: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 { path: std::path::PathBuf },
    #[error("workspace root `{workspace_root}` is not a directory")]
    WorkspaceRootInvalid { workspace_root: Utf8PathBuf },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("run error")]
    RunError {
        #[from]
        err: RunError,
    },
    #[error("collect error")]
    CollectError {
        #[from]
        err: CollectError,
    },
    #[error("error writing report")]
    WriteReportError {
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::GetCurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::WorkspaceRootInvalid { .. }
            | Self::ConfigParseError { .. } => TestalotExitCode::SETUP_ERROR,
            Self::RunError { err } => match err {
                RunError::CommandExec { .. } => TestalotExitCode::COMMAND_EXEC_FAILED,
                RunError::ReportsDirMissing { .. } => TestalotExitCode::NO_TESTS_RUN,
                RunError::Collect { .. } => TestalotExitCode::REPORT_COLLECT_FAILED,
                _ => TestalotExitCode::SETUP_ERROR,
            },
            Self::CollectError { .. } => TestalotExitCode::REPORT_COLLECT_FAILED,
            Self::WriteReportError { .. } => TestalotExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::GetCurrentDirFailed { err } => {
                error!("could not determine current directory");
                Some(err as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { path } => {
                error!(
                    "current directory `{}` is not valid UTF-8",
                    path.display().style(styles.bold)
                );
                None
            }
            Self::WorkspaceRootInvalid { workspace_root } => {
                error!(
                    "workspace root `{}` is not a directory",
                    workspace_root.style(styles.bold)
                );
                None
            }
            Self::ConfigParseError { err } => {
                error!(
                    "failed to parse testalot config at `{}`",
                    err.config_file().style(styles.bold)
                );
                err.source()
            }
            Self::RunError { err } => display_run_error(err, styles),
            Self::CollectError { err } => {
                display_collect_error(err, styles);
                err.source()
            }
            Self::WriteReportError { err } => {
                error!("failed to write report to stdout");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}

/// Returns the exit code for a command-line parse error.
///
/// Requests for `--help` or `--version` also come through as errors, and exit normally.
#[doc(hidden)]
pub fn clap_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        TestalotExitCode::USAGE_ERROR
    } else {
        TestalotExitCode::OK
    }
}

/// Logs a run error, returning the next error in the chain.
fn display_run_error<'a>(
    err: &'a RunError,
    styles: &StderrStyles,
) -> Option<&'a (dyn Error + 'static)> {
    match err {
        RunError::ProjectMarkerNotFound { path } => {
            error!(
                "project marker `{}` not found, testalot must be run from the root of the project",
                path.style(styles.bold)
            );
        }
        RunError::RemoveStaleReports { path, .. } => {
            error!(
                "failed to remove stale reports directory `{}`",
                path.style(styles.bold)
            );
        }
        RunError::CommandExec { command, .. } => {
            error!("failed to execute `{}`", command.style(styles.bold));
        }
        RunError::ReportsDirMissing { path, command } => {
            error!(
                "reports directory `{}` not found after running `{}`, no tests were run",
                path.style(styles.bold),
                command.style(styles.bold),
            );
        }
        RunError::CreateArchiveDir { path, .. } => {
            error!(
                "failed to create archive directory `{}`",
                path.style(styles.bold)
            );
        }
        RunError::ArchiveMove { from, to, .. } => {
            error!(
                "failed to move `{}` to `{}`",
                from.style(styles.bold),
                to.style(styles.bold),
            );
        }
        RunError::Collect { err } => {
            error!("failed to collect archived reports");
            display_collect_error(err, styles);
            return err.source();
        }
        other => {
            error!("{other}");
        }
    }
    err.source()
}

fn display_collect_error(err: &CollectError, styles: &StderrStyles) {
    match err {
        CollectError::PathNotFound { path } => {
            error!("path `{}` does not exist", path.style(styles.bold));
        }
        CollectError::Walk { root, .. } => {
            error!("error walking directory `{}`", root.style(styles.bold));
        }
        CollectError::NonUtf8Path { path } => {
            error!(
                "path `{}` is not valid UTF-8",
                path.display().style(styles.bold)
            );
        }
        CollectError::ReadDocument { path, .. } => {
            error!("error reading report `{}`", path.style(styles.bold));
        }
        CollectError::ParseDocument { path, .. } => {
            error!("error parsing report `{}`", path.style(styles.bold));
        }
        other => {
            error!("{other}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let command = "mvn test".to_owned();
        let io_error = || std::io::Error::other("boom");

        let cases = [
            (
                ExpectedError::from(RunError::ProjectMarkerNotFound {
                    path: Utf8PathBuf::from("pom.xml"),
                }),
                TestalotExitCode::SETUP_ERROR,
            ),
            (
                ExpectedError::from(RunError::CommandExec {
                    command: command.clone(),
                    err: io_error(),
                }),
                TestalotExitCode::COMMAND_EXEC_FAILED,
            ),
            (
                ExpectedError::from(RunError::ReportsDirMissing {
                    path: Utf8PathBuf::from("target/surefire-reports"),
                    command,
                }),
                TestalotExitCode::NO_TESTS_RUN,
            ),
            (
                ExpectedError::from(RunError::from(CollectError::PathNotFound {
                    path: Utf8PathBuf::from("target/testalot"),
                })),
                TestalotExitCode::REPORT_COLLECT_FAILED,
            ),
            (
                ExpectedError::from(CollectError::PathNotFound {
                    path: Utf8PathBuf::from("missing"),
                }),
                TestalotExitCode::REPORT_COLLECT_FAILED,
            ),
            (
                ExpectedError::WriteReportError { err: io_error() },
                TestalotExitCode::WRITE_OUTPUT_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.process_exit_code(), expected, "for error {error:?}");
        }
    }

    #[test]
    fn clap_exit_codes() {
        use crate::TestalotApp;
        use clap::Parser;

        let cases: &[(&[&str], i32)] = &[
            (&["testalot"], TestalotExitCode::USAGE_ERROR),
            (&["testalot", "run", "0"], TestalotExitCode::USAGE_ERROR),
            (&["testalot", "--help"], TestalotExitCode::OK),
            (&["testalot", "--version"], TestalotExitCode::OK),
        ];
        for (args, expected) in cases {
            let err = TestalotApp::try_parse_from(*args).expect_err("parsing fails");
            assert_eq!(clap_error_exit_code(&err), *expected, "for args {args:?}");
        }
    }
}
