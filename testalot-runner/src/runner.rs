// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Running the test command repeatedly.
//!
//! The main structure in this module is [`TestalotRunner`].

use crate::{
    collect::collect_results,
    config::RunConfig,
    errors::RunError,
    helpers::{
        DisplayElapsed, DisplayExitStatus, dir_name_timestamp, display_timestamp, plural,
        projected_time_left,
    },
    record::ResultRecord,
    stopwatch::StopwatchStart,
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Local, TimeDelta};
use std::{io, num::NonZeroUsize};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Test runner options.
#[derive(Debug)]
pub struct RunnerBuilder {
    runs: NonZeroUsize,
}

impl Default for RunnerBuilder {
    fn default() -> Self {
        Self {
            runs: NonZeroUsize::MIN,
        }
    }
}

impl RunnerBuilder {
    /// Sets the number of times to run the test command.
    pub fn set_runs(&mut self, runs: NonZeroUsize) -> &mut Self {
        self.runs = runs;
        self
    }

    /// Creates a new runner.
    pub fn build<'cfg>(&self, config: RunConfig<'cfg>) -> TestalotRunner<'cfg> {
        TestalotRunner {
            config,
            runs: self.runs,
        }
    }
}

/// Runs the test command a fixed number of times in a row, archiving the reports from each run.
#[derive(Debug)]
pub struct TestalotRunner<'cfg> {
    config: RunConfig<'cfg>,
    runs: NonZeroUsize,
}

impl<'cfg> TestalotRunner<'cfg> {
    /// Executes all runs in sequence, then collects every result in the archive directory.
    ///
    /// The archive directory is only ever added to, so the results include those of any earlier
    /// invocations that archived there.
    ///
    /// A test command that exits with a non-zero status does not stop the loop: failing tests are
    /// exactly what's being measured. Any other problem is fatal.
    pub fn execute(&self) -> Result<Vec<ResultRecord>, RunError> {
        let total = self.runs.get();
        let stopwatch = StopwatchStart::now();
        info!(
            "running `{}` {total} {} from `{}`",
            self.config.command_str(),
            plural::runs_str(total),
            self.config.workspace_root(),
        );

        for run in 1..=total {
            info!("starting run {run}/{total}");
            let archived = self.run_once()?;
            debug!("archived run {run} to `{archived}`");

            let runs_left = total - run;
            if let Some(time_left) = projected_time_left(stopwatch.elapsed(), run, runs_left) {
                let now = Local::now();
                let finish_time = TimeDelta::from_std(time_left)
                    .ok()
                    .and_then(|delta| now.checked_add_signed(delta))
                    .unwrap_or(now);
                info!(
                    "{runs_left} {} left, ETA {} ({} left)",
                    plural::runs_str(runs_left),
                    display_timestamp(&finish_time),
                    DisplayElapsed(time_left),
                );
            }
        }

        info!(
            "all done at {} (started {}, took {})",
            display_timestamp(&Local::now()),
            display_timestamp(&stopwatch.start_time()),
            DisplayElapsed(stopwatch.elapsed()),
        );

        let archive_dir = self.config.archive_dir();
        Ok(collect_results([archive_dir.as_path()])?)
    }

    /// Performs a single run, returning the directory the reports were archived to.
    fn run_once(&self) -> Result<Utf8PathBuf, RunError> {
        let project_marker = self.config.project_marker();
        if !project_marker.is_file() {
            return Err(RunError::ProjectMarkerNotFound {
                path: project_marker,
            });
        }

        let reports_dir = self.config.reports_dir();
        if reports_dir.exists() {
            debug!("removing stale reports directory `{reports_dir}`");
            fs_err::remove_dir_all(&reports_dir).map_err(|err| {
                RunError::RemoveStaleReports {
                    path: reports_dir.clone(),
                    err,
                }
            })?;
        }

        let stopwatch = StopwatchStart::now();
        let output = duct::cmd(self.config.program(), self.config.args())
            .dir(self.config.workspace_root().as_std_path())
            .unchecked()
            .run()
            .map_err(|err| RunError::CommandExec {
                command: self.config.command_str(),
                err,
            })?;
        info!(
            "`{}` finished with {} after {}",
            self.config.command_str(),
            DisplayExitStatus(output.status),
            DisplayElapsed(stopwatch.elapsed()),
        );

        if !reports_dir.is_dir() {
            return Err(RunError::ReportsDirMissing {
                path: reports_dir,
                command: self.config.command_str(),
            });
        }

        let archive_dir = self.config.archive_dir();
        fs_err::create_dir_all(&archive_dir).map_err(|err| RunError::CreateArchiveDir {
            path: archive_dir.clone(),
            err,
        })?;

        let base_name = format!(
            "{}{}",
            self.config.archive_prefix(),
            dir_name_timestamp(&stopwatch.start_time()),
        );
        let destination = unique_child(&archive_dir, &base_name);
        move_dir(&reports_dir, &destination).map_err(|err| RunError::ArchiveMove {
            from: reports_dir.clone(),
            to: destination.clone(),
            err,
        })?;

        Ok(destination)
    }
}

/// Returns `dir/name`, or if that already exists, `dir/name-2`, `dir/name-3` and so on.
fn unique_child(dir: &Utf8Path, name: &str) -> Utf8PathBuf {
    let mut candidate = dir.join(name);
    let mut suffix = 1;
    while candidate.exists() {
        suffix += 1;
        candidate = dir.join(format!("{name}-{suffix}"));
    }
    candidate
}

/// Moves the directory `from` to `to`, which must not exist yet.
///
/// Falls back to copying and then deleting `from` if the two are on different filesystems.
fn move_dir(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
    match fs_err::rename(from, to) {
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            debug!("`{from}` and `{to}` are on different filesystems, copying instead");
            copy_dir_all(from, to)?;
            fs_err::remove_dir_all(from)
        }
        other => other,
    }
}

/// Recursively copies the directory `from` to `to`.
fn copy_dir_all(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(from).map_err(io::Error::other)?;
        let target = to.as_std_path().join(relative);
        if entry.file_type().is_dir() {
            fs_err::create_dir_all(&target)?;
        } else {
            fs_err::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
