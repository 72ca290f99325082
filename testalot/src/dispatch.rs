// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError, Result,
    output::{OutputContext, OutputOpts, OutputWriter, clap_styles},
};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use std::num::NonZeroUsize;
use testalot_metadata::TestalotExitCode;
use testalot_runner::{
    aggregate::ResultAggregate, collect::ResultCollector, config::TestalotConfig,
    record::ResultRecord, reporter::MarkdownReporter, runner::RunnerBuilder,
};
use tracing::{debug, info};

/// Run a test suite many times over, then report the slowest and flakiest tests.
///
/// Each run's JUnit-style XML reports are archived, so reports can be generated again later.
#[derive(Debug, Parser)]
#[command(
    version,
    name = "testalot",
    styles = clap_styles::style(),
    max_term_width = 100
)]
pub struct TestalotApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(flatten)]
    config_opts: ConfigOpts,

    #[clap(subcommand)]
    command: Command,
}

impl TestalotApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.command {
            Command::Run(opts) => opts.exec(&self.config_opts, output_writer),
            Command::Report(opts) => opts.exec(&self.config_opts, output_writer),
        }
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Config options")]
struct ConfigOpts {
    /// Directory to run in [default: current directory]
    ///
    /// The project marker, reports and archive directories are all relative to this directory.
    #[arg(long, short = 'C', global = true, value_name = "DIR")]
    workspace_root: Option<Utf8PathBuf>,

    /// Config file [default: workspace-root/.config/testalot.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,
}

impl ConfigOpts {
    fn workspace_root(&self) -> Result<Utf8PathBuf> {
        let workspace_root = match &self.workspace_root {
            Some(workspace_root) => workspace_root.clone(),
            None => {
                let current_dir = std::env::current_dir()
                    .map_err(|err| ExpectedError::GetCurrentDirFailed { err })?;
                Utf8PathBuf::try_from(current_dir).map_err(|err| {
                    ExpectedError::CurrentDirInvalidUtf8 {
                        path: err.into_path_buf(),
                    }
                })?
            }
        };

        if !workspace_root.is_dir() {
            return Err(ExpectedError::WorkspaceRootInvalid { workspace_root });
        }
        Ok(workspace_root)
    }

    /// Creates a testalot config with the given options.
    fn make_config(&self) -> Result<TestalotConfig> {
        let workspace_root = self.workspace_root()?;
        let config = TestalotConfig::from_sources(workspace_root, self.config_file.as_deref())?;
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the test command repeatedly, then report on all archived runs
    ///
    /// Each run removes any leftover reports directory, runs the test command from the workspace
    /// root, and moves the reports it wrote into a new timestamped directory in the archive. A
    /// test command that exits with failure doesn't stop the remaining runs.
    Run(RunOpts),

    /// Report on existing results without running anything
    Report(ReportOpts),
}

#[derive(Debug, Args)]
struct RunOpts {
    /// Number of times to run the test command
    #[arg(value_name = "COUNT")]
    count: NonZeroUsize,
}

impl RunOpts {
    fn exec(self, config_opts: &ConfigOpts, output_writer: &mut OutputWriter) -> Result<i32> {
        let config = config_opts.make_config()?;
        let runner = RunnerBuilder::default()
            .set_runs(self.count)
            .build(config.run_config());
        let records = runner.execute()?;

        write_report(records, output_writer)?;
        Ok(TestalotExitCode::OK)
    }
}

#[derive(Debug, Args)]
struct ReportOpts {
    /// Report documents, or directories to search for them [default: the archive directory]
    #[arg(value_name = "PATH")]
    paths: Vec<Utf8PathBuf>,
}

impl ReportOpts {
    fn exec(self, config_opts: &ConfigOpts, output_writer: &mut OutputWriter) -> Result<i32> {
        let paths = if self.paths.is_empty() {
            vec![config_opts.make_config()?.archive_dir()]
        } else {
            self.paths
        };
        debug!("collecting results from {}", paths.iter().join(", "));

        let records = ResultCollector::new().collect(paths.iter().map(Utf8PathBuf::as_path))?;

        write_report(records, output_writer)?;
        Ok(TestalotExitCode::OK)
    }
}

fn write_report(records: Vec<ResultRecord>, output_writer: &mut OutputWriter) -> Result<()> {
    let record_count = records.len();
    let aggregate = ResultAggregate::from_records(records);

    let mut writer = output_writer.stdout_writer();
    MarkdownReporter::new(&aggregate)
        .write_report(&mut writer)
        .map_err(|err| ExpectedError::WriteReportError { err })?;

    info!("{record_count} records from {} tests", aggregate.test_count());
    Ok(())
}
