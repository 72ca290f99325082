// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use color_eyre::eyre::Result;
use indoc::indoc;
use std::{fs, num::NonZeroUsize};
use swrite::{SWrite, swrite};
use testalot_runner::{
    config::TestalotConfig, errors::RunError, record::ResultRecord, runner::RunnerBuilder,
};

/// Report written by the stub command on its first run.
pub(crate) static RUN_1_REPORT: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <testsuite name="com.example.FooTest" tests="2" failures="0" errors="0">
      <testcase name="alpha" classname="com.example.FooTest" time="0.5"/>
      <testcase name="beta" classname="com.example.FooTest" time="1.25"/>
    </testsuite>
"#};

/// Report written by the stub command on its second run. `beta` fails.
pub(crate) static RUN_2_REPORT: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <testsuite name="com.example.FooTest" tests="2" failures="1" errors="0">
      <testcase name="alpha" classname="com.example.FooTest" time="2.0"/>
      <testcase name="beta" classname="com.example.FooTest" time="0.75">
        <failure message="expected 1 but was 2" type="java.lang.AssertionError"/>
      </testcase>
    </testsuite>
"#};

/// Report written by the stub command on its third and later runs.
pub(crate) static RUN_3_REPORT: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <testsuite name="com.example.FooTest" tests="2" failures="0" errors="0">
      <testcase name="alpha" classname="com.example.FooTest" time="0.25"/>
      <testcase name="beta" classname="com.example.FooTest" time="1.0"/>
    </testsuite>
"#};

/// A stub command that copies `fixtures/run-<n>.xml` into the reports directory on its `n`th run,
/// and exits with a failure on its second run.
pub(crate) const STUB_SCRIPT: &str = "n=$(cat .run-count 2>/dev/null || echo 0); \
     n=$((n + 1)); echo $n > .run-count; \
     if [ $n -gt 3 ]; then src=3; else src=$n; fi; \
     mkdir -p target/surefire-reports && \
     cp fixtures/run-$src.xml target/surefire-reports/TEST-com.example.FooTest.xml; \
     test $n -ne 2";

/// A temporary project directory with a testalot config that runs `command`.
pub(crate) struct TempProject {
    dir: Utf8TempDir,
    archive_dir: Utf8PathBuf,
}

impl TempProject {
    pub(crate) fn new(command: &[&str]) -> Result<Self> {
        Self::with_archive_dir(command, None)
    }

    /// Creates a project whose config sets `archive-dir` to `archive_dir` if it is given.
    pub(crate) fn with_archive_dir(
        command: &[&str],
        archive_dir: Option<&Utf8Path>,
    ) -> Result<Self> {
        let dir = Utf8TempDir::with_prefix("testalot-runner-")?;
        let root = dir.path();

        let mut config = String::from("[run]\ncommand = [");
        for (i, arg) in command.iter().enumerate() {
            if i > 0 {
                config.push_str(", ");
            }
            // TOML literal strings: no escaping needed as long as there are no single quotes.
            assert!(!arg.contains('\''), "argument {arg:?} contains a single quote");
            swrite!(config, "'{arg}'");
        }
        config.push_str("]\n");
        if let Some(archive_dir) = archive_dir {
            swrite!(config, "archive-dir = '{archive_dir}'\n");
        }

        fs::create_dir_all(root.join(".config"))?;
        fs::write(root.join(TestalotConfig::CONFIG_PATH), config)?;

        fs::create_dir_all(root.join("fixtures"))?;
        fs::write(root.join("fixtures/run-1.xml"), RUN_1_REPORT)?;
        fs::write(root.join("fixtures/run-2.xml"), RUN_2_REPORT)?;
        fs::write(root.join("fixtures/run-3.xml"), RUN_3_REPORT)?;

        let archive_dir = archive_dir.map_or_else(
            || root.join("target/testalot"),
            |archive_dir| archive_dir.to_owned(),
        );
        Ok(Self { dir, archive_dir })
    }

    /// A project with the stub command and a project marker.
    pub(crate) fn with_stub() -> Result<Self> {
        let project = Self::new(&["sh", "-c", STUB_SCRIPT])?;
        project.write_marker()?;
        Ok(project)
    }

    pub(crate) fn root(&self) -> &Utf8Path {
        self.dir.path()
    }

    pub(crate) fn write_marker(&self) -> Result<()> {
        fs::write(self.root().join("pom.xml"), "<project/>\n")?;
        Ok(())
    }

    pub(crate) fn reports_dir(&self) -> Utf8PathBuf {
        self.root().join("target/surefire-reports")
    }

    pub(crate) fn archive_dir(&self) -> &Utf8Path {
        &self.archive_dir
    }

    /// Returns the names of the directories in the archive, sorted.
    pub(crate) fn archived_runs(&self) -> Result<Vec<String>> {
        let archive_dir = self.archive_dir();
        if !archive_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in archive_dir.read_dir_utf8()? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Loads the project's config and runs the test command `runs` times.
    pub(crate) fn run(&self, runs: usize) -> Result<Result<Vec<ResultRecord>, RunError>> {
        let config = TestalotConfig::from_sources(self.root(), None)?;
        let runs = NonZeroUsize::new(runs).expect("runs is non-zero");
        let runner = RunnerBuilder::default()
            .set_runs(runs)
            .build(config.run_config());
        Ok(runner.execute())
    }
}
