// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown reports over aggregated results.
//!
//! The report consists of two sections: the slowest tests by maximum observed duration, and the
//! tests whose outcome varied across runs.

use crate::aggregate::{FlakyTest, ResultAggregate, SlowTest};
use std::{fmt, io, time::Duration};

/// The number of rows in the slow tests table.
pub const SLOW_TEST_COUNT: usize = 8;

/// Writes Markdown reports for a [`ResultAggregate`].
#[derive(Clone, Debug)]
pub struct MarkdownReporter<'a> {
    aggregate: &'a ResultAggregate,
    slow_test_count: usize,
}

impl<'a> MarkdownReporter<'a> {
    /// Creates a new reporter for the given aggregate.
    pub fn new(aggregate: &'a ResultAggregate) -> Self {
        Self {
            aggregate,
            slow_test_count: SLOW_TEST_COUNT,
        }
    }

    /// Sets the maximum number of rows in the slow tests table.
    ///
    /// Defaults to [`SLOW_TEST_COUNT`].
    pub fn set_slow_test_count(&mut self, count: usize) -> &mut Self {
        self.slow_test_count = count;
        self
    }

    /// Writes the full report: slow tests followed by flaky tests.
    pub fn write_report(&self, mut writer: impl io::Write) -> io::Result<()> {
        self.write_slow_tests(&mut writer)?;
        self.write_flaky_tests(&mut writer)?;
        writer.flush()
    }

    /// Writes the slow tests table.
    pub fn write_slow_tests(&self, mut writer: impl io::Write) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "# Slow tests")?;
        writeln!(writer)?;
        writeln!(writer, "| Duration | Name |")?;
        writeln!(writer, "|----------|------|")?;
        for SlowTest { name, max_duration } in self.aggregate.slowest(self.slow_test_count) {
            writeln!(writer, "| {} | `{name}` |", DisplaySlowDuration(max_duration))?;
        }
        Ok(())
    }

    /// Writes the flaky tests table.
    pub fn write_flaky_tests(&self, mut writer: impl io::Write) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "# Flaky tests")?;
        writeln!(writer)?;
        writeln!(writer, "| Pass | Fail | Error | Name |")?;
        writeln!(writer, "|------|------|-------|------|")?;
        for FlakyTest { name, counts } in self.aggregate.flaky() {
            writeln!(
                writer,
                "| {:4} | {:4} | {:5} | `{name}` |",
                counts.pass, counts.fail, counts.error,
            )?;
        }
        Ok(())
    }
}

/// Displays a duration as seconds with millisecond precision, padded to the width of the
/// "Duration" column.
struct DisplaySlowDuration(Duration);

impl fmt::Display for DisplaySlowDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>7.3}s", self.0.as_secs_f64())
    }
}
