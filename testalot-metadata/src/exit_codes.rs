// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `testalot` failures.
///
/// `testalot` may fail for a variety of reasons. This structure documents the exit codes that may
/// occur in case of expected failures.
///
/// A failing test run is *not* a failure of testalot: `testalot run` exits with [`Self::OK`] even
/// if every test run failed, since surfacing those failures is the point of the tool.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum TestalotExitCode {}

impl TestalotExitCode {
    /// No errors occurred and testalot exited normally.
    pub const OK: i32 = 0;

    /// The command-line arguments could not be parsed.
    ///
    /// This matches the exit code used by clap.
    pub const USAGE_ERROR: i32 = 2;

    /// A user issue happened while setting up a testalot invocation: for example, the config
    /// could not be read, or the project marker file is missing.
    pub const SETUP_ERROR: i32 = 96;

    /// The external test command could not be started at all.
    pub const COMMAND_EXEC_FAILED: i32 = 97;

    /// The external test command finished without producing a reports directory, meaning no tests
    /// were run.
    pub const NO_TESTS_RUN: i32 = 98;

    /// A test report could not be read or parsed.
    pub const REPORT_COLLECT_FAILED: i32 = 99;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
