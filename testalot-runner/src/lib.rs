// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core logic for testalot.
//!
//! testalot runs a project's test suite several times in a row, keeps the JUnit-style XML reports
//! written by each run, and summarizes them as a Markdown report of the slowest and flakiest tests.
//!
//! The pipeline is:
//!
//! * [`runner`]: runs the test command `N` times, archiving each run's reports directory.
//! * [`collect`]: finds report documents under a set of paths and [`parser`] parses them into
//!   [`record::ResultRecord`]s.
//! * [`aggregate`]: folds records into per-test statistics.
//! * [`reporter`]: renders those statistics as Markdown tables.

#![warn(missing_docs)]

pub mod aggregate;
pub mod collect;
pub mod config;
pub mod errors;
mod helpers;
pub mod parser;
pub mod record;
pub mod reporter;
pub mod runner;
mod stopwatch;
