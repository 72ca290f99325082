// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser for JUnit-style XML test reports, as written by Maven Surefire.
//!
//! This is deliberately not an XML parser. Surefire writes one `<testcase>` element per line, so
//! reports are processed line by line: each line is classified into a [`LineKind`], and a small
//! state machine turns the classified lines into [`ResultRecord`]s. Lines that aren't recognized
//! are ignored.

use crate::{
    errors::{ReportParseError, ReportParseErrorKind},
    record::{ResultKind, ResultRecord, test_identity},
};
use regex::Regex;
use std::time::Duration;
use tracing::trace;

/// The classification of a single line of a report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineKind<'a> {
    /// The start of a test case, e.g.
    /// `<testcase name="aclExcudeSingleCommand" classname="redis.clients.jedis.tests.AclTest" time="0"/>`.
    TestStart {
        /// The name of the test.
        test: &'a str,

        /// The class or suite the test belongs to.
        class: &'a str,

        /// The duration text in seconds, if the report records it.
        duration: Option<&'a str>,
    },

    /// An `<error ...>` element: the current test errored out.
    ErrorMarker,

    /// A `<failure ...>` element: the current test failed.
    FailureMarker,

    /// Anything else.
    Other,
}

/// Classifies lines of a report.
#[derive(Clone, Debug)]
pub struct LineClassifier {
    test_start: Regex,
    error: Regex,
    failure: Regex,
}

impl LineClassifier {
    /// Creates a new classifier.
    pub fn new() -> Self {
        Self {
            test_start: Regex::new(
                r#"^\s*<testcase\s+name="([^"]*)"\s+classname="([^"]*)"(?:\s+time="([^"]*)")?"#,
            )
            .expect("testcase regex is valid"),
            error: Regex::new(r"^\s*<error[\s>/]").expect("error regex is valid"),
            failure: Regex::new(r"^\s*<failure[\s>/]").expect("failure regex is valid"),
        }
    }

    /// Classifies a single line.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if let Some(captures) = self.test_start.captures(line) {
            // Groups 1 and 2 are not optional, so they're always present on a match.
            let test = captures.get(1).map_or("", |m| m.as_str());
            let class = captures.get(2).map_or("", |m| m.as_str());
            let duration = captures.get(3).map(|m| m.as_str());
            LineKind::TestStart {
                test,
                class,
                duration,
            }
        } else if self.error.is_match(line) {
            LineKind::ErrorMarker
        } else if self.failure.is_match(line) {
            LineKind::FailureMarker
        } else {
            LineKind::Other
        }
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses report documents into [`ResultRecord`]s.
#[derive(Clone, Debug, Default)]
pub struct ReportParser {
    classifier: LineClassifier,
}

impl ReportParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a report document held in memory.
    pub fn parse_str(&self, input: &str) -> Result<Vec<ResultRecord>, ReportParseError> {
        let mut state = ParseState::default();
        for (index, line) in input.lines().enumerate() {
            state.process(self.classifier.classify(line), index + 1)?;
        }
        Ok(state.finish())
    }
}

/// The test case currently being parsed.
#[derive(Debug)]
struct OpenTest {
    name: String,
    kind: ResultKind,
    duration: Option<Duration>,
}

impl OpenTest {
    fn into_record(self) -> ResultRecord {
        ResultRecord::from_parts(self.name, self.kind, self.duration)
    }
}

#[derive(Debug, Default)]
struct ParseState {
    current: Option<OpenTest>,
    records: Vec<ResultRecord>,
}

impl ParseState {
    fn process(&mut self, line: LineKind<'_>, line_number: usize) -> Result<(), ReportParseError> {
        match line {
            LineKind::TestStart {
                test,
                class,
                duration,
            } => {
                if let Some(open) = self.current.take() {
                    self.records.push(open.into_record());
                }

                let name = test_identity(class, test);
                let duration = match duration {
                    Some(input) => Some(parse_duration(input).ok_or_else(|| {
                        ReportParseError::new(
                            line_number,
                            ReportParseErrorKind::InvalidDuration {
                                test: name.clone(),
                                input: input.to_owned(),
                            },
                        )
                    })?),
                    None => None,
                };
                trace!("line {line_number}: start of {name}");
                self.current = Some(OpenTest {
                    name,
                    kind: ResultKind::Pass,
                    duration,
                });
            }
            LineKind::ErrorMarker => self.mark(ResultKind::Error, line_number)?,
            LineKind::FailureMarker => self.mark(ResultKind::Fail, line_number)?,
            LineKind::Other => {}
        }

        Ok(())
    }

    fn mark(&mut self, found: ResultKind, line_number: usize) -> Result<(), ReportParseError> {
        let Some(open) = &mut self.current else {
            trace!("line {line_number}: {found} marker outside of a test case, ignoring");
            return Ok(());
        };

        if open.kind != ResultKind::Pass {
            return Err(ReportParseError::new(
                line_number,
                ReportParseErrorKind::DuplicateOutcome {
                    test: open.name.clone(),
                    existing: open.kind,
                    found,
                },
            ));
        }

        trace!("line {line_number}: {} marked {found}", open.name);
        open.kind = found;
        Ok(())
    }

    fn finish(mut self) -> Vec<ResultRecord> {
        if let Some(open) = self.current.take() {
            self.records.push(open.into_record());
        }
        self.records
    }
}

/// Parses a duration in fractional seconds, e.g. `0.012`.
fn parse_duration(input: &str) -> Option<Duration> {
    let secs: f64 = input.trim().parse().ok()?;
    // try_from_secs_f64 rejects negative, NaN and out-of-range values.
    Duration::try_from_secs_f64(secs).ok()
}
