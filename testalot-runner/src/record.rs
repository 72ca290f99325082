// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The outcome of a single test case in a single run.

use std::{fmt, time::Duration};

/// The outcome of a test case, as recorded in a report document.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ResultKind {
    /// The test passed.
    Pass,
    /// The test failed an assertion.
    Fail,
    /// The test errored out: for example, it threw an unexpected exception.
    Error,
}

impl ResultKind {
    /// Returns all result kinds, in display order.
    pub fn variants() -> [ResultKind; 3] {
        [ResultKind::Pass, ResultKind::Fail, ResultKind::Error]
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::Pass => write!(f, "pass"),
            ResultKind::Fail => write!(f, "fail"),
            ResultKind::Error => write!(f, "error"),
        }
    }
}

/// A single test case result parsed out of a report document.
///
/// Records are immutable once parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultRecord {
    name: String,
    kind: ResultKind,
    duration: Option<Duration>,
}

impl ResultRecord {
    /// Creates a new record for the test `test_name` in the class or suite `class_name`.
    ///
    /// The record's name is `<class_name>.<test_name>()`, which is stable across runs.
    pub fn new(
        class_name: &str,
        test_name: &str,
        kind: ResultKind,
        duration: Option<Duration>,
    ) -> Self {
        Self {
            name: test_identity(class_name, test_name),
            kind,
            duration,
        }
    }

    pub(crate) fn from_parts(name: String, kind: ResultKind, duration: Option<Duration>) -> Self {
        Self {
            name,
            kind,
            duration,
        }
    }

    /// Returns the identity of the test: `<class>.<test>()`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the outcome of the test.
    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    /// Returns how long the test took, if the report recorded it.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Consumes the record, returning its name.
    pub fn into_name(self) -> String {
        self.name
    }
}

/// Builds the identity of a test from its class and test names.
pub(crate) fn test_identity(class_name: &str, test_name: &str) -> String {
    format!("{class_name}.{test_name}()")
}
