// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-run statistics, keyed by test name.

use crate::record::{ResultKind, ResultRecord};
use std::{collections::BTreeMap, time::Duration};

/// Per-test statistics folded out of a list of [`ResultRecord`]s.
///
/// Maps are keyed by test name in a `BTreeMap`, so every iteration order derived from this
/// structure is deterministic.
#[derive(Clone, Debug, Default)]
pub struct ResultAggregate {
    max_durations: BTreeMap<String, Duration>,
    counts: BTreeMap<String, KindCounts>,
}

impl ResultAggregate {
    /// Builds an aggregate out of the given records, consuming them.
    ///
    /// Records without a duration are counted towards outcomes, but don't contribute to
    /// durations.
    pub fn from_records(records: impl IntoIterator<Item = ResultRecord>) -> Self {
        let mut aggregate = Self::default();
        for record in records {
            aggregate.add(record);
        }
        aggregate
    }

    fn add(&mut self, record: ResultRecord) {
        if let Some(duration) = record.duration() {
            let max = self
                .max_durations
                .entry(record.name().to_owned())
                .or_default();
            *max = (*max).max(duration);
        }

        let kind = record.kind();
        self.counts.entry(record.into_name()).or_default().add(kind);
    }

    /// Returns the number of distinct tests seen.
    pub fn test_count(&self) -> usize {
        self.counts.len()
    }

    /// Returns the total number of results seen.
    pub fn result_count(&self) -> usize {
        self.counts.values().map(KindCounts::total).sum()
    }

    /// Returns the maximum duration observed for the given test, if any result for it recorded a
    /// duration.
    pub fn max_duration(&self, name: &str) -> Option<Duration> {
        self.max_durations.get(name).copied()
    }

    /// Returns the outcome counts for the given test.
    pub fn counts(&self, name: &str) -> Option<&KindCounts> {
        self.counts.get(name)
    }

    /// Returns up to `limit` tests with the highest maximum duration, slowest first.
    ///
    /// Ties are broken by test name.
    pub fn slowest(&self, limit: usize) -> Vec<SlowTest<'_>> {
        let mut tests: Vec<_> = self
            .max_durations
            .iter()
            .map(|(name, &max_duration)| SlowTest { name, max_duration })
            .collect();
        // The sort is stable, and max_durations iterates in name order.
        tests.sort_by(|a, b| b.max_duration.cmp(&a.max_duration));
        tests.truncate(limit);
        tests
    }

    /// Returns all tests that had more than one kind of outcome, in name order.
    pub fn flaky(&self) -> Vec<FlakyTest<'_>> {
        self.counts
            .iter()
            .filter(|(_, counts)| counts.is_flaky())
            .map(|(name, counts)| FlakyTest { name, counts })
            .collect()
    }
}

/// How many times each kind of outcome was seen for a test.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KindCounts {
    /// The number of passes.
    pub pass: usize,

    /// The number of failures.
    pub fail: usize,

    /// The number of errors.
    pub error: usize,
}

impl KindCounts {
    fn add(&mut self, kind: ResultKind) {
        match kind {
            ResultKind::Pass => self.pass += 1,
            ResultKind::Fail => self.fail += 1,
            ResultKind::Error => self.error += 1,
        }
    }

    /// Returns the count for the given kind.
    pub fn get(&self, kind: ResultKind) -> usize {
        match kind {
            ResultKind::Pass => self.pass,
            ResultKind::Fail => self.fail,
            ResultKind::Error => self.error,
        }
    }

    /// Returns the total number of results.
    pub fn total(&self) -> usize {
        self.pass + self.fail + self.error
    }

    /// Returns the number of distinct kinds of outcome seen.
    pub fn distinct_kinds(&self) -> usize {
        ResultKind::variants()
            .into_iter()
            .filter(|&kind| self.get(kind) > 0)
            .count()
    }

    /// Returns true if more than one kind of outcome was seen.
    pub fn is_flaky(&self) -> bool {
        self.distinct_kinds() > 1
    }
}

/// A test and its maximum observed duration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SlowTest<'a> {
    /// The name of the test.
    pub name: &'a str,

    /// The maximum duration observed across all runs.
    pub max_duration: Duration,
}

/// A test whose outcome varied across runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FlakyTest<'a> {
    /// The name of the test.
    pub name: &'a str,

    /// How many times each outcome was seen.
    pub counts: &'a KindCounts,
}
