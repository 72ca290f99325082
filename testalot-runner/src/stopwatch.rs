// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stopwatch for tracking how long test runs take.
//!
//! Runs need to track a start time and a duration. For that we use a combination of a
//! [`DateTime<Local>`] (realtime clock, shown to the user) and an [`Instant`] (monotonic clock,
//! used for measuring).

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// The start state of a stopwatch.
#[derive(Clone, Debug)]
pub(crate) struct StopwatchStart {
    start_time: DateTime<Local>,
    instant: Instant,
}

impl StopwatchStart {
    pub(crate) fn now() -> Self {
        Self {
            // These two syscalls will happen imperceptibly close to each other, which is good
            // enough for our purposes.
            start_time: Local::now(),
            instant: Instant::now(),
        }
    }

    #[inline]
    pub(crate) fn start_time(&self) -> DateTime<Local> {
        self.start_time
    }

    #[inline]
    pub(crate) fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }
}
