// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for testalot-runner.

use chrono::{DateTime, TimeZone};
use std::{fmt, process::ExitStatus, time::Duration};

/// Utilities for pluralizing various words based on count.
pub(crate) mod plural {
    /// Returns "run" if `count` is 1, otherwise "runs".
    pub(crate) fn runs_str(count: usize) -> &'static str {
        if count == 1 { "run" } else { "runs" }
    }

    /// Returns "result" if `count` is 1, otherwise "results".
    pub(crate) fn results_str(count: usize) -> &'static str {
        if count == 1 { "result" } else { "results" }
    }

    /// Returns "report" if `count` is 1, otherwise "reports".
    pub(crate) fn reports_str(count: usize) -> &'static str {
        if count == 1 { "report" } else { "reports" }
    }
}

/// Displays a wall-clock duration rounded down to whole seconds, e.g. `1h 2m 3s`.
pub(crate) struct DisplayElapsed(pub(crate) Duration);

impl fmt::Display for DisplayElapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = Duration::from_secs(self.0.as_secs());
        write!(f, "{}", humantime::format_duration(secs))
    }
}

/// Displays how a child process exited.
pub(crate) struct DisplayExitStatus(pub(crate) ExitStatus);

impl fmt::Display for DisplayExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.0.code() {
            return write!(f, "exit code {code}");
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = self.0.signal() {
                return write!(f, "signal {signal}");
            }
        }

        write!(f, "unknown exit status")
    }
}

/// Formats a timestamp for use in a directory name, e.g. `20210208T093519`.
///
/// The result only contains ASCII alphanumerics, so it is safe to use on every filesystem.
pub(crate) fn dir_name_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    time.format("%Y%m%dT%H%M%S").to_string()
}

/// Formats a timestamp for display, e.g. `2021-02-08T09:35:19`.
pub(crate) fn display_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    time.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Projects how much longer the remaining runs will take, assuming each takes the average time of
/// the runs done so far.
///
/// Returns `None` if no runs are done yet, none are left, or the projection is too large to
/// represent.
pub(crate) fn projected_time_left(
    elapsed: Duration,
    runs_done: usize,
    runs_left: usize,
) -> Option<Duration> {
    if runs_done == 0 || runs_left == 0 {
        return None;
    }
    let per_run = elapsed.as_secs_f64() / runs_done as f64;
    Duration::try_from_secs_f64(per_run * runs_left as f64).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use test_case::test_case;

    #[test]
    fn timestamps() {
        let time = NaiveDate::from_ymd_opt(2021, 2, 8)
            .unwrap()
            .and_hms_opt(9, 35, 19)
            .unwrap()
            .and_local_timezone(FixedOffset::east_opt(3600).unwrap())
            .unwrap();
        assert_eq!(dir_name_timestamp(&time), "20210208T093519");
        assert_eq!(display_timestamp(&time), "2021-02-08T09:35:19");
    }

    #[test_case(Duration::from_millis(400), "0s" ; "sub-second")]
    #[test_case(Duration::from_millis(3_900), "3s" ; "truncated")]
    #[test_case(Duration::from_secs(3_723), "1h 2m 3s" ; "hours")]
    fn display_elapsed(duration: Duration, expected: &str) {
        assert_eq!(DisplayElapsed(duration).to_string(), expected);
    }

    #[test_case(Duration::from_secs(60), 0, 3 => None ; "nothing done")]
    #[test_case(Duration::from_secs(60), 3, 0 => None ; "nothing left")]
    #[test_case(Duration::from_secs(60), 2, 3 => Some(Duration::from_secs(90)) ; "average")]
    #[test_case(Duration::from_secs(2), 1, usize::MAX - 1 => None ; "too large")]
    fn time_left(elapsed: Duration, runs_done: usize, runs_left: usize) -> Option<Duration> {
        projected_time_left(elapsed, runs_done, runs_left)
    }
}
