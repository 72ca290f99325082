// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the runner. These spawn `sh`, so they only run on Unix.

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod fixtures;
        mod run;
    }
}
