// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Machine-readable metadata for testalot.
//!
//! Currently this is only the set of documented process exit codes.

#![warn(missing_docs)]

mod exit_codes;

pub use exit_codes::*;
