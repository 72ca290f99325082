// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use testalot::{OutputWriter, TestalotApp, clap_error_exit_code};

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = enable_ansi_support::enable_ansi_support();

    let opts = match TestalotApp::try_parse() {
        Ok(opts) => opts,
        Err(err) => {
            let _ = err.print();
            std::process::exit(clap_error_exit_code(&err))
        }
    };
    let output = opts.init_output();

    match opts.exec(&mut OutputWriter::default()) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            error.display_to_stderr(&output.stderr_styles());
            std::process::exit(error.process_exit_code())
        }
    }
}
