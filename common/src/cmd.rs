// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facilities used by executables in this workspace

use std::env::args;
use std::process::exit;

/// Represents a fatal error in a command-line program
#[derive(Debug)]
pub enum CmdError {
    /// incorrect command-line arguments
    Usage(String),
    /// all other errors
    Failure(String),
}

/// Prints the error to stderr and exits the process with an appropriate exit
/// status
pub fn fatal(cmd_error: CmdError) -> ! {
    let arg0 = args().next().unwrap_or_else(|| String::from("command"));
    let (exit_code, message) = match cmd_error {
        CmdError::Usage(m) => (2, m),
        CmdError::Failure(m) => (1, m),
    };
    eprintln!("{}: {}", arg0, message);
    exit(exit_code);
}
