//! `efdesign` command-line entry point

use std::process::ExitCode;

fn main() -> ExitCode {
    efdesign_cli::main_entry()
}
