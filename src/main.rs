//! EF Designer
//!
//! Entity model designer: reverse-engineers compiled entity classes into a
//! live model graph.
//!
//! This is the launcher binary; it prints the banner and hands over to the
//! command-line front end.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Banner goes to stderr so command output stays pipeable
    eprintln!();
    eprintln!("╔═══════════════════════════════════════════════════════════╗");
    eprintln!("║                                                           ║");
    eprintln!("║   EF Designer v{:<43}║", efdesign_cli::VERSION);
    eprintln!("║   Entity model import and merge                           ║");
    eprintln!("║                                                           ║");
    eprintln!("╚═══════════════════════════════════════════════════════════╝");
    eprintln!();

    efdesign_cli::main_entry()
}
