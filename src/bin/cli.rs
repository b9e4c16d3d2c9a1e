//! format-to-as CLI - rewrite `format:` to `as:` in Ruby test files.

use clap::Parser;
use format_to_as::cli::{init_tracing, run, Cli, EXIT_ERROR};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
