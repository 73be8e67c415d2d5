//! Binary entrypoint for the `odswatch` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match odswatch::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
