#![deny(clippy::all, clippy::pedantic)]

use std::process::ExitCode;

fn main() -> ExitCode {
    ado::logging::init();

    if let Err(err) = ado::run(std::env::args_os().skip(1), &mut std::io::stdout().lock()) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
