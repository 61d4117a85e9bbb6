use clap::Parser;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    filelens_forensics::logging::init();

    let args = cli::Cli::parse();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
