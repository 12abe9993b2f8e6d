//! Entry point for the `synergy` binary.
//!
//! stdout carries the JSON result; failures go to stderr as an
//! `ErrorReport` with a non-zero exit status.

use clap::Parser;
use std::process::ExitCode;
use synergy_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match synergy_cli::run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let report = err.report();
            match serde_json::to_string(&report) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", report.message),
            }
            ExitCode::from(err.exit_code())
        }
    }
}
