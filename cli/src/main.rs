use std::process::ExitCode;

use clap::Parser;
use saferoute_cli::Cli;
use saferoute_cli::run_main;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run_main(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
