mod args;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use pce_observe::{LoggerConfig, logger_init};

use crate::args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = LoggerConfig {
        format: args.log_format,
        ..LoggerConfig::for_verbosity(args.verbose)
    };
    if let Err(e) = logger_init(&cfg) {
        eprintln!("failed to initialize logger: {e}");
        return ExitCode::FAILURE;
    }

    match commands::run(args).await {
        Ok(()) => {
            info!("export finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
