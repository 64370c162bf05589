//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `edge_status` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Choosing the input source (piped stdin, `--urls`, `--url`)
//!
//! All core functionality is implemented in the library crate.

use std::io::IsTerminal;
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use edge_status::initialization::init_logger_with;
use edge_status::{run_scan_from, Config, InputSource};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let stdin_is_piped = !std::io::stdin().is_terminal();
    let Some(input) = InputSource::from_config(&config, stdin_is_piped) else {
        let _ = Config::command().print_help();
        eprintln!("\nedge_status: no input (pass --url, --urls, or pipe targets on stdin)");
        process::exit(2);
    };

    match run_scan_from(config, input).await {
        Ok(report) => {
            eprintln!(
                "Processed {} target{} ({} reported, {} skipped) in {:.1}s",
                report.total_urls,
                if report.total_urls == 1 { "" } else { "s" },
                report.reported,
                report.skipped,
                report.elapsed_seconds
            );
            if let Some(path) = report.result_file {
                eprintln!("Results saved in {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("edge_status error: {:#}", e);
            process::exit(1);
        }
    }
}
