//! Meeting optimizer CLI.
//!
//! Reads one JSON input file, writes the result document to standard
//! output. Logs go to standard error.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use u_meeting::api::{self, OutputDocument};
use u_meeting::logging;

#[derive(Parser)]
#[command(name = "u-meeting")]
#[command(about = "Schedule meeting requests with hosts via a binary quadratic model")]
struct Cli {
    /// Path to the input JSON document
    input: PathBuf,
}

fn run(cli: &Cli) -> Result<OutputDocument> {
    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input file {}", cli.input.display()))?;
    info!(path = %cli.input.display(), "input loaded");
    Ok(api::process(&text))
}

fn emit(doc: &OutputDocument) {
    match serde_json::to_string_pretty(doc) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = %e, "failed to serialize result");
            println!(r#"{{"status":"ERROR","error":"failed to serialize result"}}"#);
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(doc) => {
            info!(status = ?doc.status, backend = %doc.quantum_backend, "done");
            emit(&doc);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            emit(&OutputDocument::error(format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}
