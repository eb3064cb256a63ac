//! geoproj CLI - Command-line interface
//!
//! Loads the zone datasets, classifies points and registers projects.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod interactive;
mod map_view;
mod output;
mod output_types;
mod progress;

use clap::Parser;
use cli::Cli;
use errors::CliError;

fn main() {
    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    let result = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(commands::execute(cli)));

    if let Err(error) = result {
        report(error, json);
        std::process::exit(1);
    }
}

fn report(error: anyhow::Error, json: bool) {
    let error = match error.downcast::<CliError>() {
        Ok(cli_error) => cli_error,
        Err(other) => errors::from_anyhow(other),
    };

    if json {
        let output = serde_json::json!({
            "status": "error",
            "message": error.message,
            "context": error.context,
        });
        eprintln!("{}", output);
    } else {
        error.display();
    }
}
