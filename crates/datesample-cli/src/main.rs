mod cli;
mod commands;
mod envelope;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::envelope::{Envelope, EnvelopeMeta};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(code = error.exit_code(), error = %error, "command failed");
            if let Err(render_error) = report(&cli, &error) {
                eprintln!("error: {error}");
                eprintln!("error: failed to render error output: {render_error}");
            }
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_logging() {
    // Logs go to stderr so stdout stays machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let result = commands::run(cli).await?;

    let meta = EnvelopeMeta::new(result.seed)?.with_warnings(result.warnings);

    let envelope = Envelope::success(meta, result.data);
    output::render(&envelope, &result.dates, cli.format, cli.pretty)
}

fn report(cli: &Cli, error: &CliError) -> Result<(), CliError> {
    let envelope = Envelope::failure(EnvelopeMeta::new(None)?, Value::Null, error.envelope_errors());
    output::render_error(&envelope, cli.format, cli.pretty)
}
