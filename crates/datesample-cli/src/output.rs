use std::io::{self, Write};

use datesample_core::CalendarDate;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::envelope::Envelope;
use crate::error::CliError;

/// Render a successful command to stdout.
///
/// Warnings travel in the envelope for json, and go to stderr otherwise.
pub fn render<T: Serialize>(
    envelope: &Envelope<T>,
    dates: &[CalendarDate],
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => write_json(&mut out, envelope, pretty)?,
        OutputFormat::Text | OutputFormat::Csv => {
            for warning in &envelope.meta.warnings {
                eprintln!("warning: {warning}");
            }
            write_dates(&mut out, dates, format)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Render a failed command: an error envelope on stdout for json, plain lines
/// on stderr otherwise.
pub fn render_error<T: Serialize>(
    envelope: &Envelope<T>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_json(&mut out, envelope, pretty)?;
            out.flush()?;
        }
        OutputFormat::Text | OutputFormat::Csv => {
            let stderr = io::stderr();
            let mut err = stderr.lock();
            for error in &envelope.errors {
                match &error.fields {
                    Some(fields) => writeln!(err, "error: {} (fields {fields:?})", error.message)?,
                    None => writeln!(err, "error: {} [{}]", error.message, error.code)?,
                }
            }
        }
    }

    Ok(())
}

fn write_json<W: Write, T: Serialize>(
    out: &mut W,
    envelope: &Envelope<T>,
    pretty: bool,
) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, envelope)?;
    } else {
        serde_json::to_writer(&mut *out, envelope)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_dates<W: Write>(
    out: &mut W,
    dates: &[CalendarDate],
    format: OutputFormat,
) -> Result<(), CliError> {
    if format == OutputFormat::Csv {
        writeln!(out, "date")?;
    }
    for date in dates {
        writeln!(out, "{date}")?;
    }
    Ok(())
}
