use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use statelint::{Diagnostic, Severity, lint};

/// statelint - checks state machine definitions against the workflow grammar
#[derive(Parser)]
#[command(name = "statelint")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Definition files to lint (reads stdin when empty or `-`)
    files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct FileReport {
    file: String,
    diagnostics: Vec<Diagnostic>,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let inputs = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files
    };

    let mut reports = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let (name, text) = read_input(input)?;
        let diagnostics = lint(&text);
        debug!(file = %name, diagnostics = diagnostics.len(), "linted");
        reports.push(FileReport {
            file: name,
            diagnostics,
        });
    }

    match cli.format {
        OutputFormat::Text => {
            for report in &reports {
                for diagnostic in &report.diagnostics {
                    println!("{}:{}", report.file, diagnostic);
                }
            }
        }
        OutputFormat::Json => {
            let out = serde_json::to_string_pretty(&reports).context("failed to encode report")?;
            println!("{}", out);
        }
    }

    let failed = reports
        .iter()
        .flat_map(|r| &r.diagnostics)
        .any(|d| d.severity == Severity::Error);
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn read_input(input: &Path) -> Result<(String, String)> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read definition from stdin")?;
        return Ok(("<stdin>".to_string(), text));
    }

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read definition file: {}", input.display()))?;
    Ok((input.display().to_string(), text))
}
