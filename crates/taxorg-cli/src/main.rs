//! Command-line interface for taxorg.
//!
//! Reads a PDF, dispatches it through the parser registry, and prints the
//! extraction result as JSON on stdout. `--probe` only reports which parser
//! claims the file.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use taxorg::ExtractionConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "taxorg",
    version,
    about = "Extract structured data from tax organizer PDFs"
)]
struct Cli {
    /// Path to the PDF to process
    file: PathBuf,

    /// Only probe: print the claiming parser's name and exit
    #[arg(long)]
    probe: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Path to a TOML configuration file (default: taxorg.toml beside the
    /// input file, when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<ExtractionConfig> {
    if let Some(path) = &cli.config {
        return ExtractionConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }

    // Convention: a taxorg.toml next to the input file applies to it.
    if let Some(dir) = cli.file.parent() {
        let candidate = dir.join("taxorg.toml");
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config discovered beside input");
            return ExtractionConfig::from_toml_file(&candidate)
                .with_context(|| format!("failed to load config from {}", candidate.display()));
        }
    }

    Ok(ExtractionConfig::default())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let content = tokio::fs::read(&cli.file)
        .await
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    if cli.probe {
        return match taxorg::find_parser(&content) {
            Some(parser) => {
                println!("{}", parser.name());
                Ok(())
            }
            None => {
                eprintln!("no registered parser recognizes {}", cli.file.display());
                std::process::exit(1);
            }
        };
    }

    let result = taxorg::parse_bytes(&content, &config).await?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    Ok(())
}
