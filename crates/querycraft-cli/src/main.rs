//! querycraft CLI
//!
//! Command-line front end for the query model: parse SQL into the editor's
//! JSON document, render documents back to SQL, and reformat SQL through a
//! parse/generate round trip.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use querycraft_core::{generate, parse_with_diagnostics, Catalog, Document, Parsed};

/// Parse and regenerate SQL for a visual query editor.
#[derive(Parser)]
#[command(name = "querycraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Table catalog (JSON); the built-in demo catalog when not given.
    #[arg(short, long, env = "QUERYCRAFT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse SQL and print the document as JSON.
    Parse {
        /// SQL file (stdin if not specified or `-`).
        file: Option<PathBuf>,

        /// Print the parts of the input that were left out to stderr.
        #[arg(short, long)]
        diagnostics: bool,

        /// Print compact JSON.
        #[arg(long)]
        compact: bool,
    },

    /// Render a JSON document as SQL.
    Generate {
        /// Document JSON file (stdin if not specified or `-`).
        file: Option<PathBuf>,
    },

    /// Parse SQL and print it in canonical form.
    Format {
        /// SQL file (stdin if not specified or `-`).
        file: Option<PathBuf>,

        /// Print the parts of the input that were left out to stderr.
        #[arg(short, long)]
        diagnostics: bool,
    },

    /// List the tables a query can select from, with their columns.
    Tables {
        /// SQL file whose CTEs are listed too.
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Parse {
            file,
            diagnostics,
            compact,
        } => {
            let parsed = parse_input(file.as_deref(), diagnostics)?;
            let json = if compact {
                serde_json::to_string(&parsed.document)?
            } else {
                serde_json::to_string_pretty(&parsed.document)?
            };
            println!("{json}");
        }

        Commands::Generate { file } => {
            let text = read_input(file.as_deref())?;
            let document: Document =
                serde_json::from_str(&text).context("input is not a query document")?;
            println!("{}", generate(&document));
        }

        Commands::Format { file, diagnostics } => {
            let parsed = parse_input(file.as_deref(), diagnostics)?;
            println!("{}", generate(&parsed.document));
        }

        Commands::Tables { file } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let document = match file {
                Some(path) => parse_input(Some(path.as_path()), false)?.document,
                None => Document::default(),
            };
            for table in catalog.available_tables(&document) {
                let columns = catalog.columns_of(&table, &document).unwrap_or_default();
                let marker = if document.is_cte(&table) { " (CTE)" } else { "" };
                println!("{table}{marker}: {}", columns.join(", "));
            }
        }
    }

    Ok(())
}

/// Reads a file, or stdin for `None` / `-`.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            debug!(path = %path.display(), "reading input");
            fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
        }
        _ => {
            debug!("reading stdin");
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("cannot read stdin")?;
            Ok(text)
        }
    }
}

fn parse_input(path: Option<&Path>, show_diagnostics: bool) -> anyhow::Result<Parsed> {
    let sql = read_input(path)?;
    let parsed = parse_with_diagnostics(&sql)?;
    if show_diagnostics {
        for diagnostic in &parsed.diagnostics {
            eprintln!("{diagnostic}");
        }
    } else if !parsed.diagnostics.is_empty() {
        info!(
            "{} part(s) of the input were left out; use --diagnostics to list them",
            parsed.diagnostics.len()
        );
    }
    Ok(parsed)
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    let Some(path) = path else {
        debug!("using demo catalog");
        return Ok(Catalog::demo());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read catalog {}", path.display()))?;
    let catalog = serde_json::from_str(&text)
        .with_context(|| format!("invalid catalog {}", path.display()))?;
    Ok(catalog)
}
