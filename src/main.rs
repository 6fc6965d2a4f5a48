//! compose-model - Validated Docker Compose style documents
//!
//! This is the main CLI entry point.

use anyhow::Context;
use clap::{Parser, Subcommand};
use compose_model::compose::{ComposeParser, DockerCompose, OutputFormat};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// compose-model - validate and emit compose documents
#[derive(Parser)]
#[command(name = "compose-model")]
#[command(author = "Evoker Industries")]
#[command(version)]
#[command(about = "Validate and emit Docker Compose style documents", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a compose file
    Validate {
        /// Compose file (searched in the current directory if omitted)
        file: Option<PathBuf>,
    },

    /// Print the default compose document
    Defaults {
        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Validate a compose file and print it in the requested format
    Convert {
        /// Compose file (searched in the current directory if omitted)
        file: Option<PathBuf>,
        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: OutputFormat,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { file } => {
            let path = resolve_compose_file(file)?;
            let compose = load(&path)?;
            println!(
                "{}: valid (version {}, {} services, {} networks)",
                path.display(),
                compose.version,
                compose.services.len(),
                compose.networks.as_ref().map_or(0, |n| n.len())
            );
        }
        Commands::Defaults { format } => {
            let output = ComposeParser::render(&DockerCompose::default(), format)?;
            print!("{}", ensure_newline(output));
        }
        Commands::Convert { file, format } => {
            let path = resolve_compose_file(file)?;
            let compose = load(&path)?;
            let output = ComposeParser::render(&compose, format)?;
            print!("{}", ensure_newline(output));
        }
    }

    Ok(())
}

fn resolve_compose_file(file: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(file) = file {
        return Ok(file);
    }
    let working_dir = std::env::current_dir()?;
    ComposeParser::find_compose_file(&working_dir)
        .with_context(|| format!("No compose file found in {}", working_dir.display()))
}

fn load(path: &Path) -> anyhow::Result<DockerCompose> {
    tracing::info!("Loading compose file: {}", path.display());
    ComposeParser::parse_file(path).with_context(|| format!("Invalid compose file {}", path.display()))
}

fn ensure_newline(mut output: String) -> String {
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}
