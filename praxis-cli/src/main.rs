//! Praxis CLI - Inspect recorded ReAct completions

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use praxis_core::audit::{LoggingAuditHook, ObservedParser};
use praxis_core::config::PraxisConfig;
use praxis_core::parsing::{OutputParser, format_instructions, safe_repair};
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Exit code for a completion that failed to parse
const PARSE_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "praxis")]
#[command(about = "ReAct completion parser CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to praxis.toml and PRAXIS_* variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one completion and print the decision as JSON
    Parse {
        /// File holding the completion (stdin if omitted)
        file: Option<PathBuf>,

        /// Available tool names, listed in re-prompt instructions
        #[arg(long, value_delimiter = ',')]
        tools: Vec<String>,

        /// Log the raw completion before parsing
        #[arg(long)]
        audit: bool,
    },
    /// Repair a near-JSON tool input fragment
    Repair {
        /// File holding the fragment (stdin if omitted)
        file: Option<PathBuf>,
    },
    /// Print the ReAct format instructions
    Format {
        /// Available tool names
        #[arg(long, value_delimiter = ',')]
        tools: Vec<String>,
    },
    /// Version information
    Version,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PraxisConfig::from_file(path)?,
        None => PraxisConfig::load()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.filter))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse { file, tools, audit } => {
            let completion = read_input(file.as_deref()).await?;
            return parse_completion(&config, &completion, &tools, audit);
        }
        Commands::Repair { file } => {
            let fragment = read_input(file.as_deref()).await?;
            println!("{}", safe_repair(&fragment));
        }
        Commands::Format { tools } => {
            println!("{}", format_instructions(&tool_refs(&tools)));
        }
        Commands::Version => {
            println!("praxis {}", env!("CARGO_PKG_VERSION"));
            println!("praxis-core {}", praxis_core::VERSION);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_completion(
    config: &PraxisConfig,
    completion: &str,
    tools: &[String],
    audit: bool,
) -> Result<ExitCode> {
    let mut parser = ObservedParser::from_config(config);
    if audit {
        parser = parser.with_hook(Arc::new(LoggingAuditHook));
    }

    match parser.parse(completion) {
        Ok(decision) => {
            println!("{}", serde_json::to_string_pretty(&decision)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            debug!(kind = %error.kind, "Completion failed to parse");
            let mut report = serde_json::to_value(&error)?;
            if !tools.is_empty() {
                report["instructions"] = format_instructions(&tool_refs(tools)).into();
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::from(PARSE_FAILURE))
        }
    }
}

async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn tool_refs(tools: &[String]) -> Vec<&str> {
    tools.iter().map(String::as_str).collect()
}
