//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - generate: run the full template → chat → parse pipeline
//! - render: dry-run render a template without calling the chat endpoint
//! - templates: list available templates
//! - parse: parse a raw response from a file or stdin

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Promptr - prompt template pipeline with structured response parsing
#[derive(Parser, Debug)]
#[command(name = "promptr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a structured response from a user description
    Generate {
        /// Description substituted into the template
        description: String,

        /// Template name (without extension)
        #[arg(short, long)]
        template: Option<String>,

        /// Extraction strategy (strict-json, heuristic-slice)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Model override
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Render a template without calling the chat endpoint
    Render {
        /// Template name (without extension)
        template: String,

        /// Placeholder values as key=value pairs
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,
    },

    /// List available templates
    Templates,

    /// Parse a raw response into think and data segments
    Parse {
        /// File containing the raw response; reads stdin when omitted
        file: Option<PathBuf>,

        /// Extraction strategy (strict-json, heuristic-slice)
        #[arg(short, long)]
        strategy: Option<String>,
    },
}
