//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::config::ConfigArgs;
use crate::cli::commands::nodes::NodesArgs;
use crate::cli::commands::run::RunArgs;

#[derive(Parser, Debug)]
#[command(name = "casimir-sweep")]
#[command(about = "Adaptive Matsubara x order sweep of logdetD", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (replaces .casimir/config.yaml and .casimir/local.yaml)
    #[arg(short, long, global = true, env = "CASIMIR_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the sweep and print one sum per quadrature node
    Run(RunArgs),

    /// Print the quadrature nodes, weights and frequencies
    Nodes(NodesArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Human-readable output layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `# k=.., x=.., logdetD(xi=x/alpha)=..` lines
    #[default]
    Text,
    /// Bordered table
    Table,
    /// JSON document, same as --json
    Json,
}
