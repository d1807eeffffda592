//! Implementation of the `casimir-sweep nodes` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{format_g, output, CommandOutput, NodeRow, TableFormatter};
use crate::cli::types::OutputFormat;
use crate::domain::models::Config;
use crate::services::GaussLaguerre;

#[derive(Args, Debug, Default)]
pub struct NodesArgs {
    /// Number of Gauss-Laguerre nodes
    #[arg(short = 'n', long)]
    pub nodes: Option<usize>,

    /// Geometry parameter L/R, sets the frequency scaling
    #[arg(long)]
    pub size_ratio: Option<f64>,

    /// Output layout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct NodesOutput {
    pub alpha: f64,
    pub nodes: Vec<NodeRow>,
    #[serde(skip)]
    pub format: OutputFormat,
}

impl CommandOutput for NodesOutput {
    fn to_human(&self) -> String {
        match self.format {
            OutputFormat::Table => TableFormatter::new().format_nodes(&self.nodes),
            OutputFormat::Json => serde_json::to_string_pretty(&self.to_json()).unwrap_or_default(),
            OutputFormat::Text => self
                .nodes
                .iter()
                .map(|row| {
                    format!(
                        "# k={}, x={}, w={}, xi={}",
                        row.k,
                        format_g(row.x, 15),
                        format_g(row.weight, 15),
                        format_g(row.xi, 15)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Builds the node listing for `degree` nodes and scaling `alpha`
pub fn node_rows(degree: usize, alpha: f64) -> Result<Vec<NodeRow>> {
    let rule = GaussLaguerre::new(degree).context("Failed to compute quadrature rule")?;
    Ok(rule
        .nodes
        .iter()
        .zip(&rule.weights)
        .enumerate()
        .map(|(k, (&x, &weight))| NodeRow {
            k,
            x,
            weight,
            xi: x / alpha,
        })
        .collect())
}

pub async fn execute(args: NodesArgs, mut config: Config, json_mode: bool) -> Result<()> {
    if let Some(nodes) = args.nodes {
        config.nodes = nodes;
    }
    if let Some(size_ratio) = args.size_ratio {
        config.size_ratio = size_ratio;
    }

    let alpha = config.alpha();
    let nodes_output = NodesOutput {
        alpha,
        nodes: node_rows(config.nodes, alpha)?,
        format: args.format,
    };
    output(&nodes_output, json_mode);
    Ok(())
}
