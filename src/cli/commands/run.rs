//! Implementation of the `casimir-sweep run` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::cli::output::{format_g, output, CommandOutput, SweepProgress, TableFormatter};
use crate::cli::types::OutputFormat;
use crate::domain::models::{Config, ExecutorBackend, SweepResult};
use crate::domain::ports::{Evaluator, NullProgress, ProgressSink};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::evaluators::CommandEvaluator;
use crate::infrastructure::executors::build_executor;
use crate::services::run_sweep;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Relative tolerance of the row convergence test
    #[arg(long)]
    pub precision: Option<f64>,

    /// Geometry parameter L/R
    #[arg(long)]
    pub size_ratio: Option<f64>,

    /// Number of concurrent evaluations
    #[arg(short = 'p', long)]
    pub pool_size: Option<usize>,

    /// Number of Gauss-Laguerre nodes
    #[arg(short = 'n', long)]
    pub nodes: Option<usize>,

    /// Order-index upper bound
    #[arg(long)]
    pub lmax: Option<u32>,

    /// Delay between unproductive drain attempts, in milliseconds
    #[arg(long)]
    pub idle_ms: Option<u64>,

    /// In-flight tasks left undrained at the end (defaults to the pool size)
    #[arg(long)]
    pub final_residue: Option<usize>,

    /// Resubmissions per failed evaluation before aborting
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Worker pool backend (blocking, rayon)
    #[arg(long)]
    pub backend: Option<ExecutorBackend>,

    /// Output layout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Applies command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        if let Some(size_ratio) = self.size_ratio {
            config.size_ratio = size_ratio;
        }
        if let Some(pool_size) = self.pool_size {
            config.pool_size = pool_size;
        }
        if let Some(nodes) = self.nodes {
            config.nodes = nodes;
        }
        if let Some(lmax) = self.lmax {
            config.lmax = lmax;
        }
        if let Some(idle_ms) = self.idle_ms {
            config.pacing.idle_ms = idle_ms;
            config.pacing.max_idle_ms = config.pacing.max_idle_ms.max(idle_ms);
        }
        if let Some(final_residue) = self.final_residue {
            config.final_residue = Some(final_residue);
        }
        if let Some(max_retries) = self.max_retries {
            config.retry.max_retries = max_retries;
        }
        if let Some(backend) = self.backend {
            config.executor.backend = backend;
        }
    }
}

/// Sweep result plus its rendering choices
#[derive(Debug, Serialize)]
pub struct RunOutput {
    #[serde(flatten)]
    pub result: SweepResult,
    #[serde(skip)]
    pub format: OutputFormat,
}

impl RunOutput {
    /// One `# k=.., x=.., logdetD(xi=x/alpha)=..` line per node
    pub fn text_lines(&self) -> Vec<String> {
        self.result
            .sums
            .iter()
            .map(|sum| {
                format!(
                    "# k={}, x={}, logdetD(xi=x/alpha)={}",
                    sum.k,
                    format_g(sum.x, 6),
                    format_g(sum.log_det_d, 15)
                )
            })
            .collect()
    }
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        match self.format {
            OutputFormat::Table => {
                TableFormatter::new().format_sums(&self.result.sums, &self.result.report)
            }
            OutputFormat::Json => serde_json::to_string_pretty(&self.to_json()).unwrap_or_default(),
            OutputFormat::Text => self.text_lines().join("\n"),
        }
    }
}

pub async fn execute(args: RunArgs, mut config: Config, json_mode: bool) -> Result<()> {
    args.apply(&mut config);
    ConfigLoader::validate(&config).context("Invalid run configuration")?;

    let runtime = Handle::try_current().context("Evaluator needs a tokio runtime")?;
    let evaluator: Arc<dyn Evaluator> =
        Arc::new(CommandEvaluator::new(&config.evaluator, runtime));
    let executor = build_executor(config.executor.backend, config.pool_size)?;

    let show_progress = !json_mode
        && !args.no_progress
        && args.format != OutputFormat::Json
        && std::io::stderr().is_terminal();
    let progress: Arc<dyn ProgressSink> = if show_progress {
        Arc::new(SweepProgress::new(config.lmax))
    } else {
        Arc::new(NullProgress)
    };

    let result = run_sweep(&config, evaluator, executor, progress)
        .await
        .context("Sweep failed")?;

    let run_output = RunOutput {
        result,
        format: args.format,
    };
    output(&run_output, json_mode);
    Ok(())
}
