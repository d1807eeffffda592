use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::runtime::Handle;
use tracing::debug;

use crate::domain::error::EvalError;
use crate::domain::models::EvaluatorConfig;
use crate::domain::ports::{EvalRequest, Evaluator};

const STDERR_EXCERPT_CHARS: usize = 512;

/// Evaluator backed by an external program
///
/// Each call runs `program args...` with the placeholders `{size_ratio}`,
/// `{xi}`, `{m}` and `{lmax}` replaced, and reads the value from the last
/// non-empty line of stdout.
///
/// Calls block the worker thread on `runtime` while the child runs, so they
/// must come from a thread that is not driving that runtime (a blocking-pool
/// or rayon thread).
#[derive(Debug, Clone)]
pub struct CommandEvaluator {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    runtime: Handle,
}

impl CommandEvaluator {
    pub fn new(config: &EvaluatorConfig, runtime: Handle) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: config.timeout_ms.map(Duration::from_millis),
            runtime,
        }
    }

    /// Arguments for one request
    pub fn render_args(&self, request: &EvalRequest) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{size_ratio}", &request.size_ratio.to_string())
                    .replace("{xi}", &request.xi.to_string())
                    .replace("{m}", &request.m.to_string())
                    .replace("{lmax}", &request.lmax.to_string())
            })
            .collect()
    }

    async fn run(&self, args: &[String]) -> Result<Output, EvalError> {
        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EvalError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        let output = child.wait_with_output();
        let output = match self.timeout {
            // Dropping the timed out future kills the child
            Some(timeout) => tokio::time::timeout(timeout, output).await.map_err(|_| {
                EvalError::Timeout {
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }
            })?,
            None => output.await,
        };

        output.map_err(|e| EvalError::Failed(format!("waiting for evaluator: {e}")))
    }
}

impl Evaluator for CommandEvaluator {
    fn log_det_d(&self, request: &EvalRequest) -> Result<f64, EvalError> {
        let args = self.render_args(request);
        let output = self.runtime.block_on(self.run(&args))?;

        if !output.status.success() {
            return Err(EvalError::NonZeroExit {
                status: output.status.to_string(),
                stderr: excerpt(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        let value = parse_value(&String::from_utf8_lossy(&output.stdout))?;
        debug!(xi = request.xi, m = request.m, value, "evaluator finished");
        Ok(value)
    }
}

/// Parses the last non-empty line of `stdout` as a finite float
pub fn parse_value(stdout: &str) -> Result<f64, EvalError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .ok_or_else(|| EvalError::UnparsableOutput(String::new()))?;

    let value: f64 = line
        .parse()
        .map_err(|_| EvalError::UnparsableOutput(line.to_string()))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite(value))
    }
}

fn excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.chars().count() <= STDERR_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let tail: String = trimmed
        .chars()
        .rev()
        .take(STDERR_EXCERPT_CHARS)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("...{tail}")
}
