use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for a sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Relative tolerance of the row convergence test
    #[serde(default = "default_precision")]
    pub precision: f64,

    /// Geometry parameter L/R handed to the evaluator
    #[serde(default = "default_size_ratio")]
    pub size_ratio: f64,

    /// Number of concurrent evaluations
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Number of Gauss-Laguerre quadrature nodes
    #[serde(default = "default_nodes")]
    pub nodes: usize,

    /// Order-index upper bound (exclusive), also passed to the evaluator
    #[serde(default = "default_lmax")]
    pub lmax: u32,

    /// In-flight tasks tolerated when the final drain stops (None = pool size)
    #[serde(default)]
    pub final_residue: Option<usize>,

    /// Poll pacing between drain attempts
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Evaluation retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Execution backend
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// External evaluator program
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

const fn default_precision() -> f64 {
    1e-12
}

const fn default_size_ratio() -> f64 {
    0.05
}

const fn default_pool_size() -> usize {
    6
}

const fn default_nodes() -> usize {
    80
}

const fn default_lmax() -> u32 {
    160
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            size_ratio: default_size_ratio(),
            pool_size: default_pool_size(),
            nodes: default_nodes(),
            lmax: default_lmax(),
            final_residue: None,
            pacing: PacingConfig::default(),
            retry: RetryConfig::default(),
            executor: ExecutorConfig::default(),
            evaluator: EvaluatorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Scaling constant between quadrature nodes and Matsubara frequencies
    pub fn alpha(&self) -> f64 {
        2.0 * self.size_ratio / (1.0 + self.size_ratio)
    }

    /// Residue bound of the final drain
    pub fn effective_final_residue(&self) -> usize {
        self.final_residue.unwrap_or(self.pool_size)
    }
}

/// Poll pacing configuration
///
/// The wait starts at `idle_ms` and grows by `multiplier` after every
/// unproductive poll, capped at `max_idle_ms`. A productive poll resets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PacingConfig {
    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,

    #[serde(default = "default_idle_ms")]
    pub max_idle_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

const fn default_idle_ms() -> u64 {
    2
}

const fn default_multiplier() -> f64 {
    1.0
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            idle_ms: default_idle_ms(),
            max_idle_ms: default_idle_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// Retry policy for failed evaluations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Resubmissions per key after a failure (0 = abort on first failure)
    #[serde(default)]
    pub max_retries: u32,
}

/// Which worker pool runs the evaluator
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorBackend {
    /// tokio blocking thread pool gated by a semaphore
    #[default]
    Blocking,
    /// Dedicated rayon thread pool
    Rayon,
}

impl std::str::FromStr for ExecutorBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blocking" => Ok(Self::Blocking),
            "rayon" => Ok(Self::Rayon),
            other => Err(format!("unknown executor backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExecutorConfig {
    #[serde(default)]
    pub backend: ExecutorBackend,
}

/// External evaluator program
///
/// `args` may contain the placeholders `{size_ratio}`, `{xi}`, `{m}` and
/// `{lmax}`; the program must print the value as the last line of stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EvaluatorConfig {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Kill the evaluator after this many milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_program() -> String {
    "casimir-logdetd".to_string()
}

fn default_args() -> Vec<String> {
    ["{size_ratio}", "{xi}", "{m}", "{lmax}"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            timeout_ms: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling JSON log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation of the log files: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
