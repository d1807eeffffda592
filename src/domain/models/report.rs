use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reduced sum of one quadrature node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSum {
    /// Row index (quadrature node index)
    pub k: usize,
    /// Quadrature node rescaled by the scaling constant, `x * alpha`
    pub x: f64,
    /// Exact sum of the row after the order-zero correction
    pub log_det_d: f64,
}

/// Bookkeeping of one driver run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Tasks handed to the scheduler, retries included
    pub submitted: u64,
    /// Tasks drained with a value
    pub completed: u64,
    /// Resubmissions after a failed evaluation
    pub retried: u64,
    /// Tasks still in flight when the final drain stopped
    pub abandoned: u64,
    /// Highest order index at which any task was submitted
    pub max_order: u32,
    /// Largest number of tasks in flight right after a submission
    pub peak_outstanding: usize,
    /// True when every row converged before the order bound
    pub converged_early: bool,
    /// Written cells per row
    pub orders_per_node: Vec<usize>,
}

/// Output of a completed sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    pub report: RunReport,
    pub sums: Vec<NodeSum>,
}
