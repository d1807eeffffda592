//! Driver loop: walks the order index outward, keeps the worker pool busy and
//! stops once every row has converged.
//!
//! State machine:
//! - `Advancing { m }`: submit (xi, m) for every row that has not converged,
//!   draining whenever the pool is full
//! - `DrainingFinal`: drain until at most the residue bound is in flight
//! - `Done`

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::error::{DriverError, EvalError};
use crate::domain::models::{Config, PacingConfig, ResultMatrix, RunReport, TaskKey};
use crate::domain::ports::ProgressSink;
use crate::services::convergence::row_converged;
use crate::services::pacing::PollPacing;
use crate::services::quadrature::FrequencyGrid;
use crate::services::scheduler::Scheduler;

/// Settings the driver loop needs out of [`Config`]
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub precision: f64,
    pub pool_size: usize,
    pub lmax: u32,
    pub final_residue: usize,
    pub max_retries: u32,
    pub pacing: PacingConfig,
}

impl From<&Config> for DriverConfig {
    fn from(config: &Config) -> Self {
        Self {
            precision: config.precision,
            pool_size: config.pool_size,
            lmax: config.lmax,
            final_residue: config.effective_final_residue(),
            max_retries: config.retry.max_retries,
            pacing: config.pacing.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Advancing { m: u32 },
    DrainingFinal,
    Done,
}

/// Matrix and bookkeeping produced by a finished run
#[derive(Debug, Clone)]
pub struct DriverOutput {
    pub matrix: ResultMatrix,
    pub report: RunReport,
}

#[derive(Debug, Default)]
struct Counters {
    submitted: u64,
    completed: u64,
    retried: u64,
    abandoned: u64,
    max_order: u32,
    peak_outstanding: usize,
    converged_early: bool,
}

/// Single-threaded cooperative driver
///
/// Owns the result matrix; the scheduler only hands back drained results,
/// so no cell is ever touched from a worker thread.
pub struct Driver<'g> {
    config: DriverConfig,
    grid: &'g FrequencyGrid,
    scheduler: Scheduler,
    matrix: ResultMatrix,
    pacing: PollPacing,
    failures: HashMap<TaskKey, u32>,
    counters: Counters,
    progress: Arc<dyn ProgressSink>,
    state: DriverState,
}

impl<'g> Driver<'g> {
    pub fn new(
        config: DriverConfig,
        grid: &'g FrequencyGrid,
        scheduler: Scheduler,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        let matrix = ResultMatrix::new(grid.len(), config.lmax as usize);
        let pacing = PollPacing::new(&config.pacing);
        Self {
            config,
            grid,
            scheduler,
            matrix,
            pacing,
            failures: HashMap::new(),
            counters: Counters::default(),
            progress,
            state: DriverState::Advancing { m: 0 },
        }
    }

    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// Runs the loop to completion
    ///
    /// On error every outstanding task is abandoned before returning.
    pub async fn run(mut self) -> Result<DriverOutput, DriverError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = info_span!("sweep", %run_id);

        let outcome = self.run_states().instrument(span.clone()).await;
        let _entered = span.enter();

        if let Err(err) = outcome {
            let abandoned = self.scheduler.abandon();
            error!(error = %err, abandoned, "sweep aborted");
            return Err(err);
        }

        self.counters.abandoned = self.scheduler.abandon() as u64;
        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            submitted: self.counters.submitted,
            completed: self.counters.completed,
            retried: self.counters.retried,
            abandoned: self.counters.abandoned,
            max_order: self.counters.max_order,
            peak_outstanding: self.counters.peak_outstanding,
            converged_early: self.counters.converged_early,
            orders_per_node: (0..self.matrix.rows())
                .map(|row| self.matrix.written_count(row))
                .collect(),
        };

        info!(
            submitted = report.submitted,
            completed = report.completed,
            retried = report.retried,
            abandoned = report.abandoned,
            max_order = report.max_order,
            peak_outstanding = report.peak_outstanding,
            converged_early = report.converged_early,
            "sweep finished"
        );
        self.progress.finished(&report);

        Ok(DriverOutput {
            matrix: self.matrix,
            report,
        })
    }

    async fn run_states(&mut self) -> Result<(), DriverError> {
        info!(
            nodes = self.grid.len(),
            lmax = self.config.lmax,
            pool_size = self.config.pool_size,
            precision = self.config.precision,
            "sweep started"
        );

        loop {
            match self.state {
                DriverState::Advancing { m } => {
                    self.progress.order_started(m, self.config.lmax);
                    let submitted = self.advance(m).await?;
                    if submitted > 0 {
                        self.counters.max_order = m;
                    }
                    self.progress
                        .order_finished(m, self.grid.len() - submitted, self.grid.len());

                    debug!(
                        m,
                        submitted,
                        outstanding = self.scheduler.outstanding_count(),
                        "order pass finished"
                    );

                    self.state = if submitted == 0 {
                        info!(m, "all rows converged");
                        self.counters.converged_early = true;
                        DriverState::DrainingFinal
                    } else if m + 1 >= self.config.lmax {
                        info!(lmax = self.config.lmax, "order bound reached");
                        DriverState::DrainingFinal
                    } else {
                        DriverState::Advancing { m: m + 1 }
                    };
                }
                DriverState::DrainingFinal => {
                    self.drain_until(self.config.final_residue).await?;
                    self.state = DriverState::Done;
                }
                DriverState::Done => return Ok(()),
            }
        }
    }

    /// One pass over all nodes at order `m`; returns how many were submitted
    async fn advance(&mut self, m: u32) -> Result<usize, DriverError> {
        let mut submitted = 0;
        for row in 0..self.grid.len() {
            if !row_converged(self.matrix.row(row), self.config.precision) {
                self.submit(TaskKey::new(self.grid.xi(row), m))?;
                submitted += 1;
            }

            let below_capacity = self.config.pool_size.saturating_sub(1);
            self.drain_until(below_capacity).await?;
        }
        Ok(submitted)
    }

    fn submit(&mut self, key: TaskKey) -> Result<(), DriverError> {
        self.scheduler.submit(key.xi.value(), key.m)?;
        self.counters.submitted += 1;
        self.counters.peak_outstanding = self
            .counters
            .peak_outstanding
            .max(self.scheduler.outstanding_count());
        Ok(())
    }

    /// Drains and applies results until at most `limit` tasks are in flight
    async fn drain_until(&mut self, limit: usize) -> Result<(), DriverError> {
        while self.scheduler.outstanding_count() > limit {
            let progressed = self.apply_drained()?;
            self.pacing.observe(progressed);
            if !progressed {
                let wait = self.pacing.next_wait();
                self.scheduler.wait_for_completion(wait).await;
            }
        }
        Ok(())
    }

    /// Moves every finished task into the matrix; true if anything finished
    fn apply_drained(&mut self) -> Result<bool, DriverError> {
        let drained = self.scheduler.drain();
        let progressed = !drained.is_empty();

        for task in drained {
            match task.outcome {
                Ok(value) => {
                    let row = self.grid.row_of(task.xi())?;
                    self.matrix.set(row, task.m() as usize, value)?;
                    self.counters.completed += 1;
                    self.progress
                        .task_completed(task.key, self.scheduler.outstanding_count());
                }
                Err(source) => self.retry_or_abort(task.key, source)?,
            }
        }

        Ok(progressed)
    }

    fn retry_or_abort(&mut self, key: TaskKey, source: EvalError) -> Result<(), DriverError> {
        let failures = self.failures.entry(key).or_insert(0);
        *failures += 1;
        let attempts = *failures;

        if attempts <= self.config.max_retries {
            warn!(%key, attempt = attempts, error = %source, "evaluation failed, resubmitting");
            self.counters.retried += 1;
            return self.submit(key);
        }

        error!(%key, attempts, error = %source, "evaluation failed");
        Err(DriverError::Evaluation {
            key,
            attempts,
            source,
        })
    }
}
