//! Service layer: scheduling, convergence, driver loop and reduction.

pub mod aggregator;
pub mod convergence;
pub mod driver;
pub mod exact_sum;
pub mod pacing;
pub mod quadrature;
pub mod scheduler;
pub mod sweep;

pub use aggregator::{aggregate, finalized_row, row_sums};
pub use convergence::{accurate, row_converged, verdict, Verdict};
pub use driver::{Driver, DriverConfig, DriverOutput, DriverState};
pub use exact_sum::exact_sum;
pub use pacing::PollPacing;
pub use quadrature::{FrequencyGrid, GaussLaguerre, QuadratureError};
pub use scheduler::{DrainedTask, Scheduler};
pub use sweep::{run_sweep, run_sweep_on_grid, SweepError};
