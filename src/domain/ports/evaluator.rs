use serde::{Deserialize, Serialize};

use crate::domain::error::EvalError;

/// Arguments of one `logdetD` evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalRequest {
    /// Geometry parameter L/R
    pub size_ratio: f64,
    /// Matsubara frequency
    pub xi: f64,
    /// Order index
    pub m: u32,
    /// Truncation bound of the angular-momentum basis
    pub lmax: u32,
}

/// Port for the expensive physics evaluation
///
/// Implementations must be pure with respect to the request and safe to call
/// from several worker threads at once. A call may take seconds.
///
/// Closures with the matching signature implement the trait, which keeps
/// test doubles short:
///
/// ```
/// use casimir_sweep::domain::ports::{EvalRequest, Evaluator};
/// use casimir_sweep::domain::EvalError;
///
/// let stub = |req: &EvalRequest| Ok::<_, EvalError>(-f64::from(req.m + 1));
/// let request = EvalRequest { size_ratio: 0.05, xi: 1.0, m: 2, lmax: 10 };
/// assert_eq!(stub.log_det_d(&request), Ok(-3.0));
/// ```
pub trait Evaluator: Send + Sync {
    fn log_det_d(&self, request: &EvalRequest) -> Result<f64, EvalError>;
}

impl<F> Evaluator for F
where
    F: Fn(&EvalRequest) -> Result<f64, EvalError> + Send + Sync,
{
    fn log_det_d(&self, request: &EvalRequest) -> Result<f64, EvalError> {
        self(request)
    }
}
