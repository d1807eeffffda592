//! Reduction of the result matrix to one sum per quadrature node.

use crate::domain::models::{NodeSum, ResultMatrix};
use crate::services::exact_sum::exact_sum;
use crate::services::quadrature::FrequencyGrid;

/// Order-zero terms of a Matsubara sum carry a factor of one half
const ZERO_ORDER_WEIGHT: f64 = 0.5;

/// Terms of one row ready for summation
///
/// Empty cells become zero and the order-zero term is halved.
pub fn finalized_row(matrix: &ResultMatrix, row: usize) -> Vec<f64> {
    matrix
        .row(row)
        .iter()
        .enumerate()
        .map(|(m, cell)| {
            let value = cell.unwrap_or(0.0);
            if m == 0 {
                value * ZERO_ORDER_WEIGHT
            } else {
                value
            }
        })
        .collect()
}

/// Exact sum of every finalized row
pub fn row_sums(matrix: &ResultMatrix) -> Vec<f64> {
    (0..matrix.rows())
        .map(|row| exact_sum(finalized_row(matrix, row)))
        .collect()
}

/// Per-node output: index, node rescaled by `alpha` and row sum
pub fn aggregate(matrix: &ResultMatrix, grid: &FrequencyGrid) -> Vec<NodeSum> {
    row_sums(matrix)
        .into_iter()
        .enumerate()
        .map(|(k, log_det_d)| NodeSum {
            k,
            x: grid.node(k) * grid.alpha(),
            log_det_d,
        })
        .collect()
}
