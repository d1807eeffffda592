//! Convergence predicate and aggregation checks through the public API

use casimir_sweep::services::{accurate, aggregate, row_converged, row_sums, FrequencyGrid};
use casimir_sweep::ResultMatrix;

const EPS: f64 = 1e-12;

#[test]
fn test_predicate_cases() {
    assert!(accurate(&[-1.0], EPS));
    assert!(accurate(&[0.0], EPS));
    assert!(!accurate(&[1.0], EPS));
    assert!(accurate(&[-1.0, -1e-14], EPS));
    assert!(!accurate(&[-1.0, 1.0], EPS));
}

#[test]
fn test_predicate_follows_tolerance() {
    let row = [-1.0, -1e-9];
    assert!(accurate(&row, 1e-8));
    // Neither decayed nor rejected: accepted once the row is exhausted
    assert!(accurate(&row, 1e-12));
    assert!(!row_converged(&[Some(-1.0), Some(-1e-9), None], 1e-12));
}

#[test]
fn test_matrix_row_converges_as_it_fills() {
    let mut matrix = ResultMatrix::new(1, 4);
    assert!(!row_converged(matrix.row(0), EPS));

    matrix.set(0, 0, -2.0).unwrap();
    assert!(!row_converged(matrix.row(0), EPS));

    matrix.set(0, 2, -1e-15).unwrap();
    assert!(!row_converged(matrix.row(0), EPS), "gap at order 1");

    matrix.set(0, 1, -0.5).unwrap();
    assert!(row_converged(matrix.row(0), EPS));
}

#[test]
fn test_aggregate_partial_row() {
    let mut matrix = ResultMatrix::new(1, 5);
    matrix.set(0, 0, -4.0).unwrap();
    matrix.set(0, 1, -2.0).unwrap();
    matrix.set(0, 2, -1.0).unwrap();

    assert_eq!(row_sums(&matrix), vec![-5.0]);

    let grid = FrequencyGrid::new(&[0.3], 0.1);
    let sums = aggregate(&matrix, &grid);
    assert_eq!(sums.len(), 1);
    assert_eq!(sums[0].log_det_d, -5.0);
    assert_eq!(aggregate(&matrix, &grid), sums);
}

#[test]
fn test_sum_is_exact_across_magnitudes() {
    let mut matrix = ResultMatrix::new(1, 4);
    matrix.set(0, 0, -2.0e16).unwrap();
    matrix.set(0, 1, -1.0).unwrap();
    matrix.set(0, 2, 1.0e16).unwrap();
    matrix.set(0, 3, -1.0).unwrap();

    // -1e16 - 1 + 1e16 - 1, with the halved order-zero term
    assert_eq!(row_sums(&matrix), vec![-2.0]);
}
