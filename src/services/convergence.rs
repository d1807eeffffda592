//! Row convergence test for the order-index series.
//!
//! Physical `logdetD` values are non-positive and decay in magnitude with the
//! order index. A row is accepted once a term is small relative to the
//! leading term, and rejected as soon as a positive term shows up.

/// Decision reached by scanning a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Leading term is zero, or a term decayed below tolerance
    Converged,
    /// A positive term was found, or there is no data at all
    Diverging,
    /// Every value was scanned without an early decision
    Exhausted,
}

/// Scans the values of one row in increasing order index
pub fn verdict(row: &[f64], epsilon: f64) -> Verdict {
    let Some((&v0, rest)) = row.split_first() else {
        return Verdict::Diverging;
    };

    if v0 > 0.0 {
        return Verdict::Diverging;
    }
    if v0 == 0.0 {
        return Verdict::Converged;
    }

    for &vj in rest {
        if vj > 0.0 {
            return Verdict::Diverging;
        }
        if (vj / v0).abs() < epsilon {
            return Verdict::Converged;
        }
    }

    Verdict::Exhausted
}

/// Convergence predicate over a fully available row
///
/// A row that was scanned to the end without rejection counts as converged;
/// the truncation bound is then the convergence criterion.
pub fn accurate(row: &[f64], epsilon: f64) -> bool {
    matches!(verdict(row, epsilon), Verdict::Converged | Verdict::Exhausted)
}

/// Convergence of a row that may still be filling up
///
/// Only the contiguous written prefix is scanned. If the scan runs out of data
/// while the row still has empty cells, the row is not converged yet.
pub fn row_converged(cells: &[Option<f64>], epsilon: f64) -> bool {
    let prefix: Vec<f64> = cells.iter().map_while(|cell| *cell).collect();
    match verdict(&prefix, epsilon) {
        Verdict::Converged => true,
        Verdict::Diverging => false,
        Verdict::Exhausted => prefix.len() == cells.len(),
    }
}
