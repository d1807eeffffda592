//! Exact floating-point summation.
//!
//! Shewchuk's algorithm: the running sum is kept as a list of
//! non-overlapping partials, so no rounding happens until the final
//! collapse. The result is the correctly rounded sum of the inputs and does
//! not depend on their order.

/// Correctly rounded sum of `values`
///
/// Non-finite inputs make the result non-finite (`inf + -inf` is NaN).
pub fn exact_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut partials: Vec<f64> = Vec::new();
    let mut special = 0.0_f64;
    let mut has_special = false;

    for value in values {
        if !value.is_finite() {
            special += value;
            has_special = true;
            continue;
        }

        let mut x = value;
        let mut kept = 0;
        for j in 0..partials.len() {
            let mut y = partials[j];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let hi = x + y;
            let lo = y - (hi - x);
            if lo != 0.0 {
                partials[kept] = lo;
                kept += 1;
            }
            x = hi;
        }
        partials.truncate(kept);
        partials.push(x);
    }

    if has_special {
        return special;
    }

    collapse(&partials)
}

/// Sums the partials from the top, fixing up half-way rounding cases
fn collapse(partials: &[f64]) -> f64 {
    let Some((&top, _)) = partials.split_last() else {
        return 0.0;
    };

    let mut n = partials.len() - 1;
    let mut hi = top;
    let mut lo = 0.0;
    while n > 0 {
        n -= 1;
        let x = hi;
        let y = partials[n];
        hi = x + y;
        lo = y - (hi - x);
        if lo != 0.0 {
            break;
        }
    }

    // Round half-even: the remaining partials may push `lo` over the halfway point
    if n > 0 && ((lo < 0.0 && partials[n - 1] < 0.0) || (lo > 0.0 && partials[n - 1] > 0.0)) {
        let y = lo * 2.0;
        let x = hi + y;
        if y == x - hi {
            hi = x;
        }
    }

    hi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(exact_sum(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_cancellation() {
        assert_eq!(exact_sum([1e100, 1.0, -1e100]), 1.0);
        assert_eq!(exact_sum([1e16, 1.0, 1e-16, -1e16]), 1.0);
    }

    #[test]
    fn test_tenths() {
        let naive: f64 = std::iter::repeat(0.1).take(10).sum();
        assert_ne!(naive, 1.0);
        assert_eq!(exact_sum(std::iter::repeat(0.1).take(10)), 1.0);
    }

    #[test]
    fn test_order_independent() {
        let values = [-3.5e-12, -1.0, -4.25e3, -7.0e-30, -0.125, -1.0e10, -2.0e-5];
        let forward = exact_sum(values);
        let backward = exact_sum(values.iter().rev().copied());
        let mut shuffled = values;
        shuffled.swap(0, 5);
        shuffled.swap(2, 6);
        assert_eq!(forward, backward);
        assert_eq!(forward, exact_sum(shuffled));
    }

    #[test]
    fn test_half_even_rounding() {
        // 1 + 2^-53 + 2^-105 rounds up past the tie
        let values = [1.0, 2f64.powi(-53), 2f64.powi(-105)];
        assert_eq!(exact_sum(values), 1.0 + f64::EPSILON);
    }

    #[test]
    fn test_non_finite() {
        assert!(exact_sum([1.0, f64::INFINITY]).is_infinite());
        assert!(exact_sum([f64::INFINITY, f64::NEG_INFINITY]).is_nan());
        assert!(exact_sum([1.0, f64::NAN]).is_nan());
    }
}
