//! Gauss-Laguerre quadrature and the Matsubara frequency grid built from it.

use std::collections::HashMap;
use thiserror::Error;

use crate::domain::error::MatrixError;
use crate::domain::models::Frequency;

const NEWTON_TOLERANCE: f64 = f64::EPSILON;
const NOISE_FLOOR: f64 = 1.0e-10;
const NEWTON_MAX_ITERATIONS: usize = 100;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuadratureError {
    #[error("Quadrature rule needs at least one node")]
    NoNodes,

    #[error("Newton iteration for node {index} of {degree} did not converge")]
    NoConvergence { index: usize, degree: usize },
}

/// Nodes and weights of the `n`-point Gauss-Laguerre rule (weight `e^-x`)
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLaguerre {
    pub nodes: Vec<f64>,
    pub weights: Vec<f64>,
}

impl GaussLaguerre {
    /// Computes the rule by Newton iteration on the Laguerre recurrence
    ///
    /// Initial guesses follow the usual asymptotic estimates, each root
    /// seeded from the two before it. The recurrence runs in double-double
    /// arithmetic, which puts the nodes within an ulp or so of the exact
    /// roots. Nodes come out in ascending order.
    pub fn new(degree: usize) -> Result<Self, QuadratureError> {
        if degree == 0 {
            return Err(QuadratureError::NoNodes);
        }

        let n = degree as f64;
        let mut nodes: Vec<f64> = Vec::with_capacity(degree);
        let mut weights = Vec::with_capacity(degree);

        for i in 0..degree {
            let mut z = match i {
                0 => 3.0 / (1.0 + 2.4 * n),
                1 => nodes[0] + 15.0 / (1.0 + 2.5 * n),
                _ => {
                    let ai = (i - 1) as f64;
                    let previous = nodes[i - 1];
                    previous + (1.0 + 2.55 * ai) / (1.9 * ai) * (previous - nodes[i - 2])
                }
            };

            let mut converged = false;
            let mut previous_step = f64::INFINITY;
            for _ in 0..NEWTON_MAX_ITERATIONS {
                let (p_n, p_prev) = laguerre_pair(degree, z);
                let derivative = n * (p_n.hi - p_prev.hi) / z;
                let step = (p_n.hi / derivative).abs();
                z -= p_n.hi / derivative;
                // Rounding noise can keep the step above the tolerance; stop
                // once it no longer shrinks.
                let at_noise_floor = step >= previous_step && step <= NOISE_FLOOR * z.abs();
                previous_step = step;
                if step <= NEWTON_TOLERANCE * z.abs() || at_noise_floor {
                    converged = true;
                    break;
                }
            }

            if !converged {
                return Err(QuadratureError::NoConvergence { index: i, degree });
            }
            nodes.push(z);
            weights.push(laguerre_weight(degree, z));
        }

        Ok(Self { nodes, weights })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// `(L_n(z), L_{n-1}(z))` from the three-term recurrence
fn laguerre_pair(n: usize, z: f64) -> (Df64, Df64) {
    let mut p1 = Df64::ONE;
    let mut p2 = Df64::ZERO;
    for j in 1..=n {
        let jf = j as f64;
        let p3 = p2;
        p2 = p1;
        p1 = laguerre_step(jf, z, p2, p3);
    }
    (p1, p2)
}

/// `L_j(z)` from `L_{j-1}(z)` and `L_{j-2}(z)`
fn laguerre_step(j: f64, z: f64, previous: Df64, before: Df64) -> Df64 {
    Df64::two_sum(2.0 * j - 1.0, -z)
        .mul(previous)
        .add(before.scale(j - 1.0).neg())
        .div(j)
}

/// Weight at root `z` of `L_n`: `z / ((n + 1)^2 L_{n+1}(z)^2)`
fn laguerre_weight(n: usize, z: f64) -> f64 {
    let (p_n, p_prev) = laguerre_pair(n, z);
    let next = n as f64 + 1.0;
    let p_next = laguerre_step(next, z, p_n, p_prev).hi;
    z / (next.powi(2) * p_next * p_next)
}

/// Unevaluated sum `hi + lo`, roughly twice the precision of an f64
#[derive(Debug, Clone, Copy)]
struct Df64 {
    hi: f64,
    lo: f64,
}

impl Df64 {
    const ZERO: Self = Self { hi: 0.0, lo: 0.0 };
    const ONE: Self = Self { hi: 1.0, lo: 0.0 };

    fn two_sum(a: f64, b: f64) -> Self {
        let hi = a + b;
        let b_virtual = hi - a;
        let lo = (a - (hi - b_virtual)) + (b - b_virtual);
        Self { hi, lo }
    }

    fn two_prod(a: f64, b: f64) -> Self {
        let hi = a * b;
        Self {
            hi,
            lo: a.mul_add(b, -hi),
        }
    }

    fn add(self, other: Self) -> Self {
        let sum = Self::two_sum(self.hi, other.hi);
        Self::two_sum(sum.hi, sum.lo + (self.lo + other.lo))
    }

    fn mul(self, other: Self) -> Self {
        let product = Self::two_prod(self.hi, other.hi);
        Self::two_sum(
            product.hi,
            product.lo + (self.hi * other.lo + self.lo * other.hi),
        )
    }

    fn scale(self, factor: f64) -> Self {
        let product = Self::two_prod(self.hi, factor);
        Self::two_sum(product.hi, product.lo + self.lo * factor)
    }

    fn div(self, divisor: f64) -> Self {
        let quotient = self.hi / divisor;
        let product = Self::two_prod(quotient, divisor);
        let remainder = (self.hi - product.hi - product.lo + self.lo) / divisor;
        Self::two_sum(quotient, remainder)
    }

    fn neg(self) -> Self {
        Self {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

/// Quadrature nodes mapped to Matsubara frequencies `xi = x / alpha`
///
/// Also the node-to-index map used to resolve a drained task back to its
/// matrix row. Immutable once built.
#[derive(Debug, Clone)]
pub struct FrequencyGrid {
    alpha: f64,
    nodes: Vec<f64>,
    frequencies: Vec<f64>,
    rows: HashMap<Frequency, usize>,
}

impl FrequencyGrid {
    pub fn new(nodes: &[f64], alpha: f64) -> Self {
        let frequencies: Vec<f64> = nodes.iter().map(|x| x / alpha).collect();
        let rows = frequencies
            .iter()
            .enumerate()
            .map(|(row, &xi)| (Frequency(xi), row))
            .collect();

        Self {
            alpha,
            nodes: nodes.to_vec(),
            frequencies,
            rows,
        }
    }

    /// Builds the grid from an `n`-point Gauss-Laguerre rule
    pub fn gauss_laguerre(degree: usize, alpha: f64) -> Result<Self, QuadratureError> {
        let rule = GaussLaguerre::new(degree)?;
        Ok(Self::new(&rule.nodes, alpha))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn xi(&self, row: usize) -> f64 {
        self.frequencies[row]
    }

    pub fn node(&self, row: usize) -> f64 {
        self.nodes[row]
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Row index of a frequency produced by this grid
    pub fn row_of(&self, xi: f64) -> Result<usize, MatrixError> {
        self.rows
            .get(&Frequency(xi))
            .copied()
            .ok_or(MatrixError::UnknownFrequency(xi))
    }
}
