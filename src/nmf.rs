//! Symmetric NMF optimizer.
//!
//! Given the normalized similarity matrix `W` (N x N) and a non-negative seed `H₀`
//! (N x k), repeatedly apply the damped multiplicative update
//!
//! ```text
//! H ← H ∘ (1 − β + β · (W·H) / (H·Hᵀ·H))
//! ```
//!
//! until the squared Frobenius distance between consecutive iterates drops below
//! `epsilon` or `max_iter` updates have run. Each factor is a ratio of non-negative
//! quantities, so a non-negative seed stays non-negative.
//!
//! The denominator is formed as `(H·Hᵀ)·H`: an N x N intermediate followed by an
//! N x k product. `H·(Hᵀ·H)` is cheaper and equal in exact arithmetic, but rounds
//! differently, so the N x N route is kept.

use log::{debug, trace, warn};
use rand::prelude::*;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Default cap on update iterations.
pub const DEFAULT_MAX_ITER: usize = 300;
/// Default threshold on the squared Frobenius norm of successive iterates.
pub const DEFAULT_EPSILON: f64 = 1e-4;
/// Default damping weight of the multiplicative update.
pub const DEFAULT_BETA: f64 = 0.5;

/// Convergence parameters for [`optimize`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymNmfParams {
    /// Maximum number of updates (at least 1).
    pub max_iter: usize,

    /// Stop once `||H_t − H_{t−1}||²_F < epsilon`.
    ///
    /// Note the comparison is against the *squared* norm.
    pub epsilon: f64,

    /// Update weight in `(0, 1]`. `1.0` is the undamped multiplicative rule.
    pub beta: f64,
}

impl Default for SymNmfParams {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            epsilon: DEFAULT_EPSILON,
            beta: DEFAULT_BETA,
        }
    }
}

impl SymNmfParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if !(self.epsilon > 0.0) {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be positive",
            });
        }
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "beta",
                message: "must be in (0, 1]",
            });
        }
        Ok(())
    }
}

/// Why the optimizer stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// Successive iterates moved less than `epsilon`.
    Converged,
    /// `max_iter` updates ran without meeting the threshold.
    MaxIterReached,
}

/// Output of [`optimize`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymNmfFit {
    /// Final N x k factor `H`.
    pub factor: Matrix,
    /// Number of updates applied.
    pub iterations: usize,
    /// Squared Frobenius distance between the last two iterates.
    pub last_delta: f64,
    /// Terminal state of the iteration.
    pub stop_reason: StopReason,
}

impl SymNmfFit {
    /// Whether the run ended on the convergence threshold.
    pub fn converged(&self) -> bool {
        self.stop_reason == StopReason::Converged
    }

    /// Hard cluster labels (row-wise argmax of the factor).
    pub fn labels(&self) -> Vec<usize> {
        assign_clusters(&self.factor)
    }
}

/// One multiplicative update of `current` against the normalized similarity matrix.
///
/// Fails with [`Error::DivisionByZero`] if an entry of `(H·Hᵀ)·H` is exactly zero,
/// which happens when a row or a column of `current` is all zeros.
pub fn update_step(current: &Matrix, normalized: &Matrix, beta: f64) -> Result<Matrix> {
    if !normalized.is_square() {
        return Err(Error::DimensionMismatch {
            expected: normalized.rows(),
            found: normalized.cols(),
        });
    }

    let wh = normalized.multiply(current)?;
    let ht = current.transpose()?;
    let hht = current.multiply(&ht)?;
    ht.release();
    let hhth = hht.multiply(current)?;
    hht.release();

    let (n, k) = current.shape();
    let mut next = Matrix::zeros(n, k)?;
    for i in 0..n {
        for j in 0..k {
            let denom = hhth[(i, j)];
            if denom == 0.0 {
                return Err(Error::DivisionByZero { row: i, col: j });
            }
            next[(i, j)] = current[(i, j)] * (1.0 - beta * (1.0 - wh[(i, j)] / denom));
        }
    }
    Ok(next)
}

/// Run multiplicative updates from `initial` until convergence or `params.max_iter`.
///
/// `initial` is not modified; the returned factor is a fresh matrix. Every replaced
/// iterate is dropped as soon as its successor exists.
///
/// A seed with an all-zero row or column passes validation but fails the first
/// update with [`Error::DivisionByZero`].
pub fn optimize(initial: &Matrix, normalized: &Matrix, params: &SymNmfParams) -> Result<SymNmfFit> {
    params.validate()?;
    validate_factor(initial, normalized)?;

    let mut current = initial.clone();
    let mut iterations = 0;

    loop {
        let next = update_step(&current, normalized, params.beta)?;
        let delta = next.difference(&current)?.frobenius_norm_squared();
        current = next;
        iterations += 1;
        trace!("symnmf iteration {iterations}: delta {delta:e}");

        if delta < params.epsilon {
            debug!("symnmf converged after {iterations} iterations (delta {delta:e})");
            return Ok(SymNmfFit {
                factor: current,
                iterations,
                last_delta: delta,
                stop_reason: StopReason::Converged,
            });
        }
        if iterations >= params.max_iter {
            warn!(
                "symnmf stopped at max_iter={} with delta {delta:e} (epsilon {:e})",
                params.max_iter, params.epsilon
            );
            return Ok(SymNmfFit {
                factor: current,
                iterations,
                last_delta: delta,
                stop_reason: StopReason::MaxIterReached,
            });
        }
    }
}

/// Random non-negative seed for [`optimize`].
///
/// Entries are drawn uniformly from `[0, 2·√(mean(W)/k))` with a `StdRng` seeded
/// from `seed`, so the same inputs always give the same factor.
pub fn initialize_factor(normalized: &Matrix, k: usize, seed: u64) -> Result<Matrix> {
    let n = normalized.rows();
    check_rank(k, n)?;

    let upper = 2.0 * (normalized.mean() / k as f64).sqrt();
    if !(upper > 0.0 && upper.is_finite()) {
        return Err(Error::InvalidParameter {
            name: "normalized",
            message: "mean entry must be positive and finite",
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::from_fn(n, k, |_, _| rng.random_range(0.0..upper))
}

/// Hard assignment: index of the largest entry in each row (first wins on ties).
pub fn assign_clusters(factor: &Matrix) -> Vec<usize> {
    factor.iter_rows().map(argmax).collect()
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

fn check_rank(k: usize, n: usize) -> Result<()> {
    if k == 0 || k >= n {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: n,
        });
    }
    Ok(())
}

fn validate_factor(initial: &Matrix, normalized: &Matrix) -> Result<()> {
    if !normalized.is_square() {
        return Err(Error::DimensionMismatch {
            expected: normalized.rows(),
            found: normalized.cols(),
        });
    }
    let n = normalized.rows();
    if initial.rows() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            found: initial.rows(),
        });
    }
    check_rank(initial.cols(), n)?;
    if initial
        .as_slice()
        .iter()
        .any(|v| !v.is_finite() || *v < 0.0)
    {
        return Err(Error::InvalidParameter {
            name: "initial",
            message: "entries must be finite and non-negative",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph;

    fn swap2() -> Matrix {
        Matrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap()
    }

    fn two_blobs() -> Matrix {
        Matrix::from_rows(&[
            [0.0, 0.0],
            [0.2, 0.1],
            [0.1, 0.3],
            [5.0, 5.0],
            [5.2, 4.9],
            [4.8, 5.1],
        ])
        .unwrap()
    }

    #[test]
    fn update_step_hand_computed() {
        // W·H = [1, 1]ᵀ, (H·Hᵀ)·H = [2, 2]ᵀ, so each entry becomes 1·(1 − 0.5·0.5).
        let h = Matrix::from_rows(&[[1.0], [1.0]]).unwrap();
        let next = update_step(&h, &swap2(), 0.5).unwrap();
        assert_eq!(next.to_rows(), vec![vec![0.75], vec![0.75]]);
        // Input untouched.
        assert_eq!(h[(0, 0)], 1.0);
    }

    #[test]
    fn update_step_beta_one_is_plain_ratio() {
        let h = Matrix::from_rows(&[[1.0], [1.0]]).unwrap();
        let next = update_step(&h, &swap2(), 1.0).unwrap();
        assert_eq!(next.to_rows(), vec![vec![0.5], vec![0.5]]);
    }

    #[test]
    fn update_step_zero_row_is_division_by_zero() {
        let h = Matrix::from_rows(&[[0.0], [1.0]]).unwrap();
        let err = update_step(&h, &swap2(), 0.5).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero { row: 0, col: 0 }));
    }

    #[test]
    fn zero_column_seed_fails_on_first_update() {
        let w = graph::normalized_similarity(&two_blobs()).unwrap();
        let h0 = Matrix::from_rows(&[
            [0.5, 0.0],
            [0.4, 0.0],
            [0.3, 0.0],
            [0.5, 0.0],
            [0.4, 0.0],
            [0.3, 0.0],
        ])
        .unwrap();
        assert!(matches!(
            optimize(&h0, &w, &SymNmfParams::default()),
            Err(Error::DivisionByZero { row: 0, col: 1 })
        ));
    }

    #[test]
    fn update_step_rejects_non_square_w() {
        let h = Matrix::from_rows(&[[1.0], [1.0]]).unwrap();
        let w = Matrix::zeros(2, 3).unwrap();
        assert!(matches!(
            update_step(&h, &w, 0.5),
            Err(Error::DimensionMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn fixed_point_converges_in_one_step() {
        // H = [a, a]ᵀ with 2a³ = a is a fixed point of the update.
        let a = std::f64::consts::FRAC_1_SQRT_2;
        let h = Matrix::from_rows(&[[a], [a]]).unwrap();
        let fit = optimize(&h, &swap2(), &SymNmfParams::default()).unwrap();

        assert_eq!(fit.iterations, 1);
        assert_eq!(fit.stop_reason, StopReason::Converged);
        assert!(fit.converged());
        assert!(fit.last_delta < 1e-20);
    }

    #[test]
    fn max_iter_bounds_the_loop() {
        let h = Matrix::from_rows(&[[2.0], [0.1]]).unwrap();
        let params = SymNmfParams {
            max_iter: 3,
            epsilon: 1e-30,
            ..SymNmfParams::default()
        };
        let fit = optimize(&h, &swap2(), &params).unwrap();
        assert_eq!(fit.iterations, 3);
        assert_eq!(fit.stop_reason, StopReason::MaxIterReached);
        assert!(fit.last_delta >= params.epsilon);
    }

    #[test]
    fn optimize_keeps_factor_non_negative_and_separates_blobs() {
        let points = two_blobs();
        let w = graph::normalized_similarity(&points).unwrap();
        let h0 = Matrix::from_rows(&[
            [0.4, 0.2],
            [0.3, 0.25],
            [0.35, 0.3],
            [0.2, 0.3],
            [0.3, 0.35],
            [0.25, 0.4],
        ])
        .unwrap();

        let fit = optimize(&h0, &w, &SymNmfParams::default()).unwrap();
        assert_eq!(fit.factor.shape(), (6, 2));
        assert!(fit.iterations <= DEFAULT_MAX_ITER);
        assert!(fit.factor.as_slice().iter().all(|&v| v >= 0.0));
        if fit.converged() {
            assert!(fit.last_delta < DEFAULT_EPSILON);
        }

        let labels = fit.labels();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn optimize_validates_inputs() {
        let w = swap2();
        let h = Matrix::from_rows(&[[1.0], [1.0]]).unwrap();

        // k must be below N.
        let wide = Matrix::from_rows(&[[1.0, 1.0], [1.0, 1.0]]).unwrap();
        assert!(matches!(
            optimize(&wide, &w, &SymNmfParams::default()),
            Err(Error::InvalidClusterCount { requested: 2, n_items: 2 })
        ));

        // Row count must match W.
        let tall = Matrix::from_rows(&[[1.0], [1.0], [1.0]]).unwrap();
        assert!(matches!(
            optimize(&tall, &w, &SymNmfParams::default()),
            Err(Error::DimensionMismatch { expected: 2, found: 3 })
        ));

        let negative = Matrix::from_rows(&[[1.0], [-1.0]]).unwrap();
        assert!(matches!(
            optimize(&negative, &w, &SymNmfParams::default()),
            Err(Error::InvalidParameter { name: "initial", .. })
        ));

        for params in [
            SymNmfParams { max_iter: 0, ..SymNmfParams::default() },
            SymNmfParams { epsilon: 0.0, ..SymNmfParams::default() },
            SymNmfParams { epsilon: f64::NAN, ..SymNmfParams::default() },
            SymNmfParams { beta: 0.0, ..SymNmfParams::default() },
            SymNmfParams { beta: 1.5, ..SymNmfParams::default() },
        ] {
            assert!(matches!(
                optimize(&h, &w, &params),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn initialize_factor_is_seeded_and_bounded() {
        let w = graph::normalized_similarity(&two_blobs()).unwrap();
        let a = initialize_factor(&w, 2, 1234).unwrap();
        let b = initialize_factor(&w, 2, 1234).unwrap();
        let c = initialize_factor(&w, 2, 99).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let upper = 2.0 * (w.mean() / 2.0).sqrt();
        assert!(a.as_slice().iter().all(|&v| (0.0..upper).contains(&v)));
    }

    #[test]
    fn initialize_factor_rejects_bad_rank() {
        let w = swap2();
        assert!(matches!(
            initialize_factor(&w, 0, 1),
            Err(Error::InvalidClusterCount { requested: 0, n_items: 2 })
        ));
        assert!(matches!(
            initialize_factor(&w, 2, 1),
            Err(Error::InvalidClusterCount { requested: 2, n_items: 2 })
        ));
    }

    #[test]
    fn assign_clusters_takes_first_maximum() {
        let h = Matrix::from_rows(&[[0.1, 0.9, 0.3], [0.5, 0.5, 0.2], [0.0, 0.0, 0.7]]).unwrap();
        assert_eq!(assign_clusters(&h), vec![1, 0, 2]);
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), 1);
        assert_eq!(argmax(&[2.0]), 0);
    }
}
