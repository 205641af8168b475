//! SymNMF clustering: similarity graph, seeded factor, multiplicative updates.

use log::debug;

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::graph;
use crate::matrix::Matrix;
use crate::nmf::{self, SymNmfFit, SymNmfParams};

/// Seed used for the initial factor unless overridden.
pub const DEFAULT_SEED: u64 = 1234;

/// SymNMF clusterer.
///
/// Builds the normalized similarity matrix `W` of the input points, seeds an N x k
/// factor from `W` (see [`nmf::initialize_factor`]) and optimizes it. Labels are the
/// row-wise argmax of the final factor.
#[derive(Debug, Clone)]
pub struct SymNmf {
    k: usize,
    params: SymNmfParams,
    seed: u64,
}

impl SymNmf {
    /// Create a clusterer for `k` clusters with default convergence parameters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            params: SymNmfParams::default(),
            seed: DEFAULT_SEED,
        }
    }

    /// Set the maximum number of updates.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.params.max_iter = max_iter;
        self
    }

    /// Set the squared-norm convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.params.epsilon = epsilon;
        self
    }

    /// Set the update weight.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.params.beta = beta;
        self
    }

    /// Replace all convergence parameters at once.
    pub fn with_params(mut self, params: SymNmfParams) -> Self {
        self.params = params;
        self
    }

    /// Set the RNG seed for the initial factor.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Convergence parameters in use.
    pub fn params(&self) -> &SymNmfParams {
        &self.params
    }

    /// Run the full pipeline on row-vector points.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<SymNmfFit> {
        let points = Matrix::from_rows(data)?;
        self.fit_points(&points)
    }

    /// Run the full pipeline on an `N x d` point matrix.
    pub fn fit_points(&self, points: &Matrix) -> Result<SymNmfFit> {
        let n = points.rows();
        if self.k == 0 || self.k >= n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        let w = graph::normalized_similarity(points)?;
        let h0 = nmf::initialize_factor(&w, self.k, self.seed)?;
        let fit = nmf::optimize(&h0, &w, &self.params)?;
        debug!(
            "symnmf fit: n={n} k={} iterations={} stop={:?}",
            self.k, fit.iterations, fit.stop_reason
        );
        Ok(fit)
    }
}

impl Clustering for SymNmf {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}
