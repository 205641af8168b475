//! K-means (Lloyd iterations) with deterministic seeding.
//!
//! This is the baseline the analysis pipeline compares SymNMF against. Centroids start
//! at the first `k` points (no random seeding), points go to the nearest centroid by
//! Euclidean distance, and centroids move to the mean of their members. A centroid
//! that loses all its members collapses to the origin rather than being re-seeded.
//!
//! Iteration stops once every centroid moves less than `epsilon` (plain Euclidean
//! distance, unlike the squared threshold SymNMF uses) or after `max_iter` passes.

use log::debug;

use super::traits::Clustering;
use super::util;
use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// K-means clusterer.
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    max_iter: usize,
    epsilon: f64,
}

/// Result of a k-means run.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Final centroids, one per cluster.
    pub centroids: Vec<Vec<f64>>,
    /// Cluster label per input point.
    pub labels: Vec<usize>,
    /// Number of assignment passes performed.
    pub iterations: usize,
}

impl Kmeans {
    /// Create a k-means clusterer with `max_iter = 300` and `epsilon = 1e-4`.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            epsilon: 1e-4,
        }
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the centroid-movement convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Run k-means and return centroids and labels.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KmeansFit> {
        let points = Matrix::from_rows(data)?;
        let (n, d) = points.shape();

        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
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

        let mut centroids: Vec<Vec<f64>> = (0..self.k).map(|i| points.row(i).to_vec()).collect();
        let mut labels = vec![0usize; n];
        let mut iterations = 0;

        loop {
            iterations += 1;
            let mut sums = vec![vec![0.0; d]; self.k];
            let mut counts = vec![0usize; self.k];

            for (i, p) in points.iter_rows().enumerate() {
                let mut best = 0;
                let mut best_dist = f64::INFINITY;
                for (c, centroid) in centroids.iter().enumerate() {
                    let dist = util::euclidean(p, centroid);
                    if dist < best_dist {
                        best_dist = dist;
                        best = c;
                    }
                }
                labels[i] = best;
                counts[best] += 1;
                for (s, &x) in sums[best].iter_mut().zip(p) {
                    *s += x;
                }
            }

            for (sum, &count) in sums.iter_mut().zip(&counts) {
                if count > 0 {
                    for s in sum.iter_mut() {
                        *s /= count as f64;
                    }
                }
            }

            let settled = sums
                .iter()
                .zip(&centroids)
                .all(|(next, cur)| util::euclidean(next, cur) < self.epsilon);
            centroids = sums;
            if settled {
                debug!("kmeans settled after {iterations} iterations");
                break;
            }
            if iterations >= self.max_iter {
                break;
            }
        }

        Ok(KmeansFit {
            centroids,
            labels,
            iterations,
        })
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}
