//! Symmetric non-negative matrix factorization for clustering.
//!
//! `symnmf` turns a dense point set into a Gaussian similarity graph and factorizes its
//! degree-normalized adjacency `W ≈ H·Hᵀ` with a non-negative, low-rank `H`:
//!
//! - [`matrix`]: a small dense matrix engine (multiply, transpose, difference, norms)
//! - [`graph`]: similarity `A`, degree `D`, and normalized similarity `W`
//! - [`nmf`]: the multiplicative-update optimizer and factor seeding
//! - [`cluster`]: `SymNmf` and a k-means baseline behind a common [`Clustering`] trait
//! - [`metrics`]: silhouette score
//! - [`io`]: comma-separated point files
//!
//! ```rust
//! use symnmf::{graph, nmf, Matrix, SymNmfParams};
//!
//! let points = Matrix::from_rows(&[[0.0, 0.0], [0.1, 0.2], [5.0, 5.0], [5.1, 4.9]]).unwrap();
//! let w = graph::normalized_similarity(&points).unwrap();
//! let h0 = nmf::initialize_factor(&w, 2, 1234).unwrap();
//! let fit = nmf::optimize(&h0, &w, &SymNmfParams::default()).unwrap();
//! assert_eq!(fit.factor.shape(), (4, 2));
//! ```

#![cfg_attr(not(feature = "python"), forbid(unsafe_code))]

pub mod cluster;
pub mod error;
pub mod graph;
pub mod io;
pub mod matrix;
pub mod metrics;
pub mod nmf;

#[cfg(feature = "python")]
pub mod python;

pub use cluster::{Clustering, Kmeans, KmeansFit, SymNmf};
pub use error::{Error, Result};
pub use matrix::Matrix;
pub use nmf::{StopReason, SymNmfFit, SymNmfParams};
