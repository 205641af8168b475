//! Clustering front-ends.
//!
//! Both algorithms here produce **hard** assignments (one label per point) through
//! the [`Clustering`] trait.
//!
//! ## SymNMF
//!
//! Symmetric non-negative matrix factorization of the normalized similarity graph:
//!
//! ```text
//! min_{H ≥ 0} ||W − H·Hᵀ||²_F,    H ∈ R^{N×k}
//! ```
//!
//! Each column of `H` behaves like a soft cluster indicator; the hard label of a point
//! is the column with the largest entry in its row. Unlike k-means, the similarity
//! graph lets SymNMF follow non-convex cluster shapes, as long as the Gaussian kernel
//! width (fixed at 1 here) suits the data scale.
//!
//! ## K-means
//!
//! Lloyd iterations seeded with the first `k` points. Used as the reference the
//! analysis pipeline scores SymNMF against.
//!
//! ## Usage
//!
//! ```rust
//! use symnmf::cluster::{Clustering, Kmeans, SymNmf};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![5.0, 5.0],
//!     vec![5.1, 5.1],
//! ];
//!
//! let labels = Kmeans::new(2).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let labels = SymNmf::new(2).with_epsilon(1e-12).fit_predict(&data).unwrap();
//! assert_eq!(labels.len(), data.len());
//! ```

mod kmeans;
mod symnmf;
mod traits;
pub(crate) mod util;

pub use kmeans::{Kmeans, KmeansFit};
pub use symnmf::{SymNmf, DEFAULT_SEED};
pub use traits::Clustering;
