//! Similarity graph construction.
//!
//! Points become vertices of a complete weighted graph with Gaussian edge weights:
//!
//! ```text
//! A[i][j] = exp(-||p_i - p_j||² / 2)   (i != j),   A[i][i] = 0
//! D[i][i] = Σ_j A[i][j]
//! W       = D^(-1/2) · A · D^(-1/2)
//! ```
//!
//! `W` is the matrix SymNMF factorizes. A vertex whose weights all underflow to zero
//! (a point very far from every other point) has zero degree; normalizing it would
//! divide by zero, so [`normalized_similarity`] reports [`Error::SingularMatrix`]
//! instead of producing `inf`.

use log::debug;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Squared Euclidean distance between two points of equal dimension.
#[inline]
pub fn squared_euclidean(p: &[f64], q: &[f64]) -> f64 {
    debug_assert_eq!(p.len(), q.len());
    p.iter()
        .zip(q.iter())
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum()
}

/// Gaussian similarity matrix `A` of an `N x d` point set.
///
/// The result is exactly symmetric: each pair is evaluated once and mirrored.
/// Fails with [`Error::InvalidParameter`] if any coordinate is `NaN` or infinite.
pub fn similarity(points: &Matrix) -> Result<Matrix> {
    if points.as_slice().iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidParameter {
            name: "points",
            message: "coordinates must be finite",
        });
    }
    let n = points.rows();
    let mut a = Matrix::zeros(n, n)?;
    for i in 0..n {
        for j in (i + 1)..n {
            let w = (-squared_euclidean(points.row(i), points.row(j)) / 2.0).exp();
            a[(i, j)] = w;
            a[(j, i)] = w;
        }
    }
    Ok(a)
}

/// Diagonal degree matrix of an already-built similarity matrix.
pub fn degree_from_similarity(a: &Matrix) -> Result<Matrix> {
    ensure_square(a)?;
    let n = a.rows();
    let mut d = Matrix::zeros(n, n)?;
    for i in 0..n {
        d[(i, i)] = a.row(i).iter().sum();
    }
    Ok(d)
}

/// Diagonal degree matrix `D` of a point set.
pub fn degree(points: &Matrix) -> Result<Matrix> {
    let a = similarity(points)?;
    degree_from_similarity(&a)
}

/// Raise every diagonal entry of `d` to `power`; off-diagonal cells of the result are 0.
///
/// Fails with [`Error::SingularMatrix`] if an entry has no finite power: zero under a
/// negative power, or a negative entry under a fractional one.
pub fn diagonal_power(d: &Matrix, power: f64) -> Result<Matrix> {
    ensure_square(d)?;
    let n = d.rows();
    let mut out = Matrix::zeros(n, n)?;
    for i in 0..n {
        let v = d[(i, i)].powf(power);
        if !v.is_finite() {
            return Err(Error::SingularMatrix { index: i });
        }
        out[(i, i)] = v;
    }
    Ok(out)
}

/// Normalized similarity `W = D^(-1/2) · A · D^(-1/2)`.
pub fn normalized_similarity(points: &Matrix) -> Result<Matrix> {
    let a = similarity(points)?;
    let d = degree_from_similarity(&a)?;
    let d_inv_sqrt = diagonal_power(&d, -0.5)?;
    d.release();

    let left = d_inv_sqrt.multiply(&a)?;
    a.release();
    let w = left.multiply(&d_inv_sqrt)?;

    debug!("normalized similarity built for {} points", points.rows());
    Ok(w)
}

fn ensure_square(m: &Matrix) -> Result<()> {
    if m.is_square() {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            expected: m.rows(),
            found: m.cols(),
        })
    }
}
