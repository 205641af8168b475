//! Python bindings via PyO3.
//!
//! Matrices cross the boundary as `list[list[float]]`; integers are accepted wherever
//! floats are. Errors raise `ValueError` (`MemoryError` for allocation failures) and
//! never return partial results.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python
//! ```
//!
//! # Usage
//!
//! ```python
//! import symnmf
//!
//! points = [[0.0, 0.0], [0.1, 0.2], [5.0, 5.0], [5.1, 4.9]]
//! w = symnmf.norm(points)
//! h0 = [[0.3, 0.1], [0.3, 0.1], [0.1, 0.3], [0.1, 0.3]]
//! h = symnmf.symnmf(w, 2, h0, max_iter=300, epsilon=1e-4)
//! ```

use pyo3::exceptions::{PyMemoryError, PyValueError};
use pyo3::prelude::*;

use crate::error::Error;
use crate::graph;
use crate::matrix::Matrix;
use crate::nmf::{self, SymNmfParams, DEFAULT_EPSILON, DEFAULT_MAX_ITER};

fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::AllocationError { .. } => PyMemoryError::new_err(err.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn matrix_from(rows: &[Vec<f64>]) -> PyResult<Matrix> {
    Matrix::from_rows(rows).map_err(to_py_err)
}

/// Gaussian similarity matrix of the given points.
#[pyfunction]
fn sym(points: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
    let points = matrix_from(&points)?;
    let a = graph::similarity(&points).map_err(to_py_err)?;
    Ok(a.to_rows())
}

/// Diagonal degree matrix of the given points.
#[pyfunction]
fn ddg(points: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
    let points = matrix_from(&points)?;
    let d = graph::degree(&points).map_err(to_py_err)?;
    Ok(d.to_rows())
}

/// Normalized similarity matrix `D^-1/2 A D^-1/2` of the given points.
#[pyfunction]
fn norm(points: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
    let points = matrix_from(&points)?;
    let w = graph::normalized_similarity(&points).map_err(to_py_err)?;
    Ok(w.to_rows())
}

/// Optimize the N x k factor `h` of the normalized similarity matrix `w`.
///
/// Args:
///     w:        N x N normalized similarity matrix
///     k:        factor rank, must equal the column count of `h`
///     h:        N x k non-negative initial factor
///     max_iter: maximum number of updates (default 300)
///     epsilon:  squared-norm convergence threshold (default 1e-4)
#[pyfunction]
#[pyo3(name = "symnmf", signature = (w, k, h, max_iter=DEFAULT_MAX_ITER, epsilon=DEFAULT_EPSILON))]
fn py_symnmf(
    w: Vec<Vec<f64>>,
    k: usize,
    h: Vec<Vec<f64>>,
    max_iter: usize,
    epsilon: f64,
) -> PyResult<Vec<Vec<f64>>> {
    let w = matrix_from(&w)?;
    let h = matrix_from(&h)?;
    if h.cols() != k {
        return Err(PyValueError::new_err(format!(
            "h must have exactly {k} columns, got {}",
            h.cols()
        )));
    }

    let params = SymNmfParams {
        max_iter,
        epsilon,
        ..SymNmfParams::default()
    };
    let fit = nmf::optimize(&h, &w, &params).map_err(to_py_err)?;
    Ok(fit.factor.to_rows())
}

/// SymNMF similarity graphs and factorization.
#[pymodule]
#[pyo3(name = "symnmf")]
pub fn symnmf_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(sym, m)?)?;
    m.add_function(wrap_pyfunction!(ddg, m)?)?;
    m.add_function(wrap_pyfunction!(norm, m)?)?;
    m.add_function(wrap_pyfunction!(py_symnmf, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
