//! Dense matrix engine.
//!
//! [`Matrix`] is a rectangular block of `f64` stored row-major in one contiguous
//! buffer. Shape is fixed at construction; every operation that produces a new
//! matrix returns an owned value, and intermediates are released by `Drop` on every
//! exit path (including `?` early returns).
//!
//! The arithmetic is deliberately naive: the triple-loop product is O(r·c·k) and
//! nothing here dispatches to BLAS. Graph sizes this crate targets are small enough
//! for that to be fine.

use std::fmt;
use std::io::{self, Write};
use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// A dense `rows x cols` matrix of `f64`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMatrix"))]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Allocate a zero-filled matrix.
    ///
    /// Fails with [`Error::EmptyInput`] if either dimension is zero and with
    /// [`Error::AllocationError`] if the storage cannot be reserved.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyInput);
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(Error::AllocationError { rows, cols })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::AllocationError { rows, cols })?;
        data.resize(len, 0.0);

        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from row slices.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyInput)?;
        let cols = first.as_ref().len();

        let mut out = Self::zeros(rows.len(), cols)?;
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::DimensionMismatch {
                    expected: cols,
                    found: row.len(),
                });
            }
            out.row_mut(i).copy_from_slice(row);
        }
        Ok(out)
    }

    /// Build a matrix by evaluating `f(i, j)` for every cell.
    pub(crate) fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self> {
        let mut out = Self::zeros(rows, cols)?;
        for i in 0..rows {
            for (j, cell) in out.row_mut(i).iter_mut().enumerate() {
                *cell = f(i, j);
            }
        }
        Ok(out)
    }

    /// Release the matrix storage.
    ///
    /// Equivalent to letting the value go out of scope; provided so call sites that
    /// hand a matrix back can say so explicitly. Releasing twice is impossible since
    /// this consumes `self`.
    pub fn release(self) {
        drop(self);
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the matrix has as many rows as columns.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row `i` as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }

    /// The row-major backing buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy out into nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// Matrix product `self · other`, computed with the classic triple loop.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(Error::DimensionMismatch {
                expected: self.cols,
                found: other.rows,
            });
        }

        let mut out = Matrix::zeros(self.rows, other.cols)?;
        for i in 0..self.rows {
            let lhs = self.row(i);
            for j in 0..other.cols {
                let mut acc = 0.0;
                for (k, &a) in lhs.iter().enumerate() {
                    acc += a * other[(k, j)];
                }
                out[(i, j)] = acc;
            }
        }
        Ok(out)
    }

    /// A new `cols x rows` matrix with entries swapped across the diagonal.
    pub fn transpose(&self) -> Result<Matrix> {
        let mut out = Matrix::zeros(self.cols, self.rows)?;
        for i in 0..self.rows {
            for (j, &v) in self.row(i).iter().enumerate() {
                out[(j, i)] = v;
            }
        }
        Ok(out)
    }

    /// Overwrite `target` with the contents of `self`, in place.
    pub fn copy_into(&self, target: &mut Matrix) -> Result<()> {
        self.ensure_same_shape(target)?;
        target.data.copy_from_slice(&self.data);
        Ok(())
    }

    /// Elementwise `self - other`.
    pub fn difference(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_same_shape(other)?;
        let mut out = Matrix::zeros(self.rows, self.cols)?;
        for ((o, a), b) in out.data.iter_mut().zip(&self.data).zip(&other.data) {
            *o = a - b;
        }
        Ok(out)
    }

    /// Sum of squares of all entries.
    ///
    /// This is the *squared* Frobenius norm; no square root is taken. The optimizer's
    /// convergence test compares this quantity against `epsilon` directly.
    pub fn frobenius_norm_squared(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum()
    }

    /// Arithmetic mean of all entries.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Write rows as comma-separated values with 4 decimal places, one row per line.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }

    /// Print the matrix to standard output in the format of [`Matrix::write_to`].
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock)?;
        lock.flush()
    }

    fn ensure_same_shape(&self, other: &Matrix) -> Result<()> {
        if self.rows != other.rows {
            return Err(Error::DimensionMismatch {
                expected: self.rows,
                found: other.rows,
            });
        }
        if self.cols != other.cols {
            return Err(Error::DimensionMismatch {
                expected: self.cols,
                found: other.cols,
            });
        }
        Ok(())
    }
}

/// Unvalidated wire form; checked against the shape invariant on deserialize.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMatrix> for Matrix {
    type Error = Error;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        if raw.rows == 0 || raw.cols == 0 {
            return Err(Error::EmptyInput);
        }
        let expected = raw
            .rows
            .checked_mul(raw.cols)
            .ok_or(Error::AllocationError {
                rows: raw.rows,
                cols: raw.cols,
            })?;
        if raw.data.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: raw.data.len(),
            });
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            data: raw.data,
        })
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        debug_assert!(j < self.cols);
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        debug_assert!(j < self.cols);
        &mut self.data[i * self.cols + j]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{v:.4}")?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
