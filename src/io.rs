//! Point-file input.
//!
//! A point file holds one point per line as comma-separated decimal numbers, with no
//! header:
//!
//! ```text
//! 0.5,1.25,-3
//! 0.75,1.0,-2.5
//! ```
//!
//! Blank lines are skipped. Output goes through [`Matrix::write_to`], which writes the
//! same layout with 4 decimal places.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Parse comma-separated points.
pub fn parse_points(input: &str) -> Result<Matrix> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = line
            .split(',')
            .map(|field| -> Result<f64> {
                let field = field.trim();
                let value = field.parse::<f64>().map_err(|e| Error::Parse {
                    line: idx + 1,
                    message: format!("invalid number {field:?}: {e}"),
                })?;
                if !value.is_finite() {
                    return Err(Error::Parse {
                        line: idx + 1,
                        message: format!("non-finite number {field:?}"),
                    });
                }
                Ok(value)
            })
            .collect::<Result<Vec<f64>>>()?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(Error::DimensionMismatch {
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    Matrix::from_rows(&rows)
}

/// Read and parse a point file.
pub fn read_points(path: impl AsRef<Path>) -> Result<Matrix> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let points = parse_points(&text)?;
    debug!(
        "read {} points of dimension {} from {}",
        points.rows(),
        points.cols(),
        path.display()
    );
    Ok(points)
}
