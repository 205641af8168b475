//! Clustering quality metrics.

use std::collections::BTreeMap;

use crate::cluster::util;
use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Mean silhouette coefficient of a labelling, using Euclidean distance.
///
/// For each point, `a` is the mean distance to the other members of its cluster and
/// `b` the smallest mean distance to the members of any other cluster; the point
/// scores `(b − a) / max(a, b)`. Points in singleton clusters score 0, as do points
/// where `a` and `b` are both zero. The result lies in `[-1, 1]`.
///
/// Requires between 2 and `N − 1` distinct labels.
pub fn silhouette_score(data: &[Vec<f64>], labels: &[usize]) -> Result<f64> {
    let points = Matrix::from_rows(data)?;
    let n = points.rows();
    if labels.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            found: labels.len(),
        });
    }

    // Dense cluster ids, numbered by first appearance.
    let mut ids: BTreeMap<usize, usize> = BTreeMap::new();
    for &l in labels {
        let next = ids.len();
        ids.entry(l).or_insert(next);
    }
    let n_clusters = ids.len();
    if n_clusters < 2 || n_clusters >= n {
        return Err(Error::InvalidParameter {
            name: "labels",
            message: "number of distinct labels must be between 2 and n - 1",
        });
    }

    let cluster: Vec<usize> = labels.iter().map(|l| ids[l]).collect();
    let mut sizes = vec![0usize; n_clusters];
    for &c in &cluster {
        sizes[c] += 1;
    }

    let mut total = 0.0;
    let mut dist_sums = vec![0.0; n_clusters];
    for i in 0..n {
        dist_sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                dist_sums[cluster[j]] += util::euclidean(points.row(i), points.row(j));
            }
        }

        let own = cluster[i];
        if sizes[own] == 1 {
            continue;
        }
        let a = dist_sums[own] / (sizes[own] - 1) as f64;
        let b = (0..n_clusters)
            .filter(|&c| c != own)
            .map(|c| dist_sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    Ok(total / n as f64)
}
