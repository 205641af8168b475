/// Euclidean distance between two points.
#[inline]
pub(crate) fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    crate::graph::squared_euclidean(a, b).sqrt()
}
