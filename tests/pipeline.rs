//! End-to-end checks through the public API: point file → W → factor → labels.

use symnmf::cluster::{Clustering, Kmeans, SymNmf};
use symnmf::{graph, io, metrics, nmf, Error, Matrix, SymNmfParams};

const BLOBS: &str = "\
0.0,0.0
0.3,0.1
0.1,0.2
-0.2,0.1
8.0,8.0
8.1,7.8
7.9,8.2
8.2,8.1
";

#[test]
fn coincident_points_scenario() {
    let points = io::parse_points("0,0\n0,0\n").unwrap();

    assert_eq!(
        graph::similarity(&points).unwrap().to_string(),
        "0.0000,1.0000\n1.0000,0.0000\n"
    );
    assert_eq!(
        graph::degree(&points).unwrap().to_string(),
        "1.0000,0.0000\n0.0000,1.0000\n"
    );
    assert_eq!(
        graph::normalized_similarity(&points).unwrap().to_string(),
        "0.0000,1.0000\n1.0000,0.0000\n"
    );
}

#[test]
fn zero_diagonal_with_negative_power_fails() {
    let d = Matrix::from_rows(&[[0.0, 0.0], [0.0, 4.0]]).unwrap();
    assert!(matches!(
        graph::diagonal_power(&d, -0.5),
        Err(Error::SingularMatrix { index: 0 })
    ));
}

#[test]
fn factorization_pipeline_on_blobs() {
    let points = io::parse_points(BLOBS).unwrap();
    let w = graph::normalized_similarity(&points).unwrap();
    let h0 = nmf::initialize_factor(&w, 2, 1234).unwrap();

    let params = SymNmfParams {
        max_iter: 2000,
        epsilon: 1e-12,
        ..SymNmfParams::default()
    };
    let fit = nmf::optimize(&h0, &w, &params).unwrap();

    // Seed is left untouched and the factor stays non-negative.
    assert_eq!(h0, nmf::initialize_factor(&w, 2, 1234).unwrap());
    assert!(fit.factor.as_slice().iter().all(|&v| v >= 0.0));
    assert!(fit.iterations <= params.max_iter);

    let labels = fit.labels();
    assert!(labels[..4].iter().all(|&l| l == labels[0]));
    assert!(labels[4..].iter().all(|&l| l == labels[4]));
    assert_ne!(labels[0], labels[4]);
}

#[test]
fn analysis_scores_well_separated_blobs() {
    let points = io::parse_points(BLOBS).unwrap();
    let data = points.to_rows();

    let nmf_labels = SymNmf::new(2)
        .with_epsilon(1e-12)
        .with_max_iter(2000)
        .fit_predict(&data)
        .unwrap();
    let kmeans_labels = Kmeans::new(2).fit_predict(&data).unwrap();

    let nmf_score = metrics::silhouette_score(&data, &nmf_labels).unwrap();
    let kmeans_score = metrics::silhouette_score(&data, &kmeans_labels).unwrap();

    assert!(nmf_score > 0.9, "nmf silhouette {nmf_score}");
    assert!(kmeans_score > 0.9, "kmeans silhouette {kmeans_score}");
}

#[test]
fn read_points_from_file() {
    let path = std::env::temp_dir().join(format!("symnmf-points-{}.txt", std::process::id()));
    std::fs::write(&path, BLOBS).unwrap();

    let points = io::read_points(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(points.shape(), (8, 2));
    assert_eq!(points.row(5), &[8.1, 7.8]);
}

#[test]
fn optimize_rejects_rank_at_least_n() {
    let points = io::parse_points("0,0\n1,1\n").unwrap();
    let w = graph::normalized_similarity(&points).unwrap();
    let h = Matrix::from_rows(&[[0.5, 0.5], [0.5, 0.5]]).unwrap();
    assert!(matches!(
        nmf::optimize(&h, &w, &SymNmfParams::default()),
        Err(Error::InvalidClusterCount { requested: 2, n_items: 2 })
    ));
}

#[cfg(feature = "serde")]
#[test]
fn fit_serializes_to_json() {
    let points = io::parse_points(BLOBS).unwrap();
    let fit = SymNmf::new(2).with_max_iter(5).fit_points(&points).unwrap();

    let json = serde_json::to_string(&fit).unwrap();
    let back: symnmf::SymNmfFit = serde_json::from_str(&json).unwrap();
    assert_eq!(back.factor.shape(), fit.factor.shape());
    for (a, b) in back.factor.as_slice().iter().zip(fit.factor.as_slice()) {
        assert!((a - b).abs() <= 1e-12);
    }
    assert_eq!(back.stop_reason, fit.stop_reason);
    assert_eq!(back.iterations, fit.iterations);

    let params: SymNmfParams =
        serde_json::from_str(r#"{"max_iter":50,"epsilon":1e-6,"beta":0.5}"#).unwrap();
    assert_eq!(params.max_iter, 50);

    // Shape must match the buffer.
    assert!(serde_json::from_str::<Matrix>(r#"{"rows":2,"cols":2,"data":[1.0]}"#).is_err());
    assert!(serde_json::from_str::<Matrix>(r#"{"rows":0,"cols":2,"data":[]}"#).is_err());
}
