//! SymNMF and k-means on a simple 2D dataset.

use symnmf::{graph, metrics, Clustering, Kmeans, Matrix, SymNmf};

fn main() {
    // Three well-separated clusters in 2D.
    let data: Vec<Vec<f64>> = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Cluster C (near (10, 0))
        vec![10.0, 0.0],
        vec![10.1, 0.1],
        vec![9.9, -0.1],
        vec![10.2, 0.2],
    ];

    // --- Normalized similarity ---
    let points = Matrix::from_rows(&data).unwrap();
    let w = graph::normalized_similarity(&points).unwrap();
    println!("=== W (first 4 rows) ===");
    for row in w.iter_rows().take(4) {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:.4}")).collect();
        println!("  {}", cells.join(","));
    }

    // --- SymNMF (k=3) ---
    let model = SymNmf::new(3).with_seed(1234);
    let fit = model.fit(&data).unwrap();
    let labels = fit.labels();
    println!(
        "\n=== SymNMF (k=3, {} iterations, {:?}) ===",
        fit.iterations, fit.stop_reason
    );
    for (i, label) in labels.iter().enumerate() {
        println!("  point {:2} ({:5.1}, {:5.1}) => cluster {}", i, data[i][0], data[i][1], label);
    }
    if let Ok(score) = metrics::silhouette_score(&data, &labels) {
        println!("  silhouette: {score:.4}");
    }

    // --- K-means (k=3) ---
    let kmeans = Kmeans::new(3);
    let labels = kmeans.fit_predict(&data).unwrap();
    println!("\n=== K-means (k=3) ===");
    for (i, label) in labels.iter().enumerate() {
        println!("  point {:2} ({:5.1}, {:5.1}) => cluster {}", i, data[i][0], data[i][1], label);
    }
    if let Ok(score) = metrics::silhouette_score(&data, &labels) {
        println!("  silhouette: {score:.4}");
    }
}
