//! `symnmf` command-line driver.
//!
//! ```text
//! symnmf sym points.txt
//! symnmf norm points.txt
//! symnmf symnmf 3 points.txt --max-iter 500
//! symnmf analysis 3 points.txt
//! ```
//!
//! Matrices are printed as comma-separated rows with 4 decimal places. Any failure
//! prints `An Error Has Occurred` on stderr and exits with status 1; the cause is
//! logged at `error` level.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{error, info};

use symnmf::cluster::DEFAULT_SEED;
use symnmf::{graph, io, metrics, nmf, Clustering, Kmeans, Matrix, SymNmf};

#[derive(Parser)]
#[command(name = "symnmf")]
#[command(version)]
#[command(about = "Similarity graphs and symmetric NMF clustering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    goal: Goal,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Goal {
    /// Print the similarity matrix A
    Sym {
        /// Comma-separated point file
        file: PathBuf,
    },

    /// Print the diagonal degree matrix D
    Ddg {
        /// Comma-separated point file
        file: PathBuf,
    },

    /// Print the normalized similarity matrix W
    Norm {
        /// Comma-separated point file
        file: PathBuf,
    },

    /// Factorize W and print the N x k factor H
    Symnmf(FactorArgs),

    /// Compare SymNMF and k-means clusterings by silhouette score
    Analysis {
        /// Number of clusters
        k: usize,
        /// Comma-separated point file
        file: PathBuf,
    },
}

#[derive(Args)]
struct FactorArgs {
    /// Number of clusters (factor rank)
    k: usize,

    /// Comma-separated point file
    file: PathBuf,

    /// Maximum number of updates
    #[arg(long, default_value_t = nmf::DEFAULT_MAX_ITER)]
    max_iter: usize,

    /// Threshold on the squared Frobenius norm between iterates
    #[arg(long, default_value_t = nmf::DEFAULT_EPSILON)]
    epsilon: f64,

    /// Update weight in (0, 1]
    #[arg(long, default_value_t = nmf::DEFAULT_BETA)]
    beta: f64,

    /// Seed for the initial factor
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.as_str()),
    )
    .init();

    match run(cli.goal) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("An Error Has Occurred");
            ExitCode::FAILURE
        }
    }
}

fn run(goal: Goal) -> anyhow::Result<()> {
    match goal {
        Goal::Sym { file } => emit(&graph::similarity(&load(&file)?)?),
        Goal::Ddg { file } => emit(&graph::degree(&load(&file)?)?),
        Goal::Norm { file } => emit(&graph::normalized_similarity(&load(&file)?)?),
        Goal::Symnmf(args) => {
            let points = load(&args.file)?;
            let fit = SymNmf::new(args.k)
                .with_max_iter(args.max_iter)
                .with_epsilon(args.epsilon)
                .with_beta(args.beta)
                .with_seed(args.seed)
                .fit_points(&points)?;
            info!(
                "factorization stopped after {} iterations ({:?})",
                fit.iterations, fit.stop_reason
            );
            emit(&fit.factor)
        }
        Goal::Analysis { k, file } => {
            let points = load(&file)?;
            let data = points.to_rows();

            let nmf_labels = SymNmf::new(k).fit_points(&points)?.labels();
            let kmeans_labels = Kmeans::new(k).fit_predict(&data)?;

            let nmf_score = metrics::silhouette_score(&data, &nmf_labels)
                .context("scoring SymNMF labels")?;
            let kmeans_score = metrics::silhouette_score(&data, &kmeans_labels)
                .context("scoring k-means labels")?;

            println!("nmf: {nmf_score:.4}");
            println!("kmeans: {kmeans_score:.4}");
            Ok(())
        }
    }
}

fn load(path: &Path) -> anyhow::Result<Matrix> {
    io::read_points(path).with_context(|| format!("reading points from {}", path.display()))
}

fn emit(matrix: &Matrix) -> anyhow::Result<()> {
    matrix.print().context("writing matrix to stdout")
}
