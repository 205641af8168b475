use thiserror::Error;

/// Errors returned by the matrix engine, graph builder, and optimizer.
#[derive(Debug, Error)]
pub enum Error {
    /// Input has no rows, no columns, or no points.
    #[error("empty input")]
    EmptyInput,

    /// Storage for a matrix could not be obtained.
    #[error("allocation failed for a {rows}x{cols} matrix")]
    AllocationError {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// Operand shapes violate an operation's precondition.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A zero diagonal entry was raised to a negative power (an isolated vertex).
    #[error("singular matrix: diagonal entry {index} is zero")]
    SingularMatrix {
        /// Row/column of the offending diagonal entry.
        index: usize,
    },

    /// The multiplicative update hit a zero denominator.
    #[error("division by zero in update denominator at ({row}, {col})")]
    DivisionByZero {
        /// Row of the zero entry.
        row: usize,
        /// Column of the zero entry.
        col: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Number of clusters (factor rank) requested.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// A point file could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
