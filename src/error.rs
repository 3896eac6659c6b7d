//! Error types for the tableau simplex engine.

use thiserror::Error;

/// Errors that can occur while loading or solving a linear program.
///
/// Optimality, infeasibility and unboundedness are not errors; they are reported through
/// [crate::solver::Outcome].
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// Dimension mismatch or unparsable input
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A basis column has no usable pivot
    #[error("Malformed basis: {0}")]
    MalformedBasis(String),

    /// Iteration cap exceeded, most likely floating point induced cycling
    #[error("Iteration limit of {limit} pivots exceeded")]
    DegenerateCycle { limit: usize },

    /// Dual simplex requested on a tableau with a negative reduced cost
    #[error("Dual simplex requires non-negative reduced costs, column {column} has {value}")]
    InvalidSimplexChoice { column: usize, value: f64 },
}

/// Result type for tableau operations.
pub type Result<T> = std::result::Result<T, Error>;
