//! Error types for the puzzle solver.

use thiserror::Error;

/// Failures surfaced by puzzle construction and search.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The board description is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The parity test proved the arrangement can never reach the goal.
    #[error("this puzzle can't be solved")]
    Unsolvable,

    /// An iteration finished without raising the search bound.
    #[error("search bound stalled at {0}")]
    BoundStalled(usize),

    /// A solved state's ancestry could not be walked back to the root.
    #[error("solution state has a broken parent chain")]
    BrokenParentChain,
}

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;
