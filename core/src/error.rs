use std::collections::TryReserveError;

use thiserror::Error;

/// Failures surfaced by graph mutations and copies.
///
/// Absent keys, duplicate insertions and rejected weights are not errors;
/// those operations report "no change" through their return value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Every index up to the configured limit has been handed out.
    #[error("vertex index space exhausted (limit {limit})")]
    IndexSpaceExhausted { limit: usize },

    /// The source of a copy holds more vertices than the copy ceiling allows.
    #[error("copy aborted: source graph exceeds {ceiling} vertices")]
    CopyCeilingExceeded { ceiling: usize },

    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Reported by `Graph::check_invariants`.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
