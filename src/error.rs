//! Error types for triangulation construction and refinement

use thiserror::Error;

/// Errors that can occur while building or refining a triangulation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriangulationError {
    /// A neighbor or segment was referenced in a state that does not allow it
    /// (added twice, removed while absent, queried while absent)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A geometric search that must succeed on consistent input found nothing.
    ///
    /// The network is left in an unspecified state and must be discarded.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for triangulation operations
pub type Result<T> = std::result::Result<T, TriangulationError>;
