// ============================================================================
// Statistics Errors
// Error types shared by the buffer, selector and rounding primitives
// ============================================================================

use std::fmt;

/// Errors raised by decimal statistics operations.
///
/// Every fallible operation validates its input before touching any state,
/// so an `Err` always leaves the receiver unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatsError {
    /// Invalid window, growth factor or rounding context
    Configuration(String),
    /// Argument outside the mathematical domain of the operation
    Domain(String),
    /// Index or element count outside the stored range
    OutOfRange { requested: usize, available: usize },
    /// Operation needs at least one stored element
    EmptyState,
    /// Exact rounding requested but the result has more digits than allowed
    InexactResult(String),
    /// Value cannot be expressed in the requested target representation
    Unrepresentable(String),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Configuration(reason) => write!(f, "invalid configuration: {}", reason),
            StatsError::Domain(reason) => write!(f, "argument out of domain: {}", reason),
            StatsError::OutOfRange {
                requested,
                available,
            } => write!(
                f,
                "out of range: requested {} but only {} element(s) stored",
                requested, available
            ),
            StatsError::EmptyState => write!(f, "no elements stored"),
            StatsError::InexactResult(reason) => write!(f, "inexact result: {}", reason),
            StatsError::Unrepresentable(reason) => write!(f, "unrepresentable value: {}", reason),
        }
    }
}

impl std::error::Error for StatsError {}

/// Result type alias for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;
