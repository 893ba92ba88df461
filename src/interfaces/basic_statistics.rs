// ============================================================================
// Basic Statistics Interface
// Sufficient statistics consumed by the variance engine
// ============================================================================

use crate::numeric::Decimal;
use crate::stats::BasicSummary;

/// Source of the (count, sum, sum of squares) triple.
///
/// Implementations: `BasicSummary` (a plain value) and
/// `RollingDecimalBuffer` (scanned from the stored values).
pub trait BasicStatistics {
    /// Number of values
    fn count(&self) -> u64;

    /// Exact sum of the values
    fn sum(&self) -> Decimal;

    /// Exact sum of the squared values
    fn sum_of_squares(&self) -> Decimal;

    /// All three statistics taken from one consistent view of the data.
    ///
    /// Implementations whose data can change between calls should override
    /// this so the triple is read atomically.
    fn summary(&self) -> BasicSummary {
        BasicSummary::new(self.count(), self.sum(), self.sum_of_squares())
    }
}
