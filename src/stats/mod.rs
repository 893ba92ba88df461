// ============================================================================
// Statistics Module
// Summaries, order statistics and correctly rounded dispersion
// ============================================================================

mod percentile;
mod summary;
mod variance;

pub use percentile::{OrderStatisticSelector, PIVOT_CACHE_DEPTH};
pub use summary::BasicSummary;
pub use variance::{std_dev, variance, Estimator};
