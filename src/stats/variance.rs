// ============================================================================
// Variance Engine
// Correctly rounded variance and standard deviation from a summary
// ============================================================================

use crate::interfaces::BasicStatistics;
use crate::numeric::{
    round_root, sqrt, Decimal, RoundingContext, RoundingMode, StatsError, StatsResult,
};
use num_traits::Zero;
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which variance estimator to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Estimator {
    /// Bias-corrected: divides by n × (n − 1)
    Sample,
    /// Divides by n²
    Population,
}

/// Variance rounded to `context`.
///
/// Computed as `(n·Σx² − (Σx)²) / d` with `d = n(n−1)` or `n²`, a single
/// correctly rounded division.
///
/// Returns `Ok(None)` for an empty data set and exactly zero for a single
/// value.
///
/// # Example
/// ```
/// use decimal_stats::prelude::*;
///
/// let summary = BasicSummary::new(3, Decimal::from(6), Decimal::from(14));
/// let v = variance(&summary, Estimator::Sample, &RoundingContext::default()).unwrap();
/// assert_eq!(v, Some(Decimal::from(1)));
/// ```
pub fn variance<S>(
    stats: &S,
    estimator: Estimator,
    context: &RoundingContext,
) -> StatsResult<Option<Decimal>>
where
    S: BasicStatistics + ?Sized,
{
    context.validate()?;
    let summary = stats.summary();
    match summary.count {
        0 => return Ok(None),
        1 => return Ok(Some(Decimal::zero())),
        _ => {},
    }

    let (numerator, denominator) = variance_ratio(summary.count, &summary.sum, &summary.sum_of_squares, estimator);
    context.divide(&numerator, &denominator).map(Some)
}

/// Standard deviation rounded to `context`, without double rounding.
///
/// The ratio is truncated to `2p + 2` digits and its root truncated to
/// `p + 1` digits. Unless that candidate squares back to the exact ratio,
/// the true deviation lies strictly inside the candidate's last unit, so
/// its floor at `p` digits is known and the final digit is settled by
/// comparing the exact ratio against the squared midpoint.
pub fn std_dev<S>(
    stats: &S,
    estimator: Estimator,
    context: &RoundingContext,
) -> StatsResult<Option<Decimal>>
where
    S: BasicStatistics + ?Sized,
{
    context.validate()?;
    let summary = stats.summary();
    match summary.count {
        0 => return Ok(None),
        1 => return Ok(Some(Decimal::zero())),
        _ => {},
    }

    let (numerator, denominator) = variance_ratio(summary.count, &summary.sum, &summary.sum_of_squares, estimator);

    if context.is_exact() {
        let exact_variance = RoundingContext::exact().divide(&numerator, &denominator)?;
        return sqrt(&exact_variance, context).map(Some);
    }

    let precision = context.precision;
    let oversized = || {
        StatsError::Configuration(format!(
            "precision {} is too large for a standard deviation",
            precision
        ))
    };
    let guard_digits = precision
        .checked_mul(2)
        .and_then(|digits| digits.checked_add(2))
        .ok_or_else(oversized)?;
    let candidate_digits = precision.checked_add(1).ok_or_else(oversized)?;

    let guard = RoundingContext::new(guard_digits, RoundingMode::Down);
    let truncated_variance = guard.divide(&numerator, &denominator)?;
    let candidate = sqrt(
        &truncated_variance,
        &RoundingContext::new(candidate_digits, RoundingMode::Down),
    )?;

    let compare_square = |root: &Decimal| numerator.cmp(&(root * root * &denominator));
    if compare_square(&candidate) == Ordering::Equal {
        return context.round(&candidate).map(Some);
    }

    let floor = RoundingContext::new(precision, RoundingMode::Down).round(&candidate)?;
    let (root, scale) = floor.as_bigint_and_exponent();
    let resolved = round_root(root, scale, context.mode, compare_square)?;
    context.round(&resolved).map(Some)
}

/// Numerator and denominator of the variance: `(n·Σx² − (Σx)², d)`.
fn variance_ratio(
    count: u64,
    sum: &Decimal,
    sum_of_squares: &Decimal,
    estimator: Estimator,
) -> (Decimal, Decimal) {
    let n = Decimal::from(count);
    let numerator = &n * sum_of_squares - sum * sum;
    let denominator = match estimator {
        Estimator::Sample => &n * Decimal::from(count - 1),
        Estimator::Population => &n * &n,
    };
    (numerator, denominator)
}

// ============================================================================
// Tests
// ============================================================================
