// ============================================================================
// Basic Summary
// Count, sum and sum of squares of a data set
// ============================================================================

use crate::interfaces::BasicStatistics;
use crate::numeric::{Decimal, RoundingContext, StatsResult};
use num_traits::Zero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sufficient statistic for mean and variance.
///
/// Produced exactly by scanning stored values, or supplied by any external
/// accumulator that tracks the same three quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasicSummary {
    pub count: u64,
    pub sum: Decimal,
    pub sum_of_squares: Decimal,
}

impl Default for BasicSummary {
    fn default() -> Self {
        Self::new(0, Decimal::zero(), Decimal::zero())
    }
}

impl BasicSummary {
    pub fn new(count: u64, sum: Decimal, sum_of_squares: Decimal) -> Self {
        Self {
            count,
            sum,
            sum_of_squares,
        }
    }

    /// Exact summary of `values`.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a Decimal>,
    {
        values
            .into_iter()
            .fold(Self::default(), |mut summary, value| {
                summary.count += 1;
                summary.sum += value;
                summary.sum_of_squares += value * value;
                summary
            })
    }

    /// Arithmetic mean rounded to `context`; `None` for an empty data set.
    pub fn mean(&self, context: &RoundingContext) -> StatsResult<Option<Decimal>> {
        if self.count == 0 {
            return Ok(None);
        }
        context
            .divide(&self.sum, &Decimal::from(self.count))
            .map(Some)
    }
}

impl BasicStatistics for BasicSummary {
    fn count(&self) -> u64 {
        self.count
    }

    fn sum(&self) -> Decimal {
        self.sum.clone()
    }

    fn sum_of_squares(&self) -> Decimal {
        self.sum_of_squares.clone()
    }

    fn summary(&self) -> BasicSummary {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::RoundingMode;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_from_values() {
        let values = vec![dec("1"), dec("2"), dec("3")];
        let summary = BasicSummary::from_values(&values);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.sum, dec("6"));
        assert_eq!(summary.sum_of_squares, dec("14"));
    }

    #[test]
    fn test_from_values_keeps_scale_exact() {
        let values = vec![dec("0.1"), dec("0.02"), dec("0.003")];
        let summary = BasicSummary::from_values(&values);
        assert_eq!(summary.sum, dec("0.123"));
        assert_eq!(summary.sum_of_squares, dec("0.010409"));
    }

    #[test]
    fn test_mean() {
        let summary = BasicSummary::new(3, dec("1"), dec("1"));
        let context = RoundingContext::new(5, RoundingMode::HalfUp);
        assert_eq!(summary.mean(&context).unwrap(), Some(dec("0.33333")));
        assert_eq!(BasicSummary::default().mean(&context).unwrap(), None);
    }

    #[test]
    fn test_trait_view() {
        let summary = BasicSummary::new(2, dec("3"), dec("5"));
        let view: &dyn BasicStatistics = &summary;
        assert_eq!(view.count(), 2);
        assert_eq!(view.sum(), dec("3"));
        assert_eq!(view.sum_of_squares(), dec("5"));
        assert_eq!(view.summary(), summary);
    }
}
