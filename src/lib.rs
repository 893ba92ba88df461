// ============================================================================
// Decimal Statistics Library
// Correctly rounded descriptive statistics over arbitrary-precision decimals
// ============================================================================

//! # Decimal Stats
//!
//! Descriptive statistics for decimal data where every reported digit must
//! be right, such as prices, fees and settlement amounts.
//!
//! ## Features
//!
//! - **Rolling buffer** with amortized O(1) append and an optional window of
//!   most recent values
//! - **Percentiles** via quickselect with memoized partition pivots
//! - **Correctly rounded square root** for any precision and rounding mode
//! - **Variance and standard deviation** rounded once, with no double
//!   rounding through an intermediate variance
//! - **rust_decimal interop** for fixed-width API boundaries
//!
//! ## Example
//!
//! ```rust
//! use decimal_stats::prelude::*;
//! use std::str::FromStr;
//!
//! let buffer = RollingDecimalBuffer::rolling(8).unwrap();
//! for v in ["2", "4", "4", "4", "5", "5", "7", "9"] {
//!     buffer.append(Decimal::from_str(v).unwrap());
//! }
//!
//! let context = RoundingContext::new(5, RoundingMode::HalfUp);
//! let sd = std_dev(&buffer, Estimator::Sample, &context).unwrap();
//! assert_eq!(sd, Some(Decimal::from_str("2.1381").unwrap()));
//!
//! let mut selector = OrderStatisticSelector::from_buffer(&buffer);
//! let median = selector.evaluate(&Decimal::from_str("0.5").unwrap()).unwrap();
//! assert_eq!(median, Some(Decimal::from_str("4.5").unwrap()));
//! ```

pub mod buffer;
pub mod interfaces;
pub mod numeric;
pub mod stats;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::buffer::{BufferConfig, ExpansionMode, RollingDecimalBuffer};
    pub use crate::interfaces::BasicStatistics;
    pub use crate::numeric::{
        sqrt, Decimal, RoundingContext, RoundingMode, StatsError, StatsResult,
    };
    pub use crate::stats::{
        std_dev, variance, BasicSummary, Estimator, OrderStatisticSelector,
    };
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_end_to_end_rolling_statistics() {
        let buffer = RollingDecimalBuffer::rolling(4).unwrap();
        for v in ["100", "1.5", "2.25", "3.125", "10.0625"] {
            buffer.append(dec(v));
        }
        assert_eq!(buffer.len(), 4);

        // the window dropped 100
        let summary = buffer.summary();
        assert_eq!(summary.sum, dec("16.9375"));
        assert_eq!(summary.sum_of_squares, dec("118.33203125"));

        let exact = RoundingContext::exact();
        assert_eq!(
            variance(&buffer, Estimator::Population, &exact).unwrap(),
            Some(dec("11.653076171875"))
        );

        let context = RoundingContext::new(10, RoundingMode::HalfEven);
        assert_eq!(
            std_dev(&buffer, Estimator::Population, &context).unwrap(),
            Some(dec("3.413660231"))
        );

        let mut selector = OrderStatisticSelector::from_buffer(&buffer);
        assert_eq!(selector.select(0).unwrap(), dec("1.5"));
        assert_eq!(selector.select(3).unwrap(), dec("10.0625"));
        // position 0.5 × 5 = 2.5 sits halfway between 2.25 and 3.125
        assert_eq!(selector.evaluate(&dec("0.5")).unwrap(), Some(dec("2.6875")));
    }

    #[test]
    fn test_statistics_agree_between_buffer_and_summary() {
        let buffer = RollingDecimalBuffer::new();
        buffer.extend((1..=50i64).map(|i| Decimal::new(i.into(), 1)));

        let summary = BasicSummary::from_values(&buffer.snapshot());
        let context = RoundingContext::default();
        for estimator in [Estimator::Sample, Estimator::Population] {
            assert_eq!(
                variance(&buffer, estimator, &context).unwrap(),
                variance(&summary, estimator, &context).unwrap()
            );
            assert_eq!(
                std_dev(&buffer, estimator, &context).unwrap(),
                std_dev(&summary, estimator, &context).unwrap()
            );
        }
    }

    #[test]
    fn test_std_dev_is_root_of_exact_variance() {
        let buffer = RollingDecimalBuffer::new();
        buffer.extend(["2", "4", "4", "4", "5", "5", "7", "9"].iter().map(|v| dec(v)));

        let context = RoundingContext::new(12, RoundingMode::Down);
        let variance_value = variance(&buffer, Estimator::Population, &RoundingContext::exact())
            .unwrap()
            .unwrap();
        assert_eq!(
            std_dev(&buffer, Estimator::Population, &context).unwrap(),
            Some(sqrt(&variance_value, &context).unwrap())
        );
    }

    #[test]
    fn test_empty_buffer_yields_no_statistics() {
        let buffer = RollingDecimalBuffer::new();
        let context = RoundingContext::default();
        assert_eq!(variance(&buffer, Estimator::Sample, &context).unwrap(), None);
        assert_eq!(std_dev(&buffer, Estimator::Sample, &context).unwrap(), None);
        assert_eq!(buffer.summary().mean(&context).unwrap(), None);

        let mut selector = OrderStatisticSelector::from_buffer(&buffer);
        assert_eq!(selector.evaluate(&dec("0.5")).unwrap(), None);
    }
}
