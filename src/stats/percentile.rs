// ============================================================================
// Order Statistic Selector
// Quickselect with memoized partition pivots over a private snapshot
// ============================================================================

use crate::buffer::RollingDecimalBuffer;
use crate::numeric::{Decimal, StatsError, StatsResult};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Levels of the quickselect recursion tree whose pivots are remembered.
/// The cache holds `2^PIVOT_CACHE_DEPTH − 1` slots.
pub const PIVOT_CACHE_DEPTH: u32 = 10;

/// Intervals at or below this size are sorted instead of partitioned
const MIN_SELECT_SIZE: usize = 15;

// ============================================================================
// Pivot Cache
// ============================================================================

/// Pivot positions keyed by recursion path, laid out as a complete binary
/// tree: the root is node 0, children of `n` are `2n + 1` and `2n + 2`.
/// Nodes past the last slot are collapsed onto `len()`, which is never
/// stored.
#[derive(Debug, Clone)]
struct PivotCache {
    slots: Box<[Option<usize>]>,
}

impl PivotCache {
    fn new(depth: u32) -> Self {
        let len = (1usize << depth) - 1;
        Self {
            slots: vec![None; len].into_boxed_slice(),
        }
    }

    #[inline]
    fn get(&self, node: usize) -> Option<usize> {
        self.slots.get(node).copied().flatten()
    }

    #[inline]
    fn store(&mut self, node: usize, pivot: usize) {
        if let Some(slot) = self.slots.get_mut(node) {
            tracing::trace!(node, pivot, "caching partition pivot");
            *slot = Some(pivot);
        }
    }

    #[inline]
    fn left(&self, node: usize) -> usize {
        (2 * node + 1).min(self.slots.len())
    }

    #[inline]
    fn right(&self, node: usize) -> usize {
        (2 * node + 2).min(self.slots.len())
    }
}

// ============================================================================
// Selector
// ============================================================================

/// Answers k-th smallest and percentile queries over a fixed data set.
///
/// The selector owns a private copy of the values and reorders it in place
/// while partitioning; remembered pivots make repeated queries against the
/// same copy progressively cheaper. Build one per query batch; it is not
/// meant to be shared between threads.
#[derive(Debug, Clone)]
pub struct OrderStatisticSelector {
    data: Vec<Decimal>,
    pivots: PivotCache,
}

impl OrderStatisticSelector {
    pub fn new(values: Vec<Decimal>) -> Self {
        tracing::trace!(len = values.len(), "order statistic selector created");
        Self {
            data: values,
            pivots: PivotCache::new(PIVOT_CACHE_DEPTH),
        }
    }

    /// Selector over a snapshot of `buffer`.
    pub fn from_buffer(buffer: &RollingDecimalBuffer) -> Self {
        Self::new(buffer.snapshot())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The `k`-th smallest value (0-based).
    ///
    /// # Errors
    /// Returns `OutOfRange` if `k >= len()`.
    pub fn select(&mut self, k: usize) -> StatsResult<Decimal> {
        if k >= self.data.len() {
            return Err(StatsError::OutOfRange {
                requested: k,
                available: self.data.len(),
            });
        }

        let mut begin = 0;
        let mut end = self.data.len();
        let mut node = 0;
        while end - begin > MIN_SELECT_SIZE {
            let pivot = match self.pivots.get(node) {
                Some(pivot) => pivot,
                None => {
                    let pivot = self.partition(begin, end, self.median_of_three(begin, end));
                    self.pivots.store(node, pivot);
                    pivot
                },
            };

            if k == pivot {
                return Ok(self.data[k].clone());
            } else if k < pivot {
                end = pivot;
                node = self.pivots.left(node);
            } else {
                begin = pivot + 1;
                node = self.pivots.right(node);
            }
        }

        self.data[begin..end].sort();
        Ok(self.data[k].clone())
    }

    /// Estimate of the `p`-th quantile, `p` in `[0, 1]`.
    ///
    /// Uses position `p × (n + 1)` and interpolates linearly between the
    /// neighbouring order statistics; positions before the first or past
    /// the last value clamp to the minimum or maximum. Returns `Ok(None)`
    /// for an empty data set.
    ///
    /// # Errors
    /// Returns `Domain` if `p` lies outside `[0, 1]`.
    pub fn evaluate(&mut self, p: &Decimal) -> StatsResult<Option<Decimal>> {
        if p.is_negative() || *p > Decimal::one() {
            return Err(StatsError::Domain(format!(
                "quantile {} outside [0, 1]",
                p
            )));
        }
        let len = self.data.len();
        match len {
            0 => return Ok(None),
            1 => return Ok(Some(self.data[0].clone())),
            _ => {},
        }

        let position = p * Decimal::from(len as u64 + 1);
        let whole = integer_part(&position);
        let fraction = &position - Decimal::new(whole.clone(), 0);
        let index = whole.to_usize().unwrap_or(usize::MAX);

        if index < 1 {
            return self.select(0).map(Some);
        }
        if index >= len {
            return self.select(len - 1).map(Some);
        }

        let lower = self.select(index - 1)?;
        let upper = self.select(index)?;
        if fraction.is_zero() {
            return Ok(Some(lower));
        }
        let spread = &upper - &lower;
        Ok(Some(lower + fraction * spread))
    }

    /// Index of the median of the first, middle and last values of
    /// `[begin, end)`.
    fn median_of_three(&self, begin: usize, end: usize) -> usize {
        let last = end - 1;
        let middle = begin + (last - begin) / 2;
        let (b, m, l) = (&self.data[begin], &self.data[middle], &self.data[last]);

        if b < m {
            if m < l {
                middle
            } else if b < l {
                last
            } else {
                begin
            }
        } else if b < l {
            begin
        } else if m < l {
            last
        } else {
            middle
        }
    }

    /// Hoare-style partition of `[begin, end)` around the value at `pivot`.
    /// Returns the final position of the pivot value: everything before it
    /// is `<=` and everything after it is `>=`.
    fn partition(&mut self, begin: usize, end: usize, pivot: usize) -> usize {
        let data = &mut self.data;
        data.swap(begin, pivot);

        let mut i = begin + 1;
        let mut j = end - 1;
        while i < j {
            while i < j && data[j] > data[begin] {
                j -= 1;
            }
            while i < j && data[i] < data[begin] {
                i += 1;
            }
            if i < j {
                data.swap(i, j);
                i += 1;
                j -= 1;
            }
        }

        if i >= end || data[i] > data[begin] {
            i -= 1;
        }
        data.swap(begin, i);
        i
    }
}

/// Integer part of a non-negative decimal.
fn integer_part(value: &Decimal) -> BigInt {
    let (mantissa, scale) = value.as_bigint_and_exponent();
    if scale <= 0 {
        mantissa * num_traits::pow(BigInt::from(10u32), scale.unsigned_abs() as usize)
    } else {
        mantissa / num_traits::pow(BigInt::from(10u32), scale as usize)
    }
}

// ============================================================================
// Tests
// ============================================================================
