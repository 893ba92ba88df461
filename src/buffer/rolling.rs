// ============================================================================
// Rolling Decimal Buffer
// Growable, optionally windowed store of decimals with amortized O(1) append
// ============================================================================

use super::config::{check_window, BufferConfig, ExpansionMode};
use crate::interfaces::BasicStatistics;
use crate::numeric::{Decimal, StatsError, StatsResult};
use crate::stats::BasicSummary;
use num_traits::Zero;
use parking_lot::Mutex;
use std::fmt;

// ============================================================================
// Buffer State
// ============================================================================

/// Logical values live at `storage[start..start + len]`; `storage.len()` is
/// the backing capacity and every slot outside the logical range is zero.
#[derive(Debug, Clone)]
struct BufferState {
    storage: Vec<Decimal>,
    start: usize,
    len: usize,
    config: BufferConfig,
}

impl BufferState {
    fn new(config: BufferConfig) -> Self {
        Self {
            storage: vec![Decimal::zero(); config.initial_capacity],
            start: 0,
            len: 0,
            config,
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    fn values(&self) -> &[Decimal] {
        &self.storage[self.start..self.start + self.len]
    }

    fn push(&mut self, value: Decimal) -> Option<Decimal> {
        match self.config.window {
            Some(window) if self.len >= window => Some(self.roll(value)),
            _ => {
                if self.start + self.len >= self.capacity() {
                    self.expand();
                }
                let slot = self.start + self.len;
                self.storage[slot] = value;
                self.len += 1;
                None
            },
        }
    }

    /// Replace the oldest value with `value` at the back of a full window.
    fn roll(&mut self, value: Decimal) -> Decimal {
        if self.start + self.len + 1 > self.capacity() {
            self.expand();
        }
        let evicted = std::mem::take(&mut self.storage[self.start]);
        self.start += 1;
        let slot = self.start + self.len - 1;
        self.storage[slot] = value;
        self.contract_if_sparse();
        evicted
    }

    fn expand(&mut self) {
        let capacity = self.capacity();
        let factor = self.config.expansion_factor;
        let grown = match self.config.expansion_mode {
            ExpansionMode::Multiplicative => (capacity as f64 * factor).ceil() as usize,
            ExpansionMode::Additive => capacity + factor.round() as usize,
        };
        let new_capacity = grown.max(capacity + 1);
        tracing::debug!(from = capacity, to = new_capacity, "expanding rolling buffer");
        self.storage.resize(new_capacity, Decimal::zero());
    }

    fn should_contract(&self) -> bool {
        let capacity = self.capacity() as f64;
        let len = self.len as f64;
        match self.config.expansion_mode {
            ExpansionMode::Multiplicative => capacity / len > self.config.contraction_criterion,
            ExpansionMode::Additive => capacity - len > self.config.contraction_criterion,
        }
    }

    fn contract_if_sparse(&mut self) {
        if self.should_contract() {
            self.reallocate(self.len + 1);
        }
    }

    /// Move the logical values to the front of a fresh store of `capacity`
    /// slots.
    fn reallocate(&mut self, capacity: usize) {
        tracing::debug!(
            from = self.capacity(),
            to = capacity,
            len = self.len,
            "reallocating rolling buffer"
        );
        let mut fresh = Vec::with_capacity(capacity);
        fresh.extend(self.storage.drain(self.start..self.start + self.len));
        fresh.resize(capacity, Decimal::zero());
        self.storage = fresh;
        self.start = 0;
    }

    /// Grow the store to at least `slots` slots, keeping the layout.
    fn reserve_slots(&mut self, slots: usize) {
        if slots > self.capacity() {
            tracing::debug!(from = self.capacity(), to = slots, "growing rolling buffer");
            self.storage.resize(slots, Decimal::zero());
        }
    }

    /// Slot count needed to hold `len` values from the current start.
    fn slots_for(&self, len: usize) -> StatsResult<usize> {
        if let Some(window) = self.config.window {
            if len > window {
                return Err(StatsError::OutOfRange {
                    requested: len,
                    available: window,
                });
            }
        }
        self.start.checked_add(len).ok_or(StatsError::OutOfRange {
            requested: len,
            available: usize::MAX - self.start,
        })
    }

    fn discard(&mut self, count: usize, front: bool) -> StatsResult<()> {
        if count > self.len {
            return Err(StatsError::OutOfRange {
                requested: count,
                available: self.len,
            });
        }
        self.remove(count, front);
        Ok(())
    }

    /// Drop `count <= len` values from one end and contract if sparse.
    fn remove(&mut self, count: usize, front: bool) {
        let range = if front {
            self.start..self.start + count
        } else {
            self.start + self.len - count..self.start + self.len
        };
        for slot in &mut self.storage[range] {
            *slot = Decimal::zero();
        }
        if front {
            self.start += count;
        }
        self.len -= count;
        self.contract_if_sparse();
    }

    fn trim_to_window(&mut self) {
        if let Some(window) = self.config.window {
            if self.len > window {
                self.remove(self.len - window, true);
            }
        }
    }
}

// ============================================================================
// Rolling Decimal Buffer
// ============================================================================

/// Ordered store of decimal values with dynamic capacity and an optional
/// window of most recent values.
///
/// The logical sequence is a sliding range over a larger backing store, so
/// evicting the oldest value only advances a cursor. The store grows when
/// full and is reallocated to `len + 1` slots once it becomes sparse
/// according to the configured contraction criterion.
///
/// Every method locks once, so single calls are atomic when the buffer is
/// shared between threads. Sequences of calls are not; use
/// [`snapshot`](Self::snapshot) for a consistent view.
///
/// # Example
/// ```
/// use decimal_stats::prelude::*;
///
/// let buffer = RollingDecimalBuffer::rolling(2).unwrap();
/// buffer.append(Decimal::from(1));
/// buffer.append(Decimal::from(2));
/// let evicted = buffer.append(Decimal::from(3));
/// assert_eq!(evicted, Some(Decimal::from(1)));
/// assert_eq!(buffer.snapshot(), vec![Decimal::from(2), Decimal::from(3)]);
/// ```
pub struct RollingDecimalBuffer {
    state: Mutex<BufferState>,
}

impl RollingDecimalBuffer {
    /// Unbounded buffer with the default configuration
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BufferState::new(BufferConfig::default())),
        }
    }

    /// Buffer built from a validated configuration
    pub fn with_config(config: BufferConfig) -> StatsResult<Self> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(BufferState::new(config)),
        })
    }

    /// Buffer keeping only the `window` most recent values
    pub fn rolling(window: usize) -> StatsResult<Self> {
        Self::with_config(BufferConfig::rolling(window))
    }

    /// Unbounded buffer holding `values` in order, with the default
    /// configuration
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let buffer = Self::new();
        buffer.extend(values);
        buffer
    }

    /// Append `value`, returning the oldest value if a full window evicted it.
    pub fn append(&self, value: Decimal) -> Option<Decimal> {
        self.state.lock().push(value)
    }

    /// Append every value in order.
    ///
    /// The store is reallocated once to fit all of them; with a window, the
    /// oldest values beyond it are then dropped.
    pub fn extend<I>(&self, values: I)
    where
        I: IntoIterator<Item = Decimal>,
    {
        let incoming: Vec<Decimal> = values.into_iter().collect();
        if incoming.is_empty() {
            return;
        }
        let added = incoming.len();
        let mut state = self.state.lock();
        let capacity = state.len + added + 1;
        state.reallocate(capacity);
        let begin = state.len;
        state.storage[begin..begin + added]
            .iter_mut()
            .zip(incoming)
            .for_each(|(slot, value)| *slot = value);
        state.len += added;
        state.trim_to_window();
    }

    /// Remove the `count` oldest values.
    ///
    /// # Errors
    /// Returns `OutOfRange` if `count > len()`; the buffer is left unchanged.
    pub fn discard_front(&self, count: usize) -> StatsResult<()> {
        self.state.lock().discard(count, true)
    }

    /// Remove the `count` most recent values.
    ///
    /// # Errors
    /// Returns `OutOfRange` if `count > len()`; the buffer is left unchanged.
    pub fn discard_back(&self, count: usize) -> StatsResult<()> {
        self.state.lock().discard(count, false)
    }

    /// Overwrite the most recent value, returning the one it replaced.
    ///
    /// # Errors
    /// Returns `EmptyState` if the buffer holds no values.
    pub fn replace_back(&self, value: Decimal) -> StatsResult<Decimal> {
        let mut state = self.state.lock();
        if state.len == 0 {
            return Err(StatsError::EmptyState);
        }
        let slot = state.start + state.len - 1;
        Ok(std::mem::replace(&mut state.storage[slot], value))
    }

    /// Value at logical position `index`, oldest first.
    ///
    /// # Errors
    /// Returns `OutOfRange` if `index >= len()`.
    pub fn get(&self, index: usize) -> StatsResult<Decimal> {
        let state = self.state.lock();
        state
            .values()
            .get(index)
            .cloned()
            .ok_or(StatsError::OutOfRange {
                requested: index,
                available: state.len,
            })
    }

    /// Write `value` at logical position `index`.
    ///
    /// Writing past the end extends the sequence to `index + 1` values; the
    /// positions in between read as zero. The store grows as needed.
    ///
    /// # Errors
    /// Returns `OutOfRange` if `index` falls outside the window.
    pub fn set(&self, index: usize, value: Decimal) -> StatsResult<()> {
        let mut state = self.state.lock();
        if let Some(window) = state.config.window {
            if index >= window {
                return Err(StatsError::OutOfRange {
                    requested: index,
                    available: window,
                });
            }
        }
        let slots = state.slots_for(index)?.checked_add(1).ok_or(StatsError::OutOfRange {
            requested: index,
            available: state.len,
        })?;
        state.reserve_slots(slots);
        let slot = state.start + index;
        state.storage[slot] = value;
        state.len = state.len.max(index + 1);
        Ok(())
    }

    /// Resize the logical sequence to `len` values.
    ///
    /// Growing appends zeros; shrinking drops the most recent values.
    /// Neither reallocates below the current capacity.
    ///
    /// # Errors
    /// Returns `OutOfRange` if `len` exceeds the window.
    pub fn set_len(&self, len: usize) -> StatsResult<()> {
        let mut state = self.state.lock();
        let slots = state.slots_for(len)?;
        let (start, current) = (state.start, state.len);
        if len < current {
            for slot in &mut state.storage[start + len..start + current] {
                *slot = Decimal::zero();
            }
        } else {
            state.reserve_slots(slots);
        }
        state.len = len;
        Ok(())
    }

    /// Owned copy of the logical sequence, oldest first
    pub fn snapshot(&self) -> Vec<Decimal> {
        self.state.lock().values().to_vec()
    }

    /// Change the window; `None` makes the buffer unbounded. Shrinking below
    /// the current length drops the oldest values.
    ///
    /// # Errors
    /// Returns `Configuration` for `Some(0)`; the buffer is left unchanged.
    pub fn set_window(&self, window: Option<usize>) -> StatsResult<()> {
        check_window(window)?;
        let mut state = self.state.lock();
        tracing::debug!(from = ?state.config.window, to = ?window, "window changed");
        state.config.window = window;
        state.trim_to_window();
        Ok(())
    }

    pub fn window(&self) -> Option<usize> {
        self.state.lock().config.window
    }

    /// Drop every value; the backing capacity is kept.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let (start, len) = (state.start, state.len);
        for slot in &mut state.storage[start..start + len] {
            *slot = Decimal::zero();
        }
        state.start = 0;
        state.len = 0;
    }

    pub fn len(&self) -> usize {
        self.state.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().len == 0
    }

    /// Number of slots in the backing store
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity()
    }

    /// Current configuration, including the live window
    pub fn config(&self) -> BufferConfig {
        self.state.lock().config.clone()
    }

    /// Reallocate the backing store to `len() + 1` slots.
    pub fn contract(&self) {
        let mut state = self.state.lock();
        let capacity = state.len + 1;
        state.reallocate(capacity);
    }

    pub fn min(&self) -> Option<Decimal> {
        self.state.lock().values().iter().min().cloned()
    }

    pub fn max(&self) -> Option<Decimal> {
        self.state.lock().values().iter().max().cloned()
    }
}

impl Default for RollingDecimalBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RollingDecimalBuffer {
    fn clone(&self) -> Self {
        Self {
            state: Mutex::new(self.state.lock().clone()),
        }
    }
}

/// Buffers are equal when their configurations and logical sequences are;
/// spare capacity and the position of the sequence in the store are not
/// compared.
impl PartialEq for RollingDecimalBuffer {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        // never hold both locks, so opposite comparisons cannot deadlock
        let (config, values) = {
            let state = self.state.lock();
            (state.config.clone(), state.values().to_vec())
        };
        let other = other.state.lock();
        other.config == config && other.values() == values.as_slice()
    }
}

impl FromIterator<Decimal> for RollingDecimalBuffer {
    fn from_iter<I: IntoIterator<Item = Decimal>>(values: I) -> Self {
        Self::from_values(values)
    }
}

impl fmt::Debug for RollingDecimalBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RollingDecimalBuffer")
            .field("len", &state.len)
            .field("capacity", &state.capacity())
            .field("window", &state.config.window)
            .finish()
    }
}

impl BasicStatistics for RollingDecimalBuffer {
    fn count(&self) -> u64 {
        self.len() as u64
    }

    fn sum(&self) -> Decimal {
        self.state.lock().values().iter().sum()
    }

    fn sum_of_squares(&self) -> Decimal {
        self.state.lock().values().iter().map(|v| v * v).sum()
    }

    fn summary(&self) -> BasicSummary {
        BasicSummary::from_values(self.state.lock().values())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;
    use std::sync::Arc;
    use std::thread;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ints(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|&v| Decimal::from(v)).collect()
    }

    fn filled(count: i64) -> RollingDecimalBuffer {
        let buffer = RollingDecimalBuffer::new();
        for i in 0..count {
            buffer.append(Decimal::from(i));
        }
        buffer
    }

    #[test]
    fn test_append_grows_capacity() {
        let buffer = filled(1000);
        assert_eq!(buffer.len(), 1000);
        assert_eq!(buffer.capacity(), 1024);
        assert_eq!(buffer.get(0).unwrap(), Decimal::from(0));
        assert_eq!(buffer.get(999).unwrap(), Decimal::from(999));
    }

    #[test]
    fn test_rolling_window_evicts_oldest() {
        let buffer = RollingDecimalBuffer::rolling(3).unwrap();
        assert_eq!(buffer.append(Decimal::from(1)), None);
        assert_eq!(buffer.append(Decimal::from(2)), None);
        assert_eq!(buffer.append(Decimal::from(3)), None);
        assert_eq!(buffer.append(Decimal::from(4)), Some(Decimal::from(1)));
        assert_eq!(buffer.snapshot(), ints(&[2, 3, 4]));
    }

    #[test]
    fn test_rolling_contracts_multiplicative() {
        let buffer = RollingDecimalBuffer::rolling(3).unwrap();
        for i in 1..=4 {
            buffer.append(Decimal::from(i));
        }
        // 16 / 3 exceeds 2.5 after the first eviction
        assert_eq!(buffer.capacity(), 4);
        for i in 5..=50 {
            buffer.append(Decimal::from(i));
            assert!(buffer.capacity() <= 8);
        }
        assert_eq!(buffer.snapshot(), ints(&[48, 49, 50]));
    }

    #[test]
    fn test_rolling_contracts_additive() {
        let config = BufferConfig::rolling(3)
            .with_initial_capacity(2)
            .with_expansion_mode(ExpansionMode::Additive);
        let buffer = RollingDecimalBuffer::with_config(config).unwrap();

        buffer.append(Decimal::from(1));
        buffer.append(Decimal::from(2));
        assert_eq!(buffer.capacity(), 2);

        let mut capacities = Vec::new();
        for i in 3..=5 {
            buffer.append(Decimal::from(i));
            capacities.push(buffer.capacity());
        }
        assert_eq!(capacities, vec![4, 4, 4]);
        assert_eq!(buffer.snapshot(), ints(&[3, 4, 5]));
    }

    #[test]
    fn test_discard_front_contracts() {
        let buffer = filled(10);
        assert_eq!(buffer.capacity(), 16);
        buffer.discard_front(5).unwrap();
        assert_eq!(buffer.capacity(), 6);
        assert_eq!(buffer.snapshot(), ints(&[5, 6, 7, 8, 9]));
    }

    #[test]
    fn test_discard_back() {
        let buffer = filled(10);
        buffer.discard_back(3).unwrap();
        assert_eq!(buffer.len(), 7);
        assert_eq!(buffer.get(6).unwrap(), Decimal::from(6));
    }

    #[test]
    fn test_discard_errors_leave_state_unchanged() {
        let buffer = filled(4);
        let err = buffer.discard_front(5).unwrap_err();
        assert_eq!(
            err,
            StatsError::OutOfRange {
                requested: 5,
                available: 4
            }
        );
        assert!(buffer.discard_back(5).is_err());
        assert_eq!(buffer.snapshot(), ints(&[0, 1, 2, 3]));
        assert_eq!(buffer.capacity(), 16);
    }

    #[test]
    fn test_replace_back() {
        let buffer = RollingDecimalBuffer::new();
        assert_eq!(buffer.replace_back(dec("1")), Err(StatsError::EmptyState));

        buffer.append(dec("1.5"));
        buffer.append(dec("2.5"));
        assert_eq!(buffer.replace_back(dec("9.75")).unwrap(), dec("2.5"));
        assert_eq!(buffer.snapshot(), vec![dec("1.5"), dec("9.75")]);
    }

    #[test]
    fn test_get_out_of_range() {
        let buffer = filled(3);
        assert!(matches!(
            buffer.get(3),
            Err(StatsError::OutOfRange {
                requested: 3,
                available: 3
            })
        ));
    }

    #[test]
    fn test_snapshot_is_decoupled() {
        let buffer = filled(3);
        let snapshot = buffer.snapshot();
        buffer.append(Decimal::from(100));
        buffer.replace_back(Decimal::from(7)).unwrap();
        assert_eq!(snapshot, ints(&[0, 1, 2]));
    }

    #[test]
    fn test_set_window() {
        let buffer = filled(10);
        buffer.set_window(Some(4)).unwrap();
        assert_eq!(buffer.window(), Some(4));
        assert_eq!(buffer.snapshot(), ints(&[6, 7, 8, 9]));

        assert!(matches!(
            buffer.set_window(Some(0)),
            Err(StatsError::Configuration(_))
        ));
        assert_eq!(buffer.window(), Some(4));

        buffer.set_window(None).unwrap();
        for i in 10..20 {
            assert_eq!(buffer.append(Decimal::from(i)), None);
        }
        assert_eq!(buffer.len(), 14);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let buffer = filled(20);
        let capacity = buffer.capacity();
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), capacity);
        assert_eq!(buffer.min(), None);

        buffer.append(Decimal::from(5));
        assert_eq!(buffer.snapshot(), ints(&[5]));
    }

    #[test]
    fn test_extend() {
        let buffer = filled(3);
        buffer.extend(ints(&[10, 11]));
        assert_eq!(buffer.snapshot(), ints(&[0, 1, 2, 10, 11]));
        assert_eq!(buffer.capacity(), 6);

        let rolling = RollingDecimalBuffer::rolling(4).unwrap();
        rolling.append(Decimal::from(1));
        rolling.extend(ints(&[2, 3, 4, 5, 6]));
        assert_eq!(rolling.snapshot(), ints(&[3, 4, 5, 6]));
    }

    #[test]
    fn test_extend_past_window_trims_oldest() {
        let rolling = RollingDecimalBuffer::rolling(2).unwrap();
        rolling.extend(ints(&[1, 2, 3, 4, 5, 6, 7]));
        assert_eq!(rolling.snapshot(), ints(&[6, 7]));
        assert!(rolling.capacity() <= 3);

        rolling.set_window(Some(1)).unwrap();
        assert_eq!(rolling.snapshot(), ints(&[7]));
    }

    #[test]
    fn test_set_overwrites_and_extends() {
        let buffer = filled(3);
        buffer.set(1, dec("7.5")).unwrap();
        assert_eq!(buffer.snapshot(), vec![dec("0"), dec("7.5"), dec("2")]);

        buffer.set(40, dec("1")).unwrap();
        assert_eq!(buffer.len(), 41);
        assert!(buffer.capacity() >= 41);
        assert_eq!(buffer.get(20).unwrap(), Decimal::zero());
        assert_eq!(buffer.get(40).unwrap(), dec("1"));
    }

    #[test]
    fn test_set_after_eviction_uses_logical_index() {
        let buffer = RollingDecimalBuffer::rolling(3).unwrap();
        buffer.extend(ints(&[1, 2, 3, 4]));
        buffer.set(0, dec("9")).unwrap();
        assert_eq!(buffer.snapshot(), ints(&[9, 3, 4]));

        assert_eq!(
            buffer.set(3, dec("5")),
            Err(StatsError::OutOfRange {
                requested: 3,
                available: 3
            })
        );
        assert_eq!(buffer.snapshot(), ints(&[9, 3, 4]));
    }

    #[test]
    fn test_set_len() {
        let buffer = filled(5);
        buffer.set_len(2).unwrap();
        assert_eq!(buffer.snapshot(), ints(&[0, 1]));

        buffer.set_len(4).unwrap();
        assert_eq!(buffer.snapshot(), ints(&[0, 1, 0, 0]));

        buffer.set_len(100).unwrap();
        assert_eq!(buffer.len(), 100);
        assert!(buffer.capacity() >= 100);
        assert_eq!(buffer.sum(), Decimal::from(1));

        let rolling = RollingDecimalBuffer::rolling(3).unwrap();
        assert!(matches!(
            rolling.set_len(4),
            Err(StatsError::OutOfRange {
                requested: 4,
                available: 3
            })
        ));
        assert!(rolling.is_empty());
    }

    #[test]
    fn test_from_values_and_collect() {
        let buffer = RollingDecimalBuffer::from_values(ints(&[4, 5, 6]));
        assert_eq!(buffer.snapshot(), ints(&[4, 5, 6]));
        assert_eq!(buffer.config(), BufferConfig::default());

        let collected: RollingDecimalBuffer = (4..=6i64).map(Decimal::from).collect();
        assert_eq!(collected, buffer);
    }

    #[test]
    fn test_equality() {
        let a = filled(5);
        // comparing with itself must not deadlock
        assert!(a.eq(&a));

        // same values in a differently sized store
        let b = filled(6);
        b.discard_front(1).unwrap();
        for i in 0..5 {
            b.set(i, Decimal::from(i as i64)).unwrap();
        }
        assert_ne!(a.capacity(), b.capacity());
        assert_eq!(a, b);

        b.append(Decimal::from(5));
        assert_ne!(a, b);

        let windowed = RollingDecimalBuffer::rolling(10).unwrap();
        windowed.extend(ints(&[0, 1, 2, 3, 4]));
        assert_ne!(a, windowed);
    }

    #[test]
    fn test_contract_explicit() {
        let buffer = filled(5);
        buffer.contract();
        assert_eq!(buffer.capacity(), 6);
        assert_eq!(buffer.snapshot(), ints(&[0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_min_max_and_summary() {
        let buffer = RollingDecimalBuffer::new();
        buffer.extend(vec![dec("3.5"), dec("-1.25"), dec("2")]);
        assert_eq!(buffer.min(), Some(dec("-1.25")));
        assert_eq!(buffer.max(), Some(dec("3.5")));

        let summary = buffer.summary();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.sum, dec("4.25"));
        assert_eq!(summary.sum_of_squares, dec("17.8125"));
        assert_eq!(buffer.sum(), summary.sum);
        assert_eq!(buffer.sum_of_squares(), summary.sum_of_squares);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(RollingDecimalBuffer::rolling(0).is_err());
        let config = BufferConfig::default().with_contraction_criterion(1.5);
        assert!(RollingDecimalBuffer::with_config(config).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let buffer = filled(3);
        let copy = buffer.clone();
        buffer.append(Decimal::from(3));
        assert_eq!(copy.snapshot(), ints(&[0, 1, 2]));
        assert_eq!(copy.capacity(), buffer.capacity());
    }

    #[test]
    fn test_concurrent_appends() {
        let buffer = Arc::new(RollingDecimalBuffer::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for i in 0..250 {
                        buffer.append(Decimal::from(t * 1000 + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(buffer.len(), 1000);
    }

    proptest! {
        // --- A window never holds more than its size, and keeps the newest values ---
        #[test]
        fn window_bounds_length(
            window in 1usize..20,
            values in proptest::collection::vec(-10_000i64..10_000, 0..200),
        ) {
            let buffer = RollingDecimalBuffer::rolling(window).unwrap();
            for &v in &values {
                buffer.append(Decimal::from(v));
                prop_assert!(buffer.len() <= window);
                prop_assert!(buffer.len() <= buffer.capacity());
            }
            let expected: Vec<Decimal> = values
                .iter()
                .skip(values.len().saturating_sub(window))
                .map(|&v| Decimal::from(v))
                .collect();
            prop_assert_eq!(buffer.snapshot(), expected);
        }
    }
}
