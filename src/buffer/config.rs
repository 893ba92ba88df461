// ============================================================================
// Buffer Configuration
// Growth, contraction and window settings for the rolling decimal buffer
// ============================================================================

use crate::numeric::{StatsError, StatsResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Expansion Mode
// ============================================================================

/// How the backing store grows and when it is contracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExpansionMode {
    /// Grow to `ceil(capacity × expansion_factor)`.
    /// Contract when `capacity / len` exceeds the contraction criterion.
    Multiplicative,

    /// Grow to `capacity + round(expansion_factor)`.
    /// Contract when `capacity − len` exceeds the contraction criterion.
    Additive,
}

// ============================================================================
// Complete Buffer Configuration
// ============================================================================

/// Configuration for creating a [`RollingDecimalBuffer`](super::RollingDecimalBuffer)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BufferConfig {
    /// Backing capacity allocated up front
    pub initial_capacity: usize,

    /// Multiplier (or increment, in additive mode) applied on growth
    pub expansion_factor: f64,

    /// Threshold that triggers reallocation down to `len + 1` slots
    pub contraction_criterion: f64,

    /// Growth and contraction arithmetic
    pub expansion_mode: ExpansionMode,

    /// Optional: Maximum number of most recent values retained
    /// None means unbounded
    pub window: Option<usize>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            expansion_factor: Self::DEFAULT_EXPANSION_FACTOR,
            contraction_criterion: Self::DEFAULT_EXPANSION_FACTOR + Self::DEFAULT_CONTRACTION_DELTA,
            expansion_mode: ExpansionMode::Multiplicative,
            window: None,
        }
    }
}

impl BufferConfig {
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
    pub const DEFAULT_EXPANSION_FACTOR: f64 = 2.0;

    /// Default gap between the contraction criterion and the expansion factor
    pub const DEFAULT_CONTRACTION_DELTA: f64 = 0.5;

    /// Unbounded buffer with default growth settings
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Rolling buffer keeping the `window` most recent values
    pub fn rolling(window: usize) -> Self {
        Self::default().with_window(Some(window))
    }

    /// Builder method: Set initial capacity
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builder method: Set expansion factor, keeping the default gap to the
    /// contraction criterion
    pub fn with_expansion_factor(mut self, factor: f64) -> Self {
        self.expansion_factor = factor;
        self.contraction_criterion = factor + Self::DEFAULT_CONTRACTION_DELTA;
        self
    }

    /// Builder method: Set contraction criterion
    pub fn with_contraction_criterion(mut self, criterion: f64) -> Self {
        self.contraction_criterion = criterion;
        self
    }

    /// Builder method: Set expansion mode
    pub fn with_expansion_mode(mut self, mode: ExpansionMode) -> Self {
        self.expansion_mode = mode;
        self
    }

    /// Builder method: Set window (None for unbounded)
    pub fn with_window(mut self, window: Option<usize>) -> Self {
        self.window = window;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> StatsResult<()> {
        if self.initial_capacity == 0 {
            return Err(StatsError::Configuration(
                "initial capacity must be positive".to_string(),
            ));
        }
        check_window(self.window)?;
        check_contract_expand(self.contraction_criterion, self.expansion_factor)
    }
}

/// A window must hold at least one value.
pub(crate) fn check_window(window: Option<usize>) -> StatsResult<()> {
    match window {
        Some(0) => Err(StatsError::Configuration(
            "window size must be at least 1".to_string(),
        )),
        _ => Ok(()),
    }
}

fn check_contract_expand(contraction: f64, expansion: f64) -> StatsResult<()> {
    if !expansion.is_finite() || expansion <= 1.0 {
        return Err(StatsError::Configuration(format!(
            "expansion factor must be greater than 1, got {}",
            expansion
        )));
    }
    if !contraction.is_finite() || contraction <= 1.0 {
        return Err(StatsError::Configuration(format!(
            "contraction criterion must be greater than 1, got {}",
            contraction
        )));
    }
    if contraction < expansion {
        return Err(StatsError::Configuration(format!(
            "contraction criterion {} is smaller than expansion factor {}",
            contraction, expansion
        )));
    }
    Ok(())
}
