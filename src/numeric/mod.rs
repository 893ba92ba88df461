// ============================================================================
// Numeric Module
// Rounding contexts and correctly rounded primitives over BigDecimal
// ============================================================================
//
// This module provides:
// - RoundingContext / RoundingMode: precision plus rounding rule
// - sqrt / isqrt: correctly rounded decimal and integer square roots
// - StatsError: error type shared across the crate
// - rust_decimal conversions for fixed-width API boundaries
//
// Design principles:
// - No floating-point operations
// - All operations return Result (no panics)
// - Add/sub/mul/compare come from BigDecimal; only rounding is done here

mod conversion;
mod errors;
mod rounding;
mod sqrt;

pub use conversion::{from_rust_decimal, to_rust_decimal};
pub use errors::{StatsError, StatsResult};
pub use rounding::{RoundingContext, RoundingMode};
pub use sqrt::{isqrt, sqrt};

pub(crate) use sqrt::round_root;

/// Arbitrary-precision decimal used throughout the crate
pub type Decimal = bigdecimal::BigDecimal;
