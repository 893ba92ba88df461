// ============================================================================
// Rounding Context
// Significant-digit rounding and correctly rounded division over BigDecimal
// ============================================================================

use super::errors::{StatsError, StatsResult};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroU64;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Rounding Mode
// ============================================================================

/// Rule applied to the digits discarded when a result is shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Toward zero
    Down,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    HalfUp,
    /// Nearest neighbour, ties toward zero
    HalfDown,
    /// Nearest neighbour, ties toward the even neighbour
    HalfEven,
    /// No rounding allowed: any discarded non-zero digit is an error
    Exact,
}

impl RoundingMode {
    /// The equivalent `bigdecimal` rounding rule; `None` for EXACT, which
    /// has no counterpart there.
    pub fn to_bigdecimal(self) -> Option<bigdecimal::RoundingMode> {
        let mode = match self {
            RoundingMode::Up => bigdecimal::RoundingMode::Up,
            RoundingMode::Down => bigdecimal::RoundingMode::Down,
            RoundingMode::Ceiling => bigdecimal::RoundingMode::Ceiling,
            RoundingMode::Floor => bigdecimal::RoundingMode::Floor,
            RoundingMode::HalfUp => bigdecimal::RoundingMode::HalfUp,
            RoundingMode::HalfDown => bigdecimal::RoundingMode::HalfDown,
            RoundingMode::HalfEven => bigdecimal::RoundingMode::HalfEven,
            RoundingMode::Exact => return None,
        };
        Some(mode)
    }
}

impl From<bigdecimal::RoundingMode> for RoundingMode {
    fn from(mode: bigdecimal::RoundingMode) -> Self {
        match mode {
            bigdecimal::RoundingMode::Up => RoundingMode::Up,
            bigdecimal::RoundingMode::Down => RoundingMode::Down,
            bigdecimal::RoundingMode::Ceiling => RoundingMode::Ceiling,
            bigdecimal::RoundingMode::Floor => RoundingMode::Floor,
            bigdecimal::RoundingMode::HalfUp => RoundingMode::HalfUp,
            bigdecimal::RoundingMode::HalfDown => RoundingMode::HalfDown,
            bigdecimal::RoundingMode::HalfEven => RoundingMode::HalfEven,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Exact => "EXACT",
        };
        f.pad(name)
    }
}

/// Where a discarded tail lies relative to zero and one half of the last
/// retained unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Discarded {
    Zero,
    BelowHalf,
    Half,
    AboveHalf,
}

impl Discarded {
    /// Classify a non-zero tail by how it compares with one half.
    pub(crate) fn from_half_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Discarded::BelowHalf,
            Ordering::Equal => Discarded::Half,
            Ordering::Greater => Discarded::AboveHalf,
        }
    }

    /// Classify the fraction `remainder / divisor`, with `0 <= remainder < divisor`.
    fn of_fraction(remainder: &BigInt, divisor: &BigInt) -> Self {
        if remainder.is_zero() {
            Discarded::Zero
        } else {
            Self::from_half_ordering((remainder * 2u32).cmp(divisor))
        }
    }
}

/// Decide whether a truncated magnitude must be bumped by one unit.
///
/// `odd` is the parity of the truncated magnitude, which is also the parity
/// of its last decimal digit.
pub(crate) fn rounds_away(
    mode: RoundingMode,
    discarded: Discarded,
    negative: bool,
    odd: bool,
) -> StatsResult<bool> {
    if discarded == Discarded::Zero {
        return Ok(false);
    }
    let away = match mode {
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => !negative,
        RoundingMode::Floor => negative,
        RoundingMode::HalfUp => discarded != Discarded::BelowHalf,
        RoundingMode::HalfDown => discarded == Discarded::AboveHalf,
        RoundingMode::HalfEven => {
            discarded == Discarded::AboveHalf || (discarded == Discarded::Half && odd)
        },
        RoundingMode::Exact => {
            return Err(StatsError::InexactResult(
                "rounding necessary to fit the requested precision".to_string(),
            ))
        },
    };
    Ok(away)
}

// ============================================================================
// Integer Helpers
// ============================================================================

/// 10^exp as a big integer
pub(crate) fn pow10(exp: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u32), exp as usize)
}

/// Undo the extra digit left by a carry out of the last place: a magnitude
/// of `10^precision` becomes `10^(precision − 1)` one place to the left.
pub(crate) fn drop_carry_digit(value: BigDecimal, precision: u64) -> BigDecimal {
    let (mantissa, scale) = value.as_bigint_and_exponent();
    if digit_count(&mantissa) > precision {
        BigDecimal::new(mantissa / 10u32, scale - 1)
    } else {
        value
    }
}

/// Number of decimal digits in the magnitude of `n` (zero has one digit).
pub(crate) fn digit_count(n: &BigInt) -> u64 {
    if n.is_zero() {
        1
    } else {
        n.magnitude().to_str_radix(10).len() as u64
    }
}

// ============================================================================
// Rounding Context
// ============================================================================

/// Number of significant digits plus the rounding rule for inexact results.
///
/// Precision 0 means "unlimited" and is only meaningful with
/// [`RoundingMode::Exact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundingContext {
    /// Significant digits kept in a rounded result
    pub precision: u64,
    /// Rule applied to discarded digits
    pub mode: RoundingMode,
}

impl Default for RoundingContext {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PRECISION, RoundingMode::HalfUp)
    }
}

impl RoundingContext {
    /// Precision used when a caller does not supply a context
    pub const DEFAULT_PRECISION: u64 = 16;

    pub const fn new(precision: u64, mode: RoundingMode) -> Self {
        Self { precision, mode }
    }

    /// Unlimited precision, no rounding allowed.
    pub const fn exact() -> Self {
        Self::new(0, RoundingMode::Exact)
    }

    /// Builder method: replace the precision
    pub fn with_precision(mut self, precision: u64) -> Self {
        self.precision = precision;
        self
    }

    /// Builder method: replace the rounding mode
    pub fn with_mode(mut self, mode: RoundingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate the context
    pub fn validate(&self) -> StatsResult<()> {
        if self.precision == 0 && self.mode != RoundingMode::Exact {
            return Err(StatsError::Configuration(format!(
                "precision 0 requires EXACT rounding, got {}",
                self.mode
            )));
        }
        Ok(())
    }

    /// True when the context forbids rounding altogether.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.mode == RoundingMode::Exact
    }

    /// Round `value` to this context's precision.
    ///
    /// # Errors
    /// - `Configuration` if the context itself is invalid
    /// - `InexactResult` under EXACT when a non-zero digit would be dropped
    pub fn round(&self, value: &BigDecimal) -> StatsResult<BigDecimal> {
        self.validate()?;
        let precision = match NonZeroU64::new(self.precision) {
            Some(precision) => precision,
            None => return Ok(value.clone()),
        };
        let (mantissa, _) = value.as_bigint_and_exponent();
        if digit_count(&mantissa) <= self.precision {
            return Ok(value.clone());
        }

        match self.mode.to_bigdecimal() {
            Some(mode) => Ok(drop_carry_digit(
                value.with_precision_round(precision, mode),
                self.precision,
            )),
            None => {
                let truncated =
                    value.with_precision_round(precision, bigdecimal::RoundingMode::Down);
                if truncated != *value {
                    return Err(StatsError::InexactResult(format!(
                        "{} does not fit {} significant digits",
                        value, self.precision
                    )));
                }
                Ok(truncated)
            },
        }
    }

    /// Correctly rounded quotient `numerator / denominator`.
    ///
    /// # Errors
    /// - `Domain` on division by zero
    /// - `Configuration` if the context itself is invalid
    /// - `InexactResult` under EXACT when the quotient does not fit
    pub fn divide(&self, numerator: &BigDecimal, denominator: &BigDecimal) -> StatsResult<BigDecimal> {
        self.validate()?;
        let (a, a_scale) = numerator.as_bigint_and_exponent();
        let (b, b_scale) = denominator.as_bigint_and_exponent();
        if b.is_zero() {
            return Err(StatsError::Domain("division by zero".to_string()));
        }
        if a.is_zero() {
            return Ok(BigDecimal::zero());
        }

        let negative = a.is_negative() != b.is_negative();
        let (a, b) = (a.abs(), b.abs());
        let scale = a_scale - b_scale;

        if self.precision == 0 {
            return exact_quotient(a, b, scale, negative);
        }

        // Shift so the integer quotient carries at least `precision` digits.
        let shift =
            self.precision as i64 + digit_count(&b) as i64 - digit_count(&a) as i64;
        let (scaled_a, scaled_b) = if shift >= 0 {
            (a * pow10(shift as u64), b)
        } else {
            (a, b * pow10(shift.unsigned_abs()))
        };
        self.round_ratio(&scaled_a, &scaled_b, scale + shift, negative)
    }

    /// Round the non-negative ratio `numerator / denominator × 10^(-scale)`
    /// to `precision` digits. The integer quotient must already carry at
    /// least `precision` digits or be exact.
    fn round_ratio(
        &self,
        numerator: &BigInt,
        denominator: &BigInt,
        scale: i64,
        negative: bool,
    ) -> StatsResult<BigDecimal> {
        let estimate = numerator / denominator;
        let excess = digit_count(&estimate).saturating_sub(self.precision);
        let divisor = denominator * pow10(excess);
        let (truncated, remainder) = numerator.div_rem(&divisor);

        let discarded = Discarded::of_fraction(&remainder, &divisor);
        let magnitude = if rounds_away(self.mode, discarded, negative, truncated.is_odd())? {
            truncated + 1u32
        } else {
            truncated
        };
        let signed = if negative { -magnitude } else { magnitude };
        let rounded = BigDecimal::new(signed, scale - excess as i64);
        Ok(drop_carry_digit(rounded, self.precision))
    }
}

impl fmt::Display for RoundingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "precision={} mode={}", self.precision, self.mode)
    }
}

/// Exact decimal quotient of `a / b × 10^(-scale)`, which exists only when
/// the reduced denominator has no prime factors besides 2 and 5.
fn exact_quotient(a: BigInt, b: BigInt, scale: i64, negative: bool) -> StatsResult<BigDecimal> {
    let gcd = a.gcd(&b);
    let a = a / &gcd;
    let b = b / &gcd;

    let two = BigInt::from(2u32);
    let five = BigInt::from(5u32);
    let mut rest = b.clone();
    let mut twos = 0u64;
    let mut fives = 0u64;
    while rest.is_multiple_of(&two) {
        rest = rest / &two;
        twos += 1;
    }
    while rest.is_multiple_of(&five) {
        rest = rest / &five;
        fives += 1;
    }
    if !rest.is_one() {
        tracing::debug!("quotient has a non-terminating expansion");
        return Err(StatsError::InexactResult(
            "quotient has a non-terminating decimal expansion".to_string(),
        ));
    }

    let shift = twos.max(fives);
    let magnitude = a * (pow10(shift) / b);
    let signed = if negative { -magnitude } else { magnitude };
    Ok(BigDecimal::new(signed, scale + shift as i64))
}

// ============================================================================
// Tests
// ============================================================================
