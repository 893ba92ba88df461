// ============================================================================
// Decimal Square Root
// Correctly rounded square roots built on an integer Babylonian root
// ============================================================================

use super::errors::{StatsError, StatsResult};
use super::rounding::{
    digit_count, drop_carry_digit, pow10, rounds_away, Discarded, RoundingContext, RoundingMode,
};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;

/// Square root of a non-negative decimal, correctly rounded to `context`.
///
/// The radicand is truncated to `2 × precision − 1` significant digits (one
/// more when needed to make its scale even), which is enough to fix every
/// digit of the floor root at the requested precision. The last digit is
/// then resolved by comparing the original value against the squares of the
/// floor root and of the midpoint between the floor root and its successor.
///
/// Under [`RoundingMode::Exact`] the whole stripped radicand is used and the
/// root must square back to the input.
///
/// # Errors
/// - `Domain` if `value` is negative
/// - `Configuration` for precision 0 with a mode other than EXACT
/// - `InexactResult` under EXACT when the root is not representable
///
/// # Example
/// ```
/// use decimal_stats::numeric::{sqrt, RoundingContext, RoundingMode};
/// use std::str::FromStr;
///
/// let two = bigdecimal::BigDecimal::from_str("2").unwrap();
/// let root = sqrt(&two, &RoundingContext::new(5, RoundingMode::HalfUp)).unwrap();
/// assert_eq!(root.to_string(), "1.4142");
/// ```
pub fn sqrt(value: &BigDecimal, context: &RoundingContext) -> StatsResult<BigDecimal> {
    context.validate()?;
    let (mantissa, scale) = value.as_bigint_and_exponent();
    if mantissa.is_negative() {
        return Err(StatsError::Domain(format!(
            "square root of negative number {}",
            value
        )));
    }
    if mantissa.is_zero() {
        return Ok(BigDecimal::zero());
    }

    let (mantissa, scale, figures) = if context.is_exact() {
        let (stripped, stripped_scale) = strip_trailing_zeros(mantissa, scale);
        let figures = digit_count(&stripped);
        (stripped, stripped_scale, figures)
    } else {
        let figures = context.precision.checked_mul(2).ok_or_else(|| {
            StatsError::Configuration(format!(
                "precision {} is too large for a square root",
                context.precision
            ))
        })?;
        (mantissa, scale, figures - 1)
    };

    let (radicand, radicand_scale) = truncate_to_even_scale(&mantissa, scale, figures);
    let root = isqrt(&radicand)?;
    let root_scale = radicand_scale / 2;

    if context.is_exact() {
        let floor = BigDecimal::new(root, root_scale);
        if &(&floor * &floor) != value {
            tracing::debug!(%value, "square root is not exactly representable");
            return Err(StatsError::InexactResult(format!(
                "square root of {} has infinitely many digits",
                value
            )));
        }
        return context.round(&floor);
    }

    let candidate = round_root(root, root_scale, context.mode, |root| {
        value.cmp(&(root * root))
    })?;
    // a carry out of the last digit leaves one digit too many
    Ok(drop_carry_digit(candidate, context.precision))
}

/// Pick between a floor root `root × 10^(-scale)` and its successor.
///
/// `compare_square(c)` must report how the exact squared target compares
/// with `c²`, so that `Equal` at the floor means the root is exact.
pub(crate) fn round_root<F>(
    root: BigInt,
    scale: i64,
    mode: RoundingMode,
    compare_square: F,
) -> StatsResult<BigDecimal>
where
    F: Fn(&BigDecimal) -> Ordering,
{
    let floor = BigDecimal::new(root.clone(), scale);
    let discarded = if compare_square(&floor) == Ordering::Equal {
        Discarded::Zero
    } else {
        let midpoint = BigDecimal::new(&root * 10u32 + 5u32, scale + 1);
        Discarded::from_half_ordering(compare_square(&midpoint))
    };

    let root = if rounds_away(mode, discarded, false, root.is_odd())? {
        root + 1u32
    } else {
        root
    };
    Ok(BigDecimal::new(root, scale))
}

/// Integer square root: the largest `r` with `r² <= n`.
///
/// Babylonian iteration `r := (r + n / r) / 2` seeded from the bit length,
/// stopped once a step moves by at most one, then settled exactly.
///
/// # Errors
/// Returns `Domain` if `n` is negative.
pub fn isqrt(n: &BigInt) -> StatsResult<BigInt> {
    if n.is_negative() {
        return Err(StatsError::Domain(format!(
            "integer square root of negative number {}",
            n
        )));
    }
    if n.is_zero() {
        return Ok(BigInt::zero());
    }

    let mut root = initial_estimate(n);
    loop {
        let next: BigInt = (&root + n / &root) >> 1u32;
        let step = (&next - &root).abs();
        root = next;
        if step <= BigInt::one() {
            break;
        }
    }

    while &root * &root > *n {
        root -= 1u32;
    }
    loop {
        let successor = &root + 1u32;
        if &successor * &successor > *n {
            break;
        }
        root = successor;
    }
    Ok(root)
}

/// 2^(⌈bits / 2⌉ − 1): within a factor of two of the root.
fn initial_estimate(n: &BigInt) -> BigInt {
    let half_bits = (n.bits() + 1) / 2;
    BigInt::one() << (half_bits - 1)
}

/// Truncate `mantissa × 10^(-scale)` toward zero to `figures` significant
/// digits, or `figures + 1` when that is what makes the new scale even.
pub(crate) fn truncate_to_even_scale(mantissa: &BigInt, scale: i64, figures: u64) -> (BigInt, i64) {
    let mut target = scale + figures as i64 - digit_count(mantissa) as i64;
    target += target.rem_euclid(2);

    let truncated = if target >= scale {
        mantissa * pow10((target - scale) as u64)
    } else {
        mantissa / pow10((scale - target) as u64)
    };
    (truncated, target)
}

fn strip_trailing_zeros(mut mantissa: BigInt, mut scale: i64) -> (BigInt, i64) {
    let ten = BigInt::from(10u32);
    while !mantissa.is_zero() && mantissa.is_multiple_of(&ten) {
        mantissa = mantissa / &ten;
        scale -= 1;
    }
    (mantissa, scale)
}

// ============================================================================
// Tests
// ============================================================================
