// ============================================================================
// rust_decimal Interop
// Conversions between BigDecimal and the fixed-width 96-bit Decimal
// ============================================================================

use super::errors::{StatsError, StatsResult};
use super::rounding::pow10;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

/// Largest scale a rust_decimal::Decimal can carry
const MAX_DECIMAL_SCALE: i64 = 28;

/// Convert from rust_decimal::Decimal. Always lossless.
pub fn from_rust_decimal(value: rust_decimal::Decimal) -> BigDecimal {
    BigDecimal::new(BigInt::from(value.mantissa()), i64::from(value.scale()))
}

/// Convert to rust_decimal::Decimal.
///
/// Trailing zeros beyond the maximum scale are dropped; any other loss is
/// refused rather than rounded.
///
/// # Errors
/// Returns `Unrepresentable` if the value needs more than 28 fractional
/// digits or does not fit the 96-bit mantissa.
pub fn to_rust_decimal(value: &BigDecimal) -> StatsResult<rust_decimal::Decimal> {
    let (mut mantissa, mut scale) = value.as_bigint_and_exponent();
    if scale < 0 {
        mantissa *= pow10(scale.unsigned_abs());
        scale = 0;
    }

    let ten = BigInt::from(10u32);
    while scale > MAX_DECIMAL_SCALE && !mantissa.is_zero() && mantissa.is_multiple_of(&ten) {
        mantissa = mantissa / &ten;
        scale -= 1;
    }
    if mantissa.is_zero() {
        return Ok(rust_decimal::Decimal::ZERO);
    }
    if scale > MAX_DECIMAL_SCALE {
        return Err(StatsError::Unrepresentable(format!(
            "{} needs {} fractional digits, at most {} supported",
            value, scale, MAX_DECIMAL_SCALE
        )));
    }

    let raw = mantissa.to_i128().ok_or_else(|| {
        StatsError::Unrepresentable(format!("{} exceeds the 96-bit mantissa", value))
    })?;
    rust_decimal::Decimal::try_from_i128_with_scale(raw, scale as u32)
        .map_err(|e| StatsError::Unrepresentable(format!("{}: {}", value, e)))
}
