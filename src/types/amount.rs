//! Integer amount arithmetic and fixed-point display utilities.
//!
//! ## Overview
//!
//! Every amount in the settlement engine is a `u64` count of token base
//! units. All cross-rate conversions widen to `u128`, multiply, and
//! floor-divide, so identical inputs produce identical fills on every
//! platform.
//!
//! ## Why No Floating Point?
//!
//! Floating-point arithmetic can produce different results on different
//! hardware, breaking determinism. A settlement engine that computes fills
//! differently on two machines loses funds; integer math ensures identical
//! results everywhere.
//!
//! ## Display Scale
//!
//! For human-readable rendering only, amounts are treated as fixed-point
//! values scaled by 10^8 (eight decimal places). The engine itself never
//! looks at [`SCALE`].
//!
//! ## Examples
//!
//! ```
//! use ring_settlement::types::amount::{scaled, tolerant_sub};
//!
//! // Convert 100 units across a 100:110 rate pair.
//! assert_eq!(scaled(100, 100, 110), Some(110));
//!
//! // Tolerant subtraction clamps at zero instead of failing.
//! assert_eq!(tolerant_sub(40, 100), 0);
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point display: 10^8
///
/// This provides 8 decimal places of precision.
pub const SCALE: u64 = 100_000_000;

// ============================================================================
// Settlement Arithmetic
// ============================================================================

/// Convert a value between two rate units: `value * to_unit / from_unit`.
///
/// The multiplication runs in `u128` and the division floors, so the result
/// is exact up to one unit of floor rounding.
///
/// # Returns
///
/// * `Some(u64)` - The converted value
/// * `None` - If `from_unit` is zero or the result exceeds `u64::MAX`
///
/// # Example
///
/// ```
/// use ring_settlement::types::amount::scaled;
///
/// // 100 units at a 100 -> 110 rate pair
/// assert_eq!(scaled(100, 100, 110), Some(110));
/// // Floor division: 10 * 100 / 3 = 333
/// assert_eq!(scaled(10, 3, 100), Some(333));
/// // Zero denominator
/// assert_eq!(scaled(1, 0, 1), None);
/// ```
pub fn scaled(value: u64, from_unit: u64, to_unit: u64) -> Option<u64> {
    if from_unit == 0 {
        return None;
    }
    let wide = (value as u128) * (to_unit as u128) / (from_unit as u128);
    u64::try_from(wide).ok()
}

/// Subtraction clamped at zero instead of failing on underflow.
///
/// Used when netting an order's declared amount against its historical
/// filled/cancelled counters: history in excess of the declared amount
/// leaves zero remaining, it is not an error.
#[inline]
pub fn tolerant_sub(a: u64, b: u64) -> u64 {
    a.saturating_sub(b)
}

/// Add two amounts, returning `None` on overflow.
#[inline]
pub fn checked_add(a: u64, b: u64) -> Option<u64> {
    a.checked_add(b)
}

// ============================================================================
// Fixed-Point Display (rendering only, never settlement math)
// ============================================================================

/// Convert a decimal string to a `u64` amount in 10^8 base units.
///
/// # Returns
///
/// * `Some(u64)` - The base-unit representation
/// * `None` - If parsing fails, the value is negative, or out of range
///
/// # Example
///
/// ```
/// use ring_settlement::types::amount::to_base_units;
///
/// assert_eq!(to_base_units("1.0"), Some(100_000_000));
/// assert_eq!(to_base_units("0.00000001"), Some(1));
/// ```
pub fn to_base_units(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    if decimal.is_sign_negative() {
        return None;
    }
    let scaled = decimal.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Render a base-unit amount as a string with 8 decimal places.
///
/// # Example
///
/// ```
/// use ring_settlement::types::amount::display_amount;
///
/// assert_eq!(display_amount(100_000_000), "1.00000000");
/// assert_eq!(display_amount(1), "0.00000001");
/// ```
pub fn display_amount(value: u64) -> String {
    let decimal = Decimal::from(value) / Decimal::from(SCALE);
    format!("{:.8}", decimal)
}

// ============================================================================
// Comparison Helpers
// ============================================================================

/// Compare two amounts with a tolerance (for conservation checks in tests).
///
/// # Returns
///
/// `true` if |a - b| <= tolerance
pub fn approx_eq(a: u64, b: u64, tolerance: u64) -> bool {
    if a >= b {
        a - b <= tolerance
    } else {
        b - a <= tolerance
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_identity() {
        // Equal units leave the value unchanged
        assert_eq!(scaled(12_345, 777, 777), Some(12_345));
        assert_eq!(scaled(0, 5, 9), Some(0));
    }

    #[test]
    fn test_scaled_floor_division() {
        // 7 * 10 / 3 = 23.33.. floors to 23
        assert_eq!(scaled(7, 3, 10), Some(23));
        // 1 * 1 / 2 floors to 0
        assert_eq!(scaled(1, 2, 1), Some(0));
    }

    #[test]
    fn test_scaled_zero_denominator() {
        assert_eq!(scaled(100, 0, 5), None);
    }

    #[test]
    fn test_scaled_overflow() {
        // u64::MAX * 2 / 1 does not fit in 64 bits
        assert_eq!(scaled(u64::MAX, 1, 2), None);
        // but fits fine through the widened intermediate when it scales down
        assert_eq!(scaled(u64::MAX, 2, 1), Some(u64::MAX / 2));
    }

    #[test]
    fn test_scaled_round_trip_loses_at_most_rounding() {
        let value = 1_000_003u64;
        let there = scaled(value, 100, 333).unwrap();
        let back = scaled(there, 333, 100).unwrap();
        assert!(back <= value);
        assert!(value - back <= 1);
    }

    #[test]
    fn test_tolerant_sub() {
        assert_eq!(tolerant_sub(100, 40), 60);
        assert_eq!(tolerant_sub(40, 100), 0);
        assert_eq!(tolerant_sub(0, 0), 0);
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(checked_add(1, 2), Some(3));
        assert_eq!(checked_add(u64::MAX, 1), None);
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units("1.0"), Some(100_000_000));
        assert_eq!(to_base_units("0.5"), Some(50_000_000));
        assert_eq!(to_base_units("0.00000001"), Some(1));
        assert_eq!(to_base_units("-1.0"), None);
        assert_eq!(to_base_units("abc"), None);
    }

    #[test]
    fn test_display_amount() {
        assert_eq!(display_amount(100_000_000), "1.00000000");
        assert_eq!(display_amount(50_000_000), "0.50000000");
        assert_eq!(display_amount(0), "0.00000000");
    }

    #[test]
    fn test_display_round_trip() {
        let values = [1u64, 50_000_000, 5_000_012_345_678];
        for v in values {
            assert_eq!(to_base_units(&display_amount(v)), Some(v));
        }
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(100, 100, 0));
        assert!(approx_eq(100, 101, 1));
        assert!(approx_eq(101, 100, 1));
        assert!(!approx_eq(100, 102, 1));
    }
}
