//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done in `Decimal`. Integer currency amounts (vouchers,
//! shipping fees) are rounded once to a whole unit at the end of a
//! calculation; commission amounts stay `f64` rounded to 2 decimal places.

use rust_decimal::prelude::*;

/// Rounding precision for commission amounts
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Inputs are validated as finite at the boundary. If NaN/Infinity reaches
/// here it is logged and treated as zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_else(|| {
            tracing::error!(value = %value, "Decimal not representable as f64, defaulting to zero");
            0.0
        })
}

/// Round to a whole currency unit, half away from zero
///
/// Saturates at the `i64` range.
pub fn round_currency(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// `amount * pct / 100`, unrounded
#[inline]
pub fn percent_of(amount: Decimal, pct: f64) -> Decimal {
    amount * to_decimal(pct) / Decimal::ONE_HUNDRED
}

/// Percentage discount on an order, floored to a whole unit
pub fn percent_discount(order_value: i64, pct: f64) -> i64 {
    percent_of(Decimal::from(order_value), pct)
        .floor()
        .to_i64()
        .unwrap_or(0)
}

/// Clamp a raw discount into `[0, min(cap, order_value)]`
pub fn cap_discount(raw: i64, cap: Option<i64>, order_value: i64) -> i64 {
    let ceiling = match cap {
        Some(cap) => cap.min(order_value),
        None => order_value,
    };
    raw.min(ceiling).max(0)
}

/// `amount * (1 + pct / 100)`; unset or zero percent is a no-op
pub fn compound_surcharge(amount: Decimal, pct: Option<f64>) -> Decimal {
    match pct {
        Some(p) if p != 0.0 => amount + percent_of(amount, p),
        _ => amount,
    }
}

/// Exact sum of f64 amounts, rounded to 2 decimal places
pub fn sum_amounts<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_f64(amounts.into_iter().map(to_decimal).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_discount_floors() {
        // 333 * 15% = 49.95
        assert_eq!(percent_discount(333, 15.0), 49);
        assert_eq!(percent_discount(1_000_000, 20.0), 200_000);
        assert_eq!(percent_discount(0, 50.0), 0);
    }

    #[test]
    fn test_cap_discount_bounds() {
        assert_eq!(cap_discount(200_000, Some(50_000), 1_000_000), 50_000);
        assert_eq!(cap_discount(200_000, None, 150_000), 150_000);
        assert_eq!(cap_discount(30_000, Some(50_000), 20_000), 20_000);
        assert_eq!(cap_discount(-5, None, 100), 0);
    }

    #[test]
    fn test_compound_surcharge_skips_unset_and_zero() {
        let base = Decimal::from(20_000);
        assert_eq!(compound_surcharge(base, None), base);
        assert_eq!(compound_surcharge(base, Some(0.0)), base);
        assert_eq!(compound_surcharge(base, Some(5.0)), Decimal::from(21_000));
    }

    #[test]
    fn test_surcharges_compound_then_round_once() {
        // 22500 * 1.05 * 1.08 = 25515
        let fee = compound_surcharge(
            compound_surcharge(Decimal::from(22_500), Some(5.0)),
            Some(8.0),
        );
        assert_eq!(round_currency(fee), 25_515);
    }

    #[test]
    fn test_round_currency_half_away_from_zero() {
        assert_eq!(round_currency(Decimal::new(25, 1)), 3);
        assert_eq!(round_currency(Decimal::new(-25, 1)), -3);
        assert_eq!(round_currency(Decimal::new(24, 1)), 2);
    }

    #[test]
    fn test_sum_amounts_is_exact() {
        assert_eq!(sum_amounts([0.1, 0.2]), 0.3);
        assert_eq!(sum_amounts([1500.5, 0.25, 99.25]), 1600.0);
        assert_eq!(sum_amounts(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_to_decimal_non_finite_is_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }
}
