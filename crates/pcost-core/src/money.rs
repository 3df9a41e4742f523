//! Decimal rounding and validation helpers.
//!
//! Every amount in the engine is a [`Decimal`]. Totals in EUR are kept at cent
//! precision, per-kilogram figures at [`PER_KG_DP`] and reported allocation
//! factors at [`FACTOR_DP`]. Rounding is midpoint-away-from-zero throughout.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{CostError, ErrorInfo};

/// Decimal places kept for EUR totals.
pub const MONEY_DP: u32 = 2;
/// Decimal places kept for per-kilogram figures.
pub const PER_KG_DP: u32 = 6;
/// Decimal places kept for reported allocation factors.
pub const FACTOR_DP: u32 = 8;

/// Rounds an EUR amount to cents.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a per-kilogram figure.
pub fn round_per_kg(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PER_KG_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an allocation factor for reporting.
pub fn round_factor(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(FACTOR_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides a total by a weight, yielding zero for a zero weight.
pub fn per_kg(total: Decimal, weight_kg: Decimal) -> Decimal {
    total.checked_div(weight_kg).unwrap_or(Decimal::ZERO)
}

/// Fails with [`CostError::InvalidInput`] when `value` is negative.
pub fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), CostError> {
    if value < Decimal::ZERO {
        return Err(CostError::InvalidInput(
            ErrorInfo::new("negative-value", format!("{field} must not be negative"))
                .with_context("field", field)
                .with_context("value", value),
        ));
    }
    Ok(())
}

/// Fails with [`CostError::InvalidInput`] unless `value` is strictly positive.
pub fn ensure_positive(field: &str, value: Decimal) -> Result<(), CostError> {
    if value <= Decimal::ZERO {
        return Err(CostError::InvalidInput(
            ErrorInfo::new("non-positive-value", format!("{field} must be positive"))
                .with_context("field", field)
                .with_context("value", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn money_rounds_half_away_from_zero() {
        assert_eq!(round_money(d("53.026")), d("53.03"));
        assert_eq!(round_money(d("0.005")), d("0.01"));
        assert_eq!(round_money(d("-0.005")), d("-0.01"));
        assert_eq!(round_money(d("12.344")), d("12.34"));
    }

    #[test]
    fn per_kg_of_zero_weight_is_zero() {
        assert_eq!(per_kg(d("100"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(per_kg(d("100"), d("4")), d("25"));
    }

    #[test]
    fn validation_rejects_negative_and_zero() {
        assert!(ensure_non_negative("w", Decimal::ZERO).is_ok());
        assert!(ensure_non_negative("w", d("-0.01")).is_err());
        assert!(ensure_positive("w", Decimal::ZERO).is_err());
        let err = ensure_positive("live_weight_kg", d("-1")).unwrap_err();
        assert_eq!(err.info().context["field"], "live_weight_kg");
    }
}
