//! The allocation primitive shared by SVASO and mini-SVASO.
//!
//! Evaluation is two-pass: every item except the last receives its rounded
//! proportional share, then the last item in input order receives whatever is
//! left of the total. The output therefore depends on input order, and the
//! same ordered input always yields the same output.
//!
//! Every item must carry a positive market value, so the residual never lands
//! on an item that would otherwise be worth nothing. The sign of the total is
//! the caller's concern: Level 3 rejects a negative net joint cost, and Level
//! 4 splits whatever Level 3 assigned to the parent.

use std::fmt::Display;

use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::money::{ensure_non_negative, per_kg, round_money, round_per_kg};
use pcost_core::Tolerances;
use rust_decimal::Decimal;

fn allocation_error(code: &str, message: impl Into<String>) -> CostError {
    CostError::InvalidInput(ErrorInfo::new(code, message.into()))
}

/// One item offered to an allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationLine<K> {
    /// Caller key carried through to the share.
    pub key: K,
    /// Physical weight of the item.
    pub weight_kg: Decimal,
    /// Market value per kilogram used as the allocation weight.
    pub price_per_kg: Decimal,
}

/// Portion of the total assigned to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationShare<K> {
    /// Caller key.
    pub key: K,
    /// Physical weight of the item.
    pub weight_kg: Decimal,
    /// Price per kilogram the share was weighted by.
    pub price_per_kg: Decimal,
    /// Weight × price.
    pub market_value_eur: Decimal,
    /// Unrounded market value share.
    pub allocation_factor: Decimal,
    /// Cost assigned to the item, in cents.
    pub allocated_cost_total_eur: Decimal,
    /// Assigned cost per kilogram; zero for a weightless item.
    pub allocated_cost_per_kg: Decimal,
}

/// Sums observed after an allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationCheck {
    /// Σ allocation factor.
    pub sum_allocation_factor: Decimal,
    /// Σ allocated cost.
    pub sum_allocated_cost_eur: Decimal,
    /// Σ allocated cost minus the total that was split.
    pub delta_eur: Decimal,
}

/// Result of [`allocate_by_market_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome<K> {
    /// Shares in input order.
    pub shares: Vec<AllocationShare<K>>,
    /// Σ market value.
    pub total_market_value_eur: Decimal,
    /// Invariant sums, already checked against the tolerances.
    pub check: ReconciliationCheck,
}

/// Splits `total_cost_eur` across `lines` in proportion to market value.
///
/// The last line absorbs the rounding residual so the shares sum to the total
/// exactly. A line with zero weight or zero price is rejected with
/// `zero-market-value-item`.
pub fn allocate_by_market_value<K: Clone + Display>(
    total_cost_eur: Decimal,
    lines: &[AllocationLine<K>],
    tolerances: &Tolerances,
) -> Result<AllocationOutcome<K>, CostError> {
    let Some(last_index) = lines.len().checked_sub(1) else {
        return Err(allocation_error(
            "empty-allocation",
            "at least one item is required to allocate a cost",
        ));
    };
    for line in lines {
        ensure_non_negative("weight_kg", line.weight_kg)
            .and_then(|_| ensure_non_negative("price_per_kg", line.price_per_kg))
            .map_err(|err| err.with_context("item", &line.key))?;
    }

    let market_values: Vec<Decimal> = lines
        .iter()
        .map(|line| line.weight_kg * line.price_per_kg)
        .collect();
    let total_market_value_eur: Decimal = market_values.iter().sum();
    if total_market_value_eur <= Decimal::ZERO {
        return Err(CostError::InvalidInput(
            ErrorInfo::new(
                "zero-market-value",
                "cannot allocate a cost when the items carry no market value",
            )
            .with_context("items", lines.len())
            .with_hint("check that every item has a weight and a shadow price"),
        ));
    }
    if let Some((line, _)) = lines
        .iter()
        .zip(&market_values)
        .find(|(_, value)| value.is_zero())
    {
        return Err(CostError::InvalidInput(
            ErrorInfo::new(
                "zero-market-value-item",
                "an item without market value cannot take part in an allocation",
            )
            .with_context("item", &line.key)
            .with_context("weight_kg", line.weight_kg)
            .with_context("price_per_kg", line.price_per_kg),
        ));
    }

    let factors: Vec<Decimal> = market_values
        .iter()
        .map(|value| *value / total_market_value_eur)
        .collect();

    let mut allocated = Vec::with_capacity(lines.len());
    for factor in &factors[..last_index] {
        allocated.push(round_money(total_cost_eur * *factor));
    }
    let prior: Decimal = allocated.iter().sum();
    allocated.push(total_cost_eur - prior);

    let shares: Vec<AllocationShare<K>> = lines
        .iter()
        .zip(market_values)
        .zip(factors)
        .zip(allocated)
        .map(|(((line, market_value), factor), cost)| AllocationShare {
            key: line.key.clone(),
            weight_kg: line.weight_kg,
            price_per_kg: line.price_per_kg,
            market_value_eur: market_value,
            allocation_factor: factor,
            allocated_cost_total_eur: cost,
            allocated_cost_per_kg: round_per_kg(per_kg(cost, line.weight_kg)),
        })
        .collect();

    let check = verify_reconciliation(
        total_cost_eur,
        shares.iter().map(|share| share.allocated_cost_total_eur),
        shares.iter().map(|share| share.allocation_factor),
        tolerances,
    )?;

    Ok(AllocationOutcome {
        shares,
        total_market_value_eur,
        check,
    })
}

/// Checks Σ allocated = total and Σ factor = 1 within the tolerances.
///
/// A breach is reported as [`CostError::ReconciliationFailure`]: with the
/// residual rule in place it can only come from a defect, never from input.
pub fn verify_reconciliation(
    total_cost_eur: Decimal,
    allocated: impl IntoIterator<Item = Decimal>,
    factors: impl IntoIterator<Item = Decimal>,
    tolerances: &Tolerances,
) -> Result<ReconciliationCheck, CostError> {
    let sum_allocated_cost_eur: Decimal = allocated.into_iter().sum();
    let sum_allocation_factor: Decimal = factors.into_iter().sum();
    let delta_eur = sum_allocated_cost_eur - total_cost_eur;

    if delta_eur.abs() > tolerances.reconciliation_eur {
        return Err(CostError::ReconciliationFailure(
            ErrorInfo::new("cost-sum-drift", "allocated costs do not sum to the total")
                .with_context("total_cost_eur", total_cost_eur)
                .with_context("sum_allocated_cost_eur", sum_allocated_cost_eur),
        ));
    }
    if (sum_allocation_factor - Decimal::ONE).abs() > tolerances.factor_sum {
        return Err(CostError::ReconciliationFailure(
            ErrorInfo::new("factor-sum-drift", "allocation factors do not sum to one")
                .with_context("sum_allocation_factor", sum_allocation_factor),
        ));
    }

    Ok(ReconciliationCheck {
        sum_allocation_factor,
        sum_allocated_cost_eur,
        delta_eur,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(key: &'static str, weight: i64, price: i64) -> AllocationLine<&'static str> {
        AllocationLine {
            key,
            weight_kg: Decimal::from(weight),
            price_per_kg: Decimal::from(price),
        }
    }

    #[test]
    fn last_item_takes_the_residual() {
        // Three equal thirds of 100.00 cannot all be 33.33.
        let lines = [line("a", 1, 1), line("b", 1, 1), line("c", 1, 1)];
        let outcome =
            allocate_by_market_value(Decimal::new(10000, 2), &lines, &Tolerances::default())
                .unwrap();
        let costs: Vec<_> = outcome
            .shares
            .iter()
            .map(|s| s.allocated_cost_total_eur)
            .collect();
        assert_eq!(
            costs,
            vec![Decimal::new(3333, 2), Decimal::new(3333, 2), Decimal::new(3334, 2)]
        );
        assert_eq!(outcome.check.delta_eur, Decimal::ZERO);
    }

    #[test]
    fn weightless_item_is_rejected() {
        let lines = [line("a", 10, 2), line("b", 0, 5)];
        let err = allocate_by_market_value(Decimal::from(50), &lines, &Tolerances::default())
            .unwrap_err();
        assert_eq!(err.info().code, "zero-market-value-item");
        assert_eq!(err.info().context.get("item").map(String::as_str), Some("b"));
        assert!(!err.is_defect());
    }

    #[test]
    fn priceless_last_item_never_takes_a_negative_residual() {
        // 0.01 split over two equal items rounds both up to 0.01.
        let lines = [line("a", 1, 1), line("b", 1, 1), line("c", 1, 0)];
        let err = allocate_by_market_value(Decimal::new(1, 2), &lines, &Tolerances::default())
            .unwrap_err();
        assert_eq!(err.info().code, "zero-market-value-item");
        assert_eq!(err.info().context.get("item").map(String::as_str), Some("c"));
    }

    #[test]
    fn negative_total_is_split_like_any_other() {
        let lines = [line("a", 1, 1), line("b", 1, 3)];
        let outcome =
            allocate_by_market_value(Decimal::new(-100, 2), &lines, &Tolerances::default())
                .unwrap();
        assert_eq!(outcome.shares[0].allocated_cost_total_eur, Decimal::new(-25, 2));
        assert_eq!(outcome.shares[1].allocated_cost_total_eur, Decimal::new(-75, 2));
    }

    #[test]
    fn drift_beyond_tolerance_is_a_defect() {
        let err = verify_reconciliation(
            Decimal::from(100),
            [Decimal::from(60), Decimal::new(4002, 2)],
            [Decimal::new(6, 1), Decimal::new(4, 1)],
            &Tolerances::default(),
        )
        .unwrap_err();
        assert!(err.is_defect());
        assert_eq!(err.info().code, "cost-sum-drift");
    }
}
