use pcost_core::errors::CostError;
use pcost_core::money::{ensure_non_negative, round_money};
use pcost_core::CostObjectRef;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One activity consumed by a cost object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbcCostDriver {
    /// Activity identifier, e.g. `tray_sealing`.
    pub driver_code: String,
    /// Cost object the activity is charged to.
    pub target: CostObjectRef,
    /// Cost per driver unit.
    pub rate_per_unit: Decimal,
    /// Units consumed by the target.
    pub units_consumed: Decimal,
}

/// Costed driver line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbcCostLine {
    driver_code: String,
    target: CostObjectRef,
    rate_per_unit: Decimal,
    units_consumed: Decimal,
    cost_eur: Decimal,
}

impl AbcCostLine {
    /// Activity identifier.
    pub fn driver_code(&self) -> &str {
        &self.driver_code
    }

    /// Cost object charged.
    pub fn target(&self) -> &CostObjectRef {
        &self.target
    }

    /// Cost per unit.
    pub fn rate_per_unit(&self) -> Decimal {
        self.rate_per_unit
    }

    /// Units consumed.
    pub fn units_consumed(&self) -> Decimal {
        self.units_consumed
    }

    /// Rate × units, in cents.
    pub fn cost_eur(&self) -> Decimal {
        self.cost_eur
    }
}

/// Level 5 output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbcCostResult {
    lines: Vec<AbcCostLine>,
    total_abc_cost_eur: Decimal,
}

impl AbcCostResult {
    /// Costed lines in input order.
    pub fn lines(&self) -> &[AbcCostLine] {
        &self.lines
    }

    /// Σ line cost.
    pub fn total_abc_cost_eur(&self) -> Decimal {
        self.total_abc_cost_eur
    }

    /// Σ cost charged to one target; zero when nothing was charged.
    pub fn total_for(&self, target: &CostObjectRef) -> Decimal {
        self.lines
            .iter()
            .filter(|line| &line.target == target)
            .map(|line| line.cost_eur)
            .sum()
    }
}

/// Costs every driver as `rate × units`.
///
/// This is plain addition. Nothing here reads or changes the joint cost
/// allocation.
pub fn compute_abc_costs(drivers: &[AbcCostDriver]) -> Result<AbcCostResult, CostError> {
    let mut lines = Vec::with_capacity(drivers.len());
    for driver in drivers {
        ensure_non_negative("rate_per_unit", driver.rate_per_unit)
            .and_then(|_| ensure_non_negative("units_consumed", driver.units_consumed))
            .map_err(|err| err.with_context("driver_code", &driver.driver_code))?;
        lines.push(AbcCostLine {
            driver_code: driver.driver_code.clone(),
            target: driver.target.clone(),
            rate_per_unit: driver.rate_per_unit,
            units_consumed: driver.units_consumed,
            cost_eur: round_money(driver.rate_per_unit * driver.units_consumed),
        });
    }
    let total_abc_cost_eur = lines.iter().map(|line| line.cost_eur).sum();
    Ok(AbcCostResult {
        lines,
        total_abc_cost_eur,
    })
}
