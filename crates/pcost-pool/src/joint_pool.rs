use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::money::{ensure_non_negative, ensure_positive, round_money, round_per_kg};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::landed::LandedCostResult;

/// Level 1 output: the cost incurred before any product is separately identifiable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointCostPoolResult {
    landed_cost_eur: Decimal,
    slaughter_cost_eur: Decimal,
    joint_cost_pool_eur: Decimal,
    griller_weight_kg: Decimal,
    griller_yield_pct: Decimal,
}

impl JointCostPoolResult {
    /// Landed cost carried in from Level 0.
    pub fn landed_cost_eur(&self) -> Decimal {
        self.landed_cost_eur
    }

    /// Slaughter cost added at this level.
    pub fn slaughter_cost_eur(&self) -> Decimal {
        self.slaughter_cost_eur
    }

    /// Landed cost plus slaughter cost.
    pub fn joint_cost_pool_eur(&self) -> Decimal {
        self.joint_cost_pool_eur
    }

    /// Eviscerated carcass weight.
    pub fn griller_weight_kg(&self) -> Decimal {
        self.griller_weight_kg
    }

    /// Griller weight as a percentage of usable live weight.
    pub fn griller_yield_pct(&self) -> Decimal {
        self.griller_yield_pct
    }
}

/// Builds the Level 1 joint cost pool. No credit or allocation happens here.
pub fn build_joint_cost_pool(
    landed: &LandedCostResult,
    slaughter_cost_eur: Decimal,
    griller_weight_kg: Decimal,
) -> Result<JointCostPoolResult, CostError> {
    ensure_non_negative("slaughter_cost_eur", slaughter_cost_eur)?;
    ensure_positive("griller_weight_kg", griller_weight_kg)?;
    let usable = landed.usable_live_kg();
    ensure_positive("usable_live_kg", usable)?;
    if griller_weight_kg > usable {
        return Err(CostError::InvalidInput(
            ErrorInfo::new(
                "yield-above-live-weight",
                "griller weight exceeds usable live weight",
            )
            .with_context("griller_weight_kg", griller_weight_kg)
            .with_context("usable_live_kg", usable),
        ));
    }

    let slaughter_cost_eur = round_money(slaughter_cost_eur);
    Ok(JointCostPoolResult {
        landed_cost_eur: landed.landed_cost_eur(),
        slaughter_cost_eur,
        joint_cost_pool_eur: landed.landed_cost_eur() + slaughter_cost_eur,
        griller_weight_kg,
        griller_yield_pct: round_per_kg(griller_weight_kg * Decimal::ONE_HUNDRED / usable),
    })
}
