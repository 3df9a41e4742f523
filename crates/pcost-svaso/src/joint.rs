use pcost_core::errors::CostError;
use pcost_core::money::{ensure_non_negative, round_factor};
use pcost_core::{CostingConfig, JointProductCode, PartCode};
use pcost_pool::NetJointCostResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::primitive::{allocate_by_market_value, AllocationLine};
use crate::scope::{ensure_allocable, ensure_unique};

/// One joint product offered to the SVASO allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointProductInput {
    /// Allocable joint product code.
    pub part_code: JointProductCode,
    /// Weighed output in kilograms.
    pub weight_kg: Decimal,
    /// Derived market value per kilogram at split-off.
    pub shadow_price_per_kg: Decimal,
}

impl JointProductInput {
    /// Builds an input from a plant-wide part code, rejecting anything that
    /// is not an allocable joint product.
    pub fn from_part(
        part: PartCode,
        weight_kg: Decimal,
        shadow_price_per_kg: Decimal,
    ) -> Result<Self, CostError> {
        Ok(Self {
            part_code: JointProductCode::try_from(part)?,
            weight_kg,
            shadow_price_per_kg,
        })
    }

    /// Builds an input from a textual code (see [`JointProductCode`]'s `FromStr`).
    pub fn parse(
        code: &str,
        weight_kg: Decimal,
        shadow_price_per_kg: Decimal,
    ) -> Result<Self, CostError> {
        Ok(Self {
            part_code: code.parse()?,
            weight_kg,
            shadow_price_per_kg,
        })
    }
}

/// Cost assigned to one joint product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointProductAllocation {
    part_code: JointProductCode,
    weight_kg: Decimal,
    shadow_price_per_kg: Decimal,
    market_value_eur: Decimal,
    allocation_factor: Decimal,
    allocated_cost_per_kg: Decimal,
    allocated_cost_total_eur: Decimal,
}

impl JointProductAllocation {
    /// Joint product code.
    pub fn part_code(&self) -> JointProductCode {
        self.part_code
    }

    /// Weighed output.
    pub fn weight_kg(&self) -> Decimal {
        self.weight_kg
    }

    /// Shadow price used as allocation weight.
    pub fn shadow_price_per_kg(&self) -> Decimal {
        self.shadow_price_per_kg
    }

    /// Weight × shadow price.
    pub fn market_value_eur(&self) -> Decimal {
        self.market_value_eur
    }

    /// Share of total market value, rounded for reporting.
    pub fn allocation_factor(&self) -> Decimal {
        self.allocation_factor
    }

    /// Allocated cost per kilogram.
    pub fn allocated_cost_per_kg(&self) -> Decimal {
        self.allocated_cost_per_kg
    }

    /// Allocated cost in EUR.
    pub fn allocated_cost_total_eur(&self) -> Decimal {
        self.allocated_cost_total_eur
    }
}

/// Level 3 output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvasoAllocationResult {
    net_joint_cost_eur: Decimal,
    total_market_value_eur: Decimal,
    allocations: Vec<JointProductAllocation>,
    sum_allocation_factor: Decimal,
    sum_allocated_cost_eur: Decimal,
    reconciliation_delta_eur: Decimal,
}

impl SvasoAllocationResult {
    /// Net joint cost that was split.
    pub fn net_joint_cost_eur(&self) -> Decimal {
        self.net_joint_cost_eur
    }

    /// Σ market value of the joint products.
    pub fn total_market_value_eur(&self) -> Decimal {
        self.total_market_value_eur
    }

    /// Allocations in input order.
    pub fn allocations(&self) -> &[JointProductAllocation] {
        &self.allocations
    }

    /// Allocation for one joint product, if it took part.
    pub fn allocation(&self, code: JointProductCode) -> Option<&JointProductAllocation> {
        self.allocations.iter().find(|a| a.part_code == code)
    }

    /// Σ allocation factor before rounding.
    pub fn sum_allocation_factor(&self) -> Decimal {
        self.sum_allocation_factor
    }

    /// Σ allocated cost.
    pub fn sum_allocated_cost_eur(&self) -> Decimal {
        self.sum_allocated_cost_eur
    }

    /// Σ allocated cost minus net joint cost.
    pub fn reconciliation_delta_eur(&self) -> Decimal {
        self.reconciliation_delta_eur
    }
}

/// Allocates the Level 2 net joint cost across the joint products.
pub fn allocate_joint_costs(
    net: &NetJointCostResult,
    products: &[JointProductInput],
    config: &CostingConfig,
) -> Result<SvasoAllocationResult, CostError> {
    allocate_net_joint_cost(net.net_joint_cost_eur(), products, config)
}

/// Allocates an explicit net joint cost across the joint products.
///
/// Scope is checked for every item before any arithmetic: a code outside the
/// configured allocable set fails the whole call and is never dropped.
pub fn allocate_net_joint_cost(
    net_joint_cost_eur: Decimal,
    products: &[JointProductInput],
    config: &CostingConfig,
) -> Result<SvasoAllocationResult, CostError> {
    for product in products {
        ensure_allocable(product.part_code, config)?;
    }
    ensure_unique(products.iter().map(|p| p.part_code))?;
    ensure_non_negative("net_joint_cost_eur", net_joint_cost_eur)?;

    let lines: Vec<AllocationLine<JointProductCode>> = products
        .iter()
        .map(|p| AllocationLine {
            key: p.part_code,
            weight_kg: p.weight_kg,
            price_per_kg: p.shadow_price_per_kg,
        })
        .collect();
    let outcome = allocate_by_market_value(net_joint_cost_eur, &lines, config.tolerances())?;

    let allocations = outcome
        .shares
        .into_iter()
        .map(|share| JointProductAllocation {
            part_code: share.key,
            weight_kg: share.weight_kg,
            shadow_price_per_kg: share.price_per_kg,
            market_value_eur: share.market_value_eur,
            allocation_factor: round_factor(share.allocation_factor),
            allocated_cost_per_kg: share.allocated_cost_per_kg,
            allocated_cost_total_eur: share.allocated_cost_total_eur,
        })
        .collect();

    Ok(SvasoAllocationResult {
        net_joint_cost_eur,
        total_market_value_eur: outcome.total_market_value_eur,
        allocations,
        sum_allocation_factor: outcome.check.sum_allocation_factor,
        sum_allocated_cost_eur: outcome.check.sum_allocated_cost_eur,
        reconciliation_delta_eur: outcome.check.delta_eur,
    })
}
