use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::money::{ensure_non_negative, round_factor};
use pcost_core::{CostingConfig, JointProductCode, SubCutCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::joint::JointProductAllocation;
use crate::primitive::{allocate_by_market_value, AllocationLine};
use crate::scope::{ensure_sub_cut_of, ensure_unique};

/// One named sub-cut carved from a joint product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubJointCutInput {
    /// Sub-cut code; its parent must match the allocation being split.
    pub sub_cut_code: SubCutCode,
    /// Weighed output in kilograms.
    pub weight_kg: Decimal,
    /// Derived market value per kilogram.
    pub shadow_price_per_kg: Decimal,
}

/// Cost assigned to one sub-cut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubJointAllocation {
    sub_cut_code: SubCutCode,
    weight_kg: Decimal,
    shadow_price_per_kg: Decimal,
    market_value_eur: Decimal,
    allocation_factor: Decimal,
    allocated_cost_per_kg: Decimal,
    allocated_cost_total_eur: Decimal,
}

impl SubJointAllocation {
    /// Sub-cut code.
    pub fn sub_cut_code(&self) -> SubCutCode {
        self.sub_cut_code
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

    /// Share of the parent's named market value.
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

/// Parent weight not claimed by any named sub-cut. Never carries cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestTrim {
    weight_kg: Decimal,
    allocated_cost_eur: Decimal,
}

impl RestTrim {
    /// Unclaimed weight.
    pub fn weight_kg(&self) -> Decimal {
        self.weight_kg
    }

    /// Always zero.
    pub fn allocated_cost_eur(&self) -> Decimal {
        self.allocated_cost_eur
    }
}

/// Level 4 output for one parent joint product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniSvasoResult {
    parent_code: JointProductCode,
    parent_weight_kg: Decimal,
    parent_allocated_cost_eur: Decimal,
    total_market_value_eur: Decimal,
    sub_allocations: Vec<SubJointAllocation>,
    rest_trim: RestTrim,
    sum_allocation_factor: Decimal,
    sum_allocated_cost_eur: Decimal,
    reconciliation_delta_eur: Decimal,
}

impl MiniSvasoResult {
    /// Parent joint product.
    pub fn parent_code(&self) -> JointProductCode {
        self.parent_code
    }

    /// Parent weight at Level 3.
    pub fn parent_weight_kg(&self) -> Decimal {
        self.parent_weight_kg
    }

    /// Parent cost being split.
    pub fn parent_allocated_cost_eur(&self) -> Decimal {
        self.parent_allocated_cost_eur
    }

    /// Σ market value of the named sub-cuts.
    pub fn total_market_value_eur(&self) -> Decimal {
        self.total_market_value_eur
    }

    /// Sub-cut allocations in input order.
    pub fn sub_allocations(&self) -> &[SubJointAllocation] {
        &self.sub_allocations
    }

    /// Allocation for one sub-cut, if it was named.
    pub fn sub_allocation(&self, code: SubCutCode) -> Option<&SubJointAllocation> {
        self.sub_allocations.iter().find(|a| a.sub_cut_code == code)
    }

    /// Unclaimed parent weight.
    pub fn rest_trim(&self) -> &RestTrim {
        &self.rest_trim
    }

    /// Σ allocation factor before rounding.
    pub fn sum_allocation_factor(&self) -> Decimal {
        self.sum_allocation_factor
    }

    /// Σ named sub-cut cost.
    pub fn sum_allocated_cost_eur(&self) -> Decimal {
        self.sum_allocated_cost_eur
    }

    /// Σ named sub-cut cost minus parent cost.
    pub fn reconciliation_delta_eur(&self) -> Decimal {
        self.reconciliation_delta_eur
    }
}

/// Splits one joint product's allocated cost across its named sub-cuts.
///
/// Only named sub-cuts take part; the unclaimed weight is reported as
/// rest/trim at zero cost and does not dilute the named cuts.
pub fn allocate_sub_cuts(
    parent: &JointProductAllocation,
    cuts: &[SubJointCutInput],
    config: &CostingConfig,
) -> Result<MiniSvasoResult, CostError> {
    let parent_code = parent.part_code();
    for cut in cuts {
        ensure_sub_cut_of(parent_code, cut.sub_cut_code)?;
    }
    ensure_unique(cuts.iter().map(|c| c.sub_cut_code))?;
    for cut in cuts {
        ensure_non_negative("weight_kg", cut.weight_kg)
            .map_err(|err| err.with_context("sub_cut", cut.sub_cut_code))?;
    }

    let named_kg: Decimal = cuts.iter().map(|c| c.weight_kg).sum();
    if named_kg > parent.weight_kg() {
        return Err(CostError::InvalidInput(
            ErrorInfo::new(
                "sub-cuts-exceed-parent",
                "named sub-cuts weigh more than the joint product they come from",
            )
            .with_context("parent", parent_code)
            .with_context("parent_weight_kg", parent.weight_kg())
            .with_context("sub_cut_weight_kg", named_kg),
        ));
    }

    let lines: Vec<AllocationLine<SubCutCode>> = cuts
        .iter()
        .map(|c| AllocationLine {
            key: c.sub_cut_code,
            weight_kg: c.weight_kg,
            price_per_kg: c.shadow_price_per_kg,
        })
        .collect();
    let outcome = allocate_by_market_value(
        parent.allocated_cost_total_eur(),
        &lines,
        config.tolerances(),
    )
    .map_err(|err| err.with_context("parent", parent_code))?;

    let sub_allocations = outcome
        .shares
        .into_iter()
        .map(|share| SubJointAllocation {
            sub_cut_code: share.key,
            weight_kg: share.weight_kg,
            shadow_price_per_kg: share.price_per_kg,
            market_value_eur: share.market_value_eur,
            allocation_factor: round_factor(share.allocation_factor),
            allocated_cost_per_kg: share.allocated_cost_per_kg,
            allocated_cost_total_eur: share.allocated_cost_total_eur,
        })
        .collect();

    Ok(MiniSvasoResult {
        parent_code,
        parent_weight_kg: parent.weight_kg(),
        parent_allocated_cost_eur: parent.allocated_cost_total_eur(),
        total_market_value_eur: outcome.total_market_value_eur,
        sub_allocations,
        rest_trim: RestTrim {
            weight_kg: (parent.weight_kg() - named_kg).max(Decimal::ZERO),
            allocated_cost_eur: Decimal::ZERO,
        },
        sum_allocation_factor: outcome.check.sum_allocation_factor,
        sum_allocated_cost_eur: outcome.check.sum_allocated_cost_eur,
        reconciliation_delta_eur: outcome.check.delta_eur,
    })
}
