use std::fmt;

use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::{JointProductCode, SubCutCode};
use pcost_svaso::{MiniSvasoResult, SvasoAllocationResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Allocation a SKU draws its meat cost from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostSource {
    /// A whole joint product from Level 3.
    Joint(JointProductCode),
    /// A named sub-cut from Level 4.
    SubCut(SubCutCode),
}

impl fmt::Display for CostSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostSource::Joint(code) => write!(f, "joint:{code}"),
            CostSource::SubCut(code) => write!(f, "sub_cut:{code}"),
        }
    }
}

/// Reads the allocated cost per kilogram for `source`.
///
/// The value is copied out; callers never hold a reference into the
/// allocation results.
pub fn resolve_allocated_cost_per_kg(
    source: CostSource,
    svaso: &SvasoAllocationResult,
    minis: &[MiniSvasoResult],
) -> Result<Decimal, CostError> {
    match source {
        CostSource::Joint(code) => svaso
            .allocation(code)
            .map(|allocation| allocation.allocated_cost_per_kg())
            .ok_or_else(|| {
                CostError::InvalidInput(
                    ErrorInfo::new(
                        "missing-joint-allocation",
                        "joint product was not part of the allocation",
                    )
                    .with_context("source", source),
                )
            }),
        CostSource::SubCut(cut) => minis
            .iter()
            .filter(|mini| mini.parent_code() == cut.parent())
            .find_map(|mini| mini.sub_allocation(cut))
            .map(|allocation| allocation.allocated_cost_per_kg())
            .ok_or_else(|| {
                CostError::InvalidInput(
                    ErrorInfo::new(
                        "missing-sub-cut-allocation",
                        "sub-cut has no mini allocation to draw cost from",
                    )
                    .with_context("source", source)
                    .with_hint("add the sub-cut to the parent's sub-cut list"),
                )
            }),
    }
}
