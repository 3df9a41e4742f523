use std::fs;
use std::path::Path;

use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::{CostingConfig, JointProductCode, RunProvenance, SchemaVersion, Tolerances};
use pcost_nrv::NrvAssessment;
use pcost_pool::{JointCostPoolResult, LandedCostResult, NetJointCostResult};
use pcost_sku::{AbcAbsorption, AbcCostResult, FullSkuCostResult};
use pcost_svaso::{verify_reconciliation, MiniSvasoResult, SvasoAllocationResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::hash::content_hash;
use crate::serde::{from_json_slice, to_canonical_json_pretty};

fn io_error(code: &str, err: impl ToString) -> CostError {
    CostError::Io(ErrorInfo::new(code, err.to_string()))
}

/// Reconciliation figures of one mini allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniReconciliation {
    /// Parent joint product.
    pub parent: JointProductCode,
    /// Σ allocation factor.
    pub sum_allocation_factor: Decimal,
    /// Σ named sub-cut cost minus parent cost.
    pub reconciliation_delta_eur: Decimal,
}

/// Reconciliation figures of every allocation in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Σ joint product allocation factor.
    pub svaso_sum_allocation_factor: Decimal,
    /// Σ joint product cost minus net joint cost.
    pub svaso_reconciliation_delta_eur: Decimal,
    /// One entry per mini allocation, in run order.
    pub mini: Vec<MiniReconciliation>,
    /// Σ Level 5 activity cost.
    pub abc_total_eur: Decimal,
    /// Activity cost carried by SKUs.
    pub abc_absorbed_eur: Decimal,
    /// Activity cost charged to targets no SKU is made from.
    pub abc_unabsorbed_eur: Decimal,
    /// True when every delta and factor sum is within tolerance and all
    /// activity cost is accounted for.
    pub balanced: bool,
}

impl ReconciliationSummary {
    /// Summarises the allocations of a run against `tolerances`.
    pub fn from_results(
        svaso: &SvasoAllocationResult,
        minis: &[MiniSvasoResult],
        abc: &AbcCostResult,
        absorption: &AbcAbsorption,
        tolerances: &Tolerances,
    ) -> Self {
        let within = |delta: Decimal, factor_sum: Decimal| {
            delta.abs() <= tolerances.reconciliation_eur
                && (factor_sum - Decimal::ONE).abs() <= tolerances.factor_sum
        };
        let mini: Vec<MiniReconciliation> = minis
            .iter()
            .map(|result| MiniReconciliation {
                parent: result.parent_code(),
                sum_allocation_factor: result.sum_allocation_factor(),
                reconciliation_delta_eur: result.reconciliation_delta_eur(),
            })
            .collect();
        let balanced = within(
            svaso.reconciliation_delta_eur(),
            svaso.sum_allocation_factor(),
        ) && mini
            .iter()
            .all(|entry| within(entry.reconciliation_delta_eur, entry.sum_allocation_factor));
        let abc_total_eur = abc.total_abc_cost_eur();
        let abc_absorbed_eur = absorption.absorbed_eur();
        let abc_unabsorbed_eur = absorption.unabsorbed_eur();
        Self {
            svaso_sum_allocation_factor: svaso.sum_allocation_factor(),
            svaso_reconciliation_delta_eur: svaso.reconciliation_delta_eur(),
            mini,
            abc_total_eur,
            abc_absorbed_eur,
            abc_unabsorbed_eur,
            balanced: balanced && abc_absorbed_eur + abc_unabsorbed_eur == abc_total_eur,
        }
    }
}

/// Canonical record of a full Level 0 to 7 run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Schema of the report document.
    pub schema_version: SchemaVersion,
    /// Batch the report covers.
    pub batch_id: String,
    /// Content hashes of the inputs and the tool versions.
    pub provenance: RunProvenance,
    /// Hash over scenario and configuration together.
    pub input_hash: String,
    /// Configuration the run used.
    pub config: CostingConfig,
    /// Level 0.
    pub landed: LandedCostResult,
    /// Level 1.
    pub pool: JointCostPoolResult,
    /// Level 2.
    pub net: NetJointCostResult,
    /// Level 3.
    pub svaso: SvasoAllocationResult,
    /// Level 4, one entry per split joint product.
    pub mini_svaso: Vec<MiniSvasoResult>,
    /// Level 5.
    pub abc: AbcCostResult,
    /// Level 5 cost as carried into Level 6, per SKU.
    pub abc_absorption: AbcAbsorption,
    /// Level 6, in scenario order.
    pub skus: Vec<FullSkuCostResult>,
    /// Level 7, in scenario order.
    pub nrv: Vec<NrvAssessment>,
    /// Reconciliation figures of Levels 3 and 4.
    pub reconciliation: ReconciliationSummary,
    /// Hash over every field above.
    pub report_hash: String,
}

impl PipelineReport {
    /// Hash of the report with `report_hash` left blank.
    pub fn compute_hash(&self) -> Result<String, CostError> {
        let mut body = self.clone();
        body.report_hash = String::new();
        content_hash(&body)
    }

    /// Stores the hash of the current contents.
    pub fn seal(mut self) -> Result<Self, CostError> {
        self.report_hash = self.compute_hash()?;
        Ok(self)
    }

    /// Re-checks the stored hash and the reconciliation invariants.
    ///
    /// A hash mismatch means the document was edited after the run; a broken
    /// invariant means the allocation itself is wrong.
    pub fn verify(&self) -> Result<(), CostError> {
        let expected = self.compute_hash()?;
        if expected != self.report_hash {
            return Err(CostError::Serde(
                ErrorInfo::new("report-hash-mismatch", "report contents do not match its hash")
                    .with_context("stored", &self.report_hash)
                    .with_context("computed", expected),
            ));
        }

        let tolerances = self.config.tolerances();
        verify_reconciliation(
            self.svaso.net_joint_cost_eur(),
            self.svaso
                .allocations()
                .iter()
                .map(|a| a.allocated_cost_total_eur()),
            self.svaso.allocations().iter().map(|a| a.allocation_factor()),
            tolerances,
        )
        .map_err(|err| err.with_context("allocation", "svaso"))?;
        for mini in &self.mini_svaso {
            verify_reconciliation(
                mini.parent_allocated_cost_eur(),
                mini.sub_allocations()
                    .iter()
                    .map(|a| a.allocated_cost_total_eur()),
                mini.sub_allocations().iter().map(|a| a.allocation_factor()),
                tolerances,
            )
            .map_err(|err| err.with_context("allocation", mini.parent_code()))?;
            if !mini.rest_trim().allocated_cost_eur().is_zero() {
                return Err(CostError::ReconciliationFailure(
                    ErrorInfo::new("rest-trim-carries-cost", "rest/trim must not carry cost")
                        .with_context("parent", mini.parent_code()),
                ));
            }
        }
        let absorbed = self.abc_absorption.absorbed_eur();
        let unabsorbed = self.abc_absorption.unabsorbed_eur();
        if absorbed + unabsorbed != self.abc.total_abc_cost_eur() {
            return Err(CostError::ReconciliationFailure(
                ErrorInfo::new(
                    "abc-absorption-drift",
                    "activity cost carried by SKUs and left unabsorbed does not match Level 5",
                )
                .with_context("total_abc_cost_eur", self.abc.total_abc_cost_eur())
                .with_context("absorbed_eur", absorbed)
                .with_context("unabsorbed_eur", unabsorbed),
            ));
        }
        Ok(())
    }
}

/// Canonical JSON for a report.
pub fn report_to_json(report: &PipelineReport) -> Result<String, CostError> {
    to_canonical_json_pretty(report)
}

/// Parses a report previously written by [`report_to_json`].
pub fn report_from_json(data: &[u8]) -> Result<PipelineReport, CostError> {
    from_json_slice(data)
}

/// Writes the canonical report to `path`.
pub fn write_report(report: &PipelineReport, path: impl AsRef<Path>) -> Result<(), CostError> {
    let json = report_to_json(report)?;
    fs::write(path.as_ref(), json).map_err(|err| io_error("report_write", err))
}

/// Reads a report from `path`.
pub fn load_report(path: impl AsRef<Path>) -> Result<PipelineReport, CostError> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|err| io_error("report_read", err).with_context("path", path.display()))?;
    report_from_json(&bytes)
}
