//! Batch scenario documents and the loaders for them.
//!
//! Part codes arrive as plain strings and are only turned into the closed
//! code types by [`BatchScenario`]'s parse helpers. A by-product code in the
//! joint product list is therefore a scope violation raised by the costing
//! rail, not a YAML error.

use std::fs;
use std::path::Path;

use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::{
    CostingConfig, CostingConfigDocument, JointProductCode, PartCode, SchemaVersion, SubCutCode,
};
use pcost_nrv::NrvInput;
use pcost_pool::{ByProductPhysical, LiveBatchInput};
use pcost_sku::{AbcCostDriver, CostSource, SkuDefinition};
use pcost_svaso::{JointProductInput, SubJointCutInput};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::serde::from_yaml_slice;

fn io_error(code: &str, err: impl ToString) -> CostError {
    CostError::Io(ErrorInfo::new(code, err.to_string()))
}

fn one_hundred() -> Decimal {
    Decimal::ONE_HUNDRED
}

/// Joint product line as written in a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioJointProduct {
    /// Code text; must name an allocable joint product.
    pub part_code: String,
    /// Weighed output in kilograms.
    pub weight_kg: Decimal,
    /// Derived market value per kilogram.
    pub shadow_price_per_kg: Decimal,
}

/// Sub-cut line as written in a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSubCut {
    /// Code text; must name a sub-cut of the enclosing parent.
    pub sub_cut_code: String,
    /// Weighed output in kilograms.
    pub weight_kg: Decimal,
    /// Derived market value per kilogram.
    pub shadow_price_per_kg: Decimal,
}

/// Sub-cuts of one joint product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSubCutGroup {
    /// Parent joint product code text.
    pub parent: String,
    /// Named sub-cuts in allocation order.
    pub cuts: Vec<ScenarioSubCut>,
}

/// SKU line as written in a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSku {
    /// SKU identifier.
    pub sku_code: String,
    /// Joint product or sub-cut code the SKU is made from.
    pub source: String,
    /// Finished output in kilograms.
    pub output_kg: Decimal,
    /// Meat share of the finished weight, in percent.
    #[serde(default = "one_hundred")]
    pub meat_content_pct: Decimal,
    /// Packaging cost per finished kilogram.
    #[serde(default)]
    pub packaging_cost_per_kg: Decimal,
    /// Giveaway cost per finished kilogram.
    #[serde(default)]
    pub giveaway_cost_per_kg: Decimal,
}

/// Every input of one Level 0 to 7 run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchScenario {
    /// Schema of the scenario document.
    #[serde(default)]
    pub schema_version: SchemaVersion,
    /// Live batch as delivered.
    pub batch: LiveBatchInput,
    /// Griller (eviscerated carcass) weight.
    pub griller_weight_kg: Decimal,
    /// Explicit slaughter cost; derived from the per-head fee when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slaughter_cost_eur: Option<Decimal>,
    /// By-products credited at the flat rate.
    #[serde(default)]
    pub by_products: Vec<ByProductPhysical>,
    /// Joint products in allocation order.
    pub joint_products: Vec<ScenarioJointProduct>,
    /// Optional sub-cut allocations.
    #[serde(default)]
    pub sub_cuts: Vec<ScenarioSubCutGroup>,
    /// Activity-based cost drivers.
    #[serde(default)]
    pub abc_drivers: Vec<AbcCostDriver>,
    /// Finished products.
    #[serde(default)]
    pub skus: Vec<ScenarioSku>,
    /// Market data for the NRV test, keyed by SKU code.
    #[serde(default)]
    pub nrv: Vec<NrvInput>,
}

impl BatchScenario {
    /// Parses the joint product lines into allocation inputs.
    pub fn joint_product_inputs(&self) -> Result<Vec<JointProductInput>, CostError> {
        self.joint_products
            .iter()
            .map(|line| {
                JointProductInput::parse(&line.part_code, line.weight_kg, line.shadow_price_per_kg)
            })
            .collect()
    }

    /// Parses one sub-cut group into its parent code and cut inputs.
    pub fn sub_cut_inputs(
        group: &ScenarioSubCutGroup,
    ) -> Result<(JointProductCode, Vec<SubJointCutInput>), CostError> {
        let parent: JointProductCode = group.parent.parse()?;
        let cuts = group
            .cuts
            .iter()
            .map(|cut| -> Result<SubJointCutInput, CostError> {
                Ok(SubJointCutInput {
                    sub_cut_code: cut.sub_cut_code.parse::<SubCutCode>()?,
                    weight_kg: cut.weight_kg,
                    shadow_price_per_kg: cut.shadow_price_per_kg,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((parent, cuts))
    }

    /// Parses the SKU lines into SKU definitions.
    pub fn sku_definitions(&self) -> Result<Vec<SkuDefinition>, CostError> {
        self.skus
            .iter()
            .map(|line| -> Result<SkuDefinition, CostError> {
                Ok(SkuDefinition {
                    sku_code: line.sku_code.clone(),
                    source: parse_cost_source(&line.source)
                        .map_err(|err| err.with_context("sku_code", &line.sku_code))?,
                    output_kg: line.output_kg,
                    meat_content_pct: line.meat_content_pct,
                    packaging_cost_per_kg: line.packaging_cost_per_kg,
                    giveaway_cost_per_kg: line.giveaway_cost_per_kg,
                })
            })
            .collect()
    }
}

/// Turns code text into the allocation a SKU may draw from.
pub fn parse_cost_source(text: &str) -> Result<CostSource, CostError> {
    match text.parse::<PartCode>()? {
        PartCode::Joint(code) => Ok(CostSource::Joint(code)),
        PartCode::SubCut(cut) => Ok(CostSource::SubCut(cut)),
        PartCode::ByProduct(kind) => Err(CostError::ScopeViolation(
            ErrorInfo::new(
                "by-product-sku-source",
                "a SKU cannot draw cost from a by-product",
            )
            .with_context("source", kind),
        )),
    }
}

/// Reads a batch scenario from a YAML file.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<BatchScenario, CostError> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|err| io_error("scenario_read", err).with_context("path", path.display()))?;
    from_yaml_slice(&bytes).map_err(|err| err.with_context("path", path.display()))
}

/// Reads a costing configuration from YAML, or returns the defaults when no
/// path is given.
pub fn load_costing_config(path: Option<&Path>) -> Result<CostingConfig, CostError> {
    let Some(path) = path else {
        return Ok(CostingConfig::default());
    };
    let bytes = fs::read(path)
        .map_err(|err| io_error("config_read", err).with_context("path", path.display()))?;
    let document: CostingConfigDocument =
        from_yaml_slice(&bytes).map_err(|err| err.with_context("path", path.display()))?;
    CostingConfig::try_from(document).map_err(|err| err.with_context("path", path.display()))
}
