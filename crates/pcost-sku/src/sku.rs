use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::money::{ensure_non_negative, ensure_positive, per_kg, round_money, round_per_kg};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::absorption::AbcAbsorption;
use crate::source::CostSource;

fn full_meat_content() -> Decimal {
    Decimal::ONE_HUNDRED
}

/// A finished product and the inputs that turn meat into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuDefinition {
    /// SKU identifier, unique within a batch.
    pub sku_code: String,
    /// Allocation the meat cost is taken from.
    pub source: CostSource,
    /// Finished output in kilograms.
    pub output_kg: Decimal,
    /// Share of the finished weight that is meat, in percent.
    #[serde(default = "full_meat_content")]
    pub meat_content_pct: Decimal,
    /// Packaging cost per finished kilogram.
    #[serde(default)]
    pub packaging_cost_per_kg: Decimal,
    /// Giveaway (overfill) cost per finished kilogram.
    #[serde(default)]
    pub giveaway_cost_per_kg: Decimal,
}

/// Level 6 output for one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullSkuCostResult {
    sku_code: String,
    source: CostSource,
    output_kg: Decimal,
    allocated_cost_per_kg: Decimal,
    meat_cost_per_kg: Decimal,
    abc_cost_eur: Decimal,
    abc_cost_per_kg: Decimal,
    packaging_cost_per_kg: Decimal,
    giveaway_cost_per_kg: Decimal,
    cost_per_kg: Decimal,
    total_cost_eur: Decimal,
}

impl FullSkuCostResult {
    /// SKU identifier.
    pub fn sku_code(&self) -> &str {
        &self.sku_code
    }

    /// Allocation the meat cost came from.
    pub fn source(&self) -> CostSource {
        self.source
    }

    /// Finished output.
    pub fn output_kg(&self) -> Decimal {
        self.output_kg
    }

    /// Allocated cost per kilogram of the source.
    pub fn allocated_cost_per_kg(&self) -> Decimal {
        self.allocated_cost_per_kg
    }

    /// Allocated cost scaled by meat content.
    pub fn meat_cost_per_kg(&self) -> Decimal {
        self.meat_cost_per_kg
    }

    /// Activity cost carried by this SKU, direct and passed down from parts.
    pub fn abc_cost_eur(&self) -> Decimal {
        self.abc_cost_eur
    }

    /// Activity cost charged to this SKU per finished kilogram.
    pub fn abc_cost_per_kg(&self) -> Decimal {
        self.abc_cost_per_kg
    }

    /// Packaging per kilogram.
    pub fn packaging_cost_per_kg(&self) -> Decimal {
        self.packaging_cost_per_kg
    }

    /// Giveaway per kilogram.
    pub fn giveaway_cost_per_kg(&self) -> Decimal {
        self.giveaway_cost_per_kg
    }

    /// Full cost per finished kilogram.
    pub fn cost_per_kg(&self) -> Decimal {
        self.cost_per_kg
    }

    /// Full cost of the output.
    pub fn total_cost_eur(&self) -> Decimal {
        self.total_cost_eur
    }
}

/// Adds meat, activity, packaging and giveaway cost into one cost per kg.
///
/// `allocated_cost_per_kg` is taken by value from Level 3 or 4. No upstream
/// figure is redistributed. Activity cost comes from
/// [`absorb_abc_costs`](crate::absorption::absorb_abc_costs), which already
/// holds the part-level charges passed down to this SKU.
pub fn compute_full_sku_cost(
    sku: &SkuDefinition,
    allocated_cost_per_kg: Decimal,
    abc: &AbcAbsorption,
) -> Result<FullSkuCostResult, CostError> {
    let tag = |err: CostError| err.with_context("sku_code", &sku.sku_code);
    ensure_positive("output_kg", sku.output_kg).map_err(tag)?;
    ensure_non_negative("packaging_cost_per_kg", sku.packaging_cost_per_kg).map_err(tag)?;
    ensure_non_negative("giveaway_cost_per_kg", sku.giveaway_cost_per_kg).map_err(tag)?;
    if sku.meat_content_pct <= Decimal::ZERO || sku.meat_content_pct > Decimal::ONE_HUNDRED {
        return Err(CostError::InvalidInput(
            ErrorInfo::new(
                "meat-content-range",
                "meat content must be above 0 and at most 100 percent",
            )
            .with_context("sku_code", &sku.sku_code)
            .with_context("meat_content_pct", sku.meat_content_pct),
        ));
    }

    let meat_cost_per_kg =
        round_per_kg(allocated_cost_per_kg * sku.meat_content_pct / Decimal::ONE_HUNDRED);
    let abc_cost_eur = abc.charged_to(&sku.sku_code);
    let abc_cost_per_kg = round_per_kg(per_kg(abc_cost_eur, sku.output_kg));
    let cost_per_kg = round_per_kg(
        meat_cost_per_kg + abc_cost_per_kg + sku.packaging_cost_per_kg + sku.giveaway_cost_per_kg,
    );

    Ok(FullSkuCostResult {
        sku_code: sku.sku_code.clone(),
        source: sku.source,
        output_kg: sku.output_kg,
        allocated_cost_per_kg,
        meat_cost_per_kg,
        abc_cost_eur,
        abc_cost_per_kg,
        packaging_cost_per_kg: sku.packaging_cost_per_kg,
        giveaway_cost_per_kg: sku.giveaway_cost_per_kg,
        cost_per_kg,
        total_cost_eur: round_money(cost_per_kg * sku.output_kg),
    })
}
