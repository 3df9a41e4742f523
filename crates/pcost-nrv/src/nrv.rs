use pcost_core::errors::CostError;
use pcost_core::money::{ensure_non_negative, round_money, round_per_kg};
use pcost_sku::FullSkuCostResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market side of the NRV test for one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NrvInput {
    /// SKU the prices refer to.
    pub sku_code: String,
    /// Expected selling price per kilogram.
    pub selling_price_per_kg: Decimal,
    /// Cost still to be incurred to make the product saleable.
    #[serde(default)]
    pub completion_cost_per_kg: Decimal,
    /// Cost to sell, e.g. freight and commission.
    #[serde(default)]
    pub selling_cost_per_kg: Decimal,
}

/// Result of comparing NRV with cost. Owns only plain values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NrvAssessment {
    sku_code: String,
    cost_per_kg: Decimal,
    nrv_per_kg: Decimal,
    nrv_exceeds_cost: bool,
    writedown_required: bool,
    writedown_amount_per_kg: Decimal,
    output_kg: Option<Decimal>,
    writedown_total_eur: Option<Decimal>,
}

impl NrvAssessment {
    /// SKU identifier.
    pub fn sku_code(&self) -> &str {
        &self.sku_code
    }

    /// Cost the NRV was compared with.
    pub fn cost_per_kg(&self) -> Decimal {
        self.cost_per_kg
    }

    /// Selling price minus completion and selling cost. May be negative.
    pub fn nrv_per_kg(&self) -> Decimal {
        self.nrv_per_kg
    }

    /// True when NRV is strictly above cost.
    pub fn nrv_exceeds_cost(&self) -> bool {
        self.nrv_exceeds_cost
    }

    /// True whenever NRV does not exceed cost, including equality.
    pub fn writedown_required(&self) -> bool {
        self.writedown_required
    }

    /// Cost minus NRV when a writedown is required, otherwise zero.
    pub fn writedown_amount_per_kg(&self) -> Decimal {
        self.writedown_amount_per_kg
    }

    /// Output the assessment was scaled to, when assessed against a SKU.
    pub fn output_kg(&self) -> Option<Decimal> {
        self.output_kg
    }

    /// Writedown for the whole output, when assessed against a SKU.
    pub fn writedown_total_eur(&self) -> Option<Decimal> {
        self.writedown_total_eur
    }
}

/// Compares the NRV of `input` with `cost_per_kg`.
pub fn assess_nrv(input: &NrvInput, cost_per_kg: Decimal) -> Result<NrvAssessment, CostError> {
    let tag = |err: CostError| err.with_context("sku_code", &input.sku_code);
    ensure_non_negative("selling_price_per_kg", input.selling_price_per_kg).map_err(tag)?;
    ensure_non_negative("completion_cost_per_kg", input.completion_cost_per_kg).map_err(tag)?;
    ensure_non_negative("selling_cost_per_kg", input.selling_cost_per_kg).map_err(tag)?;

    let nrv_per_kg = round_per_kg(
        input.selling_price_per_kg - input.completion_cost_per_kg - input.selling_cost_per_kg,
    );
    let nrv_exceeds_cost = nrv_per_kg > cost_per_kg;
    let writedown_amount_per_kg = if nrv_exceeds_cost {
        Decimal::ZERO
    } else {
        round_per_kg(cost_per_kg - nrv_per_kg)
    };

    Ok(NrvAssessment {
        sku_code: input.sku_code.clone(),
        cost_per_kg,
        nrv_per_kg,
        nrv_exceeds_cost,
        writedown_required: !nrv_exceeds_cost,
        writedown_amount_per_kg,
        output_kg: None,
        writedown_total_eur: None,
    })
}

/// Assesses a costed SKU and scales the writedown to its output.
///
/// Only the cost per kilogram and the output weight are copied out of `sku`.
pub fn assess_sku(input: &NrvInput, sku: &FullSkuCostResult) -> Result<NrvAssessment, CostError> {
    let output_kg = sku.output_kg();
    let mut assessment = assess_nrv(input, sku.cost_per_kg())?;
    assessment.writedown_total_eur =
        Some(round_money(assessment.writedown_amount_per_kg * output_kg));
    assessment.output_kg = Some(output_kg);
    Ok(assessment)
}
