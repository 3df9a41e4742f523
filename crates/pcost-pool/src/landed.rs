use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::money::{ensure_non_negative, ensure_positive, per_kg, round_money, round_per_kg};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn landed_error(code: &str, message: impl Into<String>) -> CostError {
    CostError::InvalidInput(ErrorInfo::new(code, message.into()))
}

/// Purchase data for one live batch as delivered to the plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveBatchInput {
    /// Batch identifier used in reports.
    pub batch_id: String,
    /// Weighed live weight in kilograms.
    pub live_weight_kg: Decimal,
    /// Number of birds delivered, dead-on-arrival included.
    pub bird_count: u32,
    /// Contract price per live kilogram.
    pub live_price_per_kg: Decimal,
    /// Transport cost for the delivery.
    #[serde(default)]
    pub transport_cost_eur: Decimal,
    /// Catching crew fee.
    #[serde(default)]
    pub catching_fee_eur: Decimal,
    /// Slaughter fee charged per bird processed.
    #[serde(default)]
    pub slaughter_fee_per_head_eur: Decimal,
    /// Birds found dead on arrival.
    #[serde(default)]
    pub doa_count: u32,
    /// Normal DOA rate in percent; anything above it is abnormal.
    #[serde(default)]
    pub doa_threshold_pct: Decimal,
}

impl LiveBatchInput {
    fn validate(&self) -> Result<(), CostError> {
        ensure_positive("live_weight_kg", self.live_weight_kg)?;
        ensure_non_negative("live_price_per_kg", self.live_price_per_kg)?;
        ensure_non_negative("transport_cost_eur", self.transport_cost_eur)?;
        ensure_non_negative("catching_fee_eur", self.catching_fee_eur)?;
        ensure_non_negative("slaughter_fee_per_head_eur", self.slaughter_fee_per_head_eur)?;
        ensure_non_negative("doa_threshold_pct", self.doa_threshold_pct)?;
        if self.bird_count == 0 {
            return Err(landed_error("zero-bird-count", "a batch must contain at least one bird"));
        }
        if self.doa_count > self.bird_count {
            return Err(CostError::InvalidInput(
                ErrorInfo::new("doa-exceeds-birds", "more DOA birds than birds delivered")
                    .with_context("doa_count", self.doa_count)
                    .with_context("bird_count", self.bird_count),
            ));
        }
        if self.doa_threshold_pct > Decimal::ONE_HUNDRED {
            return Err(landed_error(
                "doa-threshold-range",
                "doa_threshold_pct is a percentage and must not exceed 100",
            ));
        }
        Ok(())
    }
}

/// Level 0 output.
///
/// The abnormal DOA variance is a memo figure. Its cost stays inside
/// `landed_cost_eur` and reaches the joint pool through the per-kilogram rate
/// over `usable_live_kg`; it is never added to or taken out of the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostResult {
    batch_id: String,
    landed_cost_eur: Decimal,
    landed_cost_per_kg: Decimal,
    live_weight_kg: Decimal,
    usable_live_kg: Decimal,
    doa_pct: Decimal,
    abnormal_doa_kg: Decimal,
    abnormal_doa_variance_eur: Decimal,
}

impl LandedCostResult {
    /// Batch identifier.
    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    /// Live weight × price plus transport and catching.
    pub fn landed_cost_eur(&self) -> Decimal {
        self.landed_cost_eur
    }

    /// Landed cost spread over the usable live weight.
    pub fn landed_cost_per_kg(&self) -> Decimal {
        self.landed_cost_per_kg
    }

    /// Weighed live weight.
    pub fn live_weight_kg(&self) -> Decimal {
        self.live_weight_kg
    }

    /// Live weight net of abnormal DOA losses.
    pub fn usable_live_kg(&self) -> Decimal {
        self.usable_live_kg
    }

    /// Observed DOA rate in percent.
    pub fn doa_pct(&self) -> Decimal {
        self.doa_pct
    }

    /// Live kilograms lost to DOA above the threshold.
    pub fn abnormal_doa_kg(&self) -> Decimal {
        self.abnormal_doa_kg
    }

    /// Purchase value of the abnormal DOA loss; zero within the threshold.
    ///
    /// Reported for variance analysis only. The amount is already part of
    /// [`landed_cost_eur`](Self::landed_cost_eur).
    pub fn abnormal_doa_variance_eur(&self) -> Decimal {
        self.abnormal_doa_variance_eur
    }
}

/// Computes the Level 0 landed cost of a live batch.
pub fn compute_landed_cost(input: &LiveBatchInput) -> Result<LandedCostResult, CostError> {
    input.validate()?;

    let birds = Decimal::from(input.bird_count);
    let doa = Decimal::from(input.doa_count);
    let landed_cost_eur = round_money(
        input.live_weight_kg * input.live_price_per_kg
            + input.transport_cost_eur
            + input.catching_fee_eur,
    );

    let doa_pct = doa * Decimal::ONE_HUNDRED / birds;
    let (abnormal_doa_kg, abnormal_doa_variance_eur) = if doa_pct > input.doa_threshold_pct {
        let allowed = birds * input.doa_threshold_pct / Decimal::ONE_HUNDRED;
        let excess_birds = doa - allowed;
        let kg_per_bird = input.live_weight_kg / birds;
        let kg = excess_birds * kg_per_bird;
        (kg, round_money(kg * input.live_price_per_kg))
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };
    let usable_live_kg = input.live_weight_kg - abnormal_doa_kg;

    Ok(LandedCostResult {
        batch_id: input.batch_id.clone(),
        landed_cost_eur,
        landed_cost_per_kg: round_per_kg(per_kg(landed_cost_eur, usable_live_kg)),
        live_weight_kg: input.live_weight_kg,
        usable_live_kg: round_per_kg(usable_live_kg),
        doa_pct: round_per_kg(doa_pct),
        abnormal_doa_kg: round_per_kg(abnormal_doa_kg),
        abnormal_doa_variance_eur,
    })
}

/// Slaughter fee for the birds actually processed (DOA birds are not slaughtered).
pub fn slaughter_cost_eur(input: &LiveBatchInput) -> Decimal {
    let processed = input.bird_count.saturating_sub(input.doa_count);
    round_money(input.slaughter_fee_per_head_eur * Decimal::from(processed))
}
