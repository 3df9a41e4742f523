//! Flat artefacts written next to the canonical report.

use std::error::Error;
use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use pcost_run::PipelineReport;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Serialize)]
struct SkuCostRow<'a> {
    sku_code: &'a str,
    source: String,
    output_kg: Decimal,
    allocated_cost_per_kg: Decimal,
    meat_cost_per_kg: Decimal,
    abc_cost_per_kg: Decimal,
    packaging_cost_per_kg: Decimal,
    giveaway_cost_per_kg: Decimal,
    cost_per_kg: Decimal,
    total_cost_eur: Decimal,
}

#[derive(Debug, Serialize)]
struct NrvRow<'a> {
    sku_code: &'a str,
    cost_per_kg: Decimal,
    nrv_per_kg: Decimal,
    nrv_exceeds_cost: bool,
    writedown_required: bool,
    writedown_amount_per_kg: Decimal,
    writedown_total_eur: Option<Decimal>,
}

/// Hash entry for one artefact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestArtifact {
    pub path: String,
    pub sha256: String,
}

/// Index of a run directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub batch_id: String,
    pub report_hash: String,
    pub generated_at: String,
    pub artifacts: Vec<ManifestArtifact>,
}

pub fn write_sku_csv(report: &PipelineReport, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    for sku in &report.skus {
        writer.serialize(SkuCostRow {
            sku_code: sku.sku_code(),
            source: sku.source().to_string(),
            output_kg: sku.output_kg(),
            allocated_cost_per_kg: sku.allocated_cost_per_kg(),
            meat_cost_per_kg: sku.meat_cost_per_kg(),
            abc_cost_per_kg: sku.abc_cost_per_kg(),
            packaging_cost_per_kg: sku.packaging_cost_per_kg(),
            giveaway_cost_per_kg: sku.giveaway_cost_per_kg(),
            cost_per_kg: sku.cost_per_kg(),
            total_cost_eur: sku.total_cost_eur(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_nrv_csv(report: &PipelineReport, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    for assessment in &report.nrv {
        writer.serialize(NrvRow {
            sku_code: assessment.sku_code(),
            cost_per_kg: assessment.cost_per_kg(),
            nrv_per_kg: assessment.nrv_per_kg(),
            nrv_exceeds_cost: assessment.nrv_exceeds_cost(),
            writedown_required: assessment.writedown_required(),
            writedown_amount_per_kg: assessment.writedown_amount_per_kg(),
            writedown_total_eur: assessment.writedown_total_eur(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Hashes each named file under `dir` and writes `manifest.json` beside them.
pub fn write_manifest(
    report: &PipelineReport,
    dir: &Path,
    files: &[&str],
) -> Result<RunManifest, Box<dyn Error>> {
    let mut artifacts = Vec::with_capacity(files.len());
    for name in files {
        let bytes = fs::read(dir.join(name))?;
        artifacts.push(ManifestArtifact {
            path: (*name).to_string(),
            sha256: hex::encode(Sha256::digest(&bytes)),
        });
    }
    let manifest = RunManifest {
        batch_id: report.batch_id.clone(),
        report_hash: report.report_hash.clone(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        artifacts,
    };
    fs::write(
        dir.join("manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;
    Ok(manifest)
}
