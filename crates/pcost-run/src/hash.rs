//! Content hashes that tie a report to the scenario and configuration it was
//! computed from.
//!
//! Every hash is taken over canonical JSON, so a scenario file whose keys were
//! reordered by hand still hashes the same. Decimals serialize as strings and
//! keep their scale: `1.5` and `1.50` are different inputs.

use std::collections::BTreeMap;

use pcost_core::errors::CostError;
use pcost_core::{CostingConfig, RunProvenance};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::scenario::BatchScenario;
use crate::serde::to_canonical_json_bytes;

/// Hex SHA-256 of a costing document.
pub fn content_hash<T: Serialize>(document: &T) -> Result<String, CostError> {
    let canonical = to_canonical_json_bytes(document)?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}

/// Hash of a scenario and the configuration it is costed under, taken as one
/// input. Changing either changes the hash.
pub fn input_hash(scenario: &BatchScenario, config: &CostingConfig) -> Result<String, CostError> {
    content_hash(&(scenario, config))
}

/// Separate scenario and config hashes plus the versions of the tools that
/// produced the run.
pub fn run_provenance(
    scenario: &BatchScenario,
    config: &CostingConfig,
    tool_versions: BTreeMap<String, String>,
) -> Result<RunProvenance, CostError> {
    Ok(RunProvenance {
        scenario_hash: content_hash(scenario)?,
        config_hash: content_hash(config)?,
        tool_versions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_does_not_change_the_hash() {
        let written: serde_json::Value =
            serde_json::from_str(r#"{"batch_id":"B-7","live_weight_kg":"10000"}"#).unwrap();
        let reordered: serde_json::Value =
            serde_json::from_str(r#"{"live_weight_kg":"10000","batch_id":"B-7"}"#).unwrap();
        let hash = content_hash(&written).unwrap();
        assert_eq!(hash, content_hash(&reordered).unwrap());
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn decimal_scale_is_part_of_the_content() {
        let a = content_hash(&serde_json::json!({"price": "1.5"})).unwrap();
        let b = content_hash(&serde_json::json!({"price": "1.50"})).unwrap();
        assert_ne!(a, b);
    }
}
