//! Report files and hashes use canonical JSON: object keys sorted at every
//! depth, array order kept. Scenario files are YAML.

use pcost_core::errors::{CostError, ErrorInfo};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

fn serde_error(code: &str, err: impl ToString) -> CostError {
    CostError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            for (_, nested) in &mut entries {
                sort_keys(nested);
            }
            map.extend(entries);
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

fn canonical_value<T: Serialize>(value: &T) -> Result<Value, CostError> {
    let mut value = serde_json::to_value(value).map_err(|err| serde_error("json_serialize", err))?;
    sort_keys(&mut value);
    Ok(value)
}

/// Compact canonical JSON; the byte stream every content hash is taken over.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CostError> {
    serde_json::to_vec(&canonical_value(value)?).map_err(|err| serde_error("json_write", err))
}

/// Indented canonical JSON, as written to report files.
pub fn to_canonical_json_pretty<T: Serialize>(value: &T) -> Result<String, CostError> {
    serde_json::to_string_pretty(&canonical_value(value)?)
        .map_err(|err| serde_error("json_write", err))
}

/// Reads a report or other JSON document.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, CostError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json_deserialize", err))
}

/// Reads a scenario or costing configuration file.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, CostError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml_deserialize", err))
}
