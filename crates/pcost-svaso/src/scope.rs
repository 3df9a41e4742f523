use std::collections::BTreeSet;
use std::fmt::Display;

use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::{CostingConfig, JointProductCode, SubCutCode};

/// Fails with a scope violation unless `code` is allocable under `config`.
///
/// The enum already excludes by-products and sub-cuts; this rail covers a
/// configuration that narrows the allocable set further.
pub fn ensure_allocable(code: JointProductCode, config: &CostingConfig) -> Result<(), CostError> {
    if config.is_allocable(code) {
        return Ok(());
    }
    let allowed: Vec<&str> = config.allocable_codes().iter().map(|c| c.as_str()).collect();
    Err(CostError::ScopeViolation(
        ErrorInfo::new(
            "outside-configured-scope",
            "joint product is not in the configured allocable set",
        )
        .with_context("part_code", code)
        .with_context("allocable", allowed.join(",")),
    ))
}

/// Fails with a scope violation unless `cut` is carved from `parent`.
pub fn ensure_sub_cut_of(parent: JointProductCode, cut: SubCutCode) -> Result<(), CostError> {
    if cut.parent() == parent {
        return Ok(());
    }
    Err(CostError::ScopeViolation(
        ErrorInfo::new("foreign-sub-cut", "sub-cut does not belong to this joint product")
            .with_context("sub_cut", cut)
            .with_context("expected_parent", parent)
            .with_context("actual_parent", cut.parent()),
    ))
}

/// Fails with invalid input when a code appears twice.
pub fn ensure_unique<K: Ord + Display>(codes: impl IntoIterator<Item = K>) -> Result<(), CostError> {
    let mut seen = BTreeSet::new();
    for code in codes {
        if seen.contains(&code) {
            return Err(CostError::InvalidInput(
                ErrorInfo::new("duplicate-code", "each code may appear once per allocation")
                    .with_context("code", &code),
            ));
        }
        seen.insert(code);
    }
    Ok(())
}
