//! Structured error types shared across the costing crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::CostLevel;

/// Structured payload attached to every [`CostError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (part codes, amounts, levels).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the costing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum CostError {
    /// Negative or zero quantities where positive values are required, or an
    /// allocation step with no market value to allocate by.
    #[error("invalid input: {0}")]
    InvalidInput(ErrorInfo),
    /// A part code outside the closed allocable set reached an allocation step.
    #[error("scope violation: {0}")]
    ScopeViolation(ErrorInfo),
    /// An allocation broke its sum-equals-total invariant. Indicates a defect
    /// in the allocation code, not in the caller's input.
    #[error("reconciliation failure: {0}")]
    ReconciliationFailure(ErrorInfo),
    /// Costing configuration could not be validated.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Filesystem errors raised by the orchestration and CLI layers.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl CostError {
    /// Shorthand for an [`CostError::InvalidInput`] with no context.
    pub fn invalid_input(code: &str, message: impl Into<String>) -> Self {
        CostError::InvalidInput(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`CostError::ScopeViolation`] with no context.
    pub fn scope_violation(code: &str, message: impl Into<String>) -> Self {
        CostError::ScopeViolation(ErrorInfo::new(code, message))
    }

    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            CostError::InvalidInput(info)
            | CostError::ScopeViolation(info)
            | CostError::ReconciliationFailure(info)
            | CostError::Config(info)
            | CostError::Serde(info)
            | CostError::Io(info) => info,
        }
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            CostError::InvalidInput(info)
            | CostError::ScopeViolation(info)
            | CostError::ReconciliationFailure(info)
            | CostError::Config(info)
            | CostError::Serde(info)
            | CostError::Io(info) => info,
        }
    }

    /// Adds a context entry to the payload of any variant.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.info_mut()
            .context
            .insert(key.into(), value.to_string());
        self
    }

    /// Tags the error with the costing level that raised it.
    pub fn at_level(self, level: CostLevel) -> Self {
        self.with_context("level", level.tag())
    }

    /// Returns the level tag recorded by [`CostError::at_level`], if any.
    pub fn level(&self) -> Option<&str> {
        self.info().context.get("level").map(String::as_str)
    }

    /// True for failures that indicate a bug in the engine rather than bad input.
    pub fn is_defect(&self) -> bool {
        matches!(self, CostError::ReconciliationFailure(_))
    }
}
