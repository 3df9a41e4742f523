#![deny(missing_docs)]
#![doc = "Runs the costing levels over a batch scenario and produces canonical, hashed reports."]

/// Content hashes of scenarios, configurations and reports.
pub mod hash;
/// Level 0 to 7 orchestration.
pub mod pipeline;
/// Report document, reconciliation summary and report I/O.
pub mod report;
/// Scenario documents and loaders.
pub mod scenario;
/// Canonical JSON for reports and hashing; YAML for scenario files.
pub mod serde;

pub use hash::{content_hash, input_hash, run_provenance};
pub use pipeline::run_pipeline;
pub use report::{
    load_report, report_from_json, report_to_json, write_report, MiniReconciliation,
    PipelineReport, ReconciliationSummary,
};
pub use scenario::{
    load_costing_config, load_scenario, parse_cost_source, BatchScenario, ScenarioJointProduct,
    ScenarioSku, ScenarioSubCut, ScenarioSubCutGroup,
};
