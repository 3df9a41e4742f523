use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use pcost_run::{load_costing_config, load_scenario, run_pipeline, write_report};
use tracing::{error, info};

use crate::export::{write_manifest, write_nrv_csv, write_sku_csv};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// YAML batch scenario holding every level's inputs.
    #[arg(long)]
    pub scenario: PathBuf,
    /// Optional YAML costing configuration; defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output directory for run artefacts.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let scenario = load_scenario(&args.scenario)?;
    let config = load_costing_config(args.config.as_deref())?;

    let report = match run_pipeline(&scenario, &config) {
        Ok(report) => report,
        Err(err) => {
            error!(
                cost_level = err.level().unwrap_or("-"),
                code = %err.info().code,
                defect = err.is_defect(),
                "costing failed"
            );
            return Err(err.into());
        }
    };

    fs::create_dir_all(&args.out)?;
    let report_path = args.out.join("report.json");
    write_report(&report, &report_path)?;
    let sku_path = args.out.join("sku_costs.csv");
    write_sku_csv(&report, &sku_path)?;
    let nrv_path = args.out.join("nrv.csv");
    write_nrv_csv(&report, &nrv_path)?;
    write_manifest(
        &report,
        &args.out,
        &["report.json", "sku_costs.csv", "nrv.csv"],
    )?;

    info!(out = %args.out.display(), report_hash = %report.report_hash, "artefacts written");
    println!("{}", report.report_hash);
    Ok(())
}
