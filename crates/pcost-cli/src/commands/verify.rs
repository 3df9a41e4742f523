use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use pcost_run::load_report;
use tracing::info;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Report written by `pcost run`.
    #[arg(long)]
    pub report: PathBuf,
}

pub fn run(args: &VerifyArgs) -> Result<(), Box<dyn Error>> {
    let report = load_report(&args.report)?;
    report.verify()?;
    info!(batch_id = %report.batch_id, report_hash = %report.report_hash, "report verified");
    println!("report verified successfully");
    Ok(())
}
