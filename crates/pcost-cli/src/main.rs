use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    run::{self, RunArgs},
    verify::{self, VerifyArgs},
    version::{self, VersionArgs},
};

mod commands;
mod export;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "pcost", about = "Poultry batch cost accounting from live bird to NRV")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cost a batch scenario through every level and write the run artefacts.
    Run(RunArgs),
    /// Check a stored report against its hash and reconciliation invariants.
    Verify(VerifyArgs),
    /// Print the tool version.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init();
    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Verify(args) => verify::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
