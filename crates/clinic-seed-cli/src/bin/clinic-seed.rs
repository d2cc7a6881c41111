//! Run one seed pass against the configured document store.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use clinic_seed_cli::{render, startup};
use clinic_seed_core::run_seed;

#[derive(Parser)]
#[command(name = "clinic-seed", version)]
#[command(about = "Populate the clinic document store with demo data")]
struct Cli {}

fn run() -> anyhow::Result<ExitCode> {
    let env = startup()?;
    let store = env.open_store()?;

    let report = run_seed(store.as_ref(), &env.seed).context("seed run aborted")?;
    print!("{}", render::seed_summary(&report));

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    let _cli = Cli::parse();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
