//! Read-only diagnostics over the clinic document store.

use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use clinic_seed_cli::{render, startup};
use clinic_seed_core::{Inspector, SeedClock};

#[derive(Parser)]
#[command(name = "clinic-inspect", version)]
#[command(about = "Inspect what seed runs wrote to the clinic document store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Document count per collection (default)
    Counts,
    /// List documents in a collection
    List {
        /// Collection name (e.g. patients, invoices)
        collection: String,
        /// Maximum documents to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// List staff profiles
    Staff,
    /// A doctor's appointments for one day
    Today {
        /// Doctor's login email
        #[arg(long)]
        doctor: String,
        /// Day to show (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Check references and invoice invariants
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn run(command: Commands) -> anyhow::Result<ExitCode> {
    let env = startup()?;
    let store = env.open_store()?;
    let inspector = Inspector::new(store.as_ref());

    match command {
        Commands::Counts => {
            let counts = inspector.collection_counts().context("counting documents")?;
            print!("{}", render::counts_table(&counts));
        }
        Commands::List { collection, limit } => {
            let docs = inspector
                .list_documents(&collection, limit)
                .with_context(|| format!("listing {}", collection))?;
            print!("{}", render::documents(&docs));
        }
        Commands::Staff => {
            let staff = inspector.list_staff().context("listing staff")?;
            print!("{}", render::staff_table(&staff));
        }
        Commands::Today { doctor, date } => {
            let date = date.unwrap_or_else(|| SeedClock::system().today());
            match inspector
                .appointments_on(&doctor, date)
                .context("loading appointments")?
            {
                Some(day) => print!("{}", render::doctor_day(&day)),
                None => {
                    eprintln!("No staff profile for {}", doctor);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Check { json } => {
            let report = inspector.check_integrity().context("checking integrity")?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", render::integrity(&report));
            }
            if !report.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command.unwrap_or(Commands::Counts)) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
