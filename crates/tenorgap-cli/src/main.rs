mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::buckets::BucketsArgs;
use commands::portfolio::{GapRowArgs, PortfolioArgs};
use commands::schedule::ScheduleArgs;

/// Loan amortization and regulatory maturity-gap bucketing
#[derive(Parser)]
#[command(
    name = "tenorgap",
    version,
    about = "Loan amortization schedules and maturity-gap bucketing (IRRBB, LCR, NSFR)",
    long_about = "Generates monthly amortization schedules for loan positions and \
                  buckets their cash flows into the IRRBB, LCR, and NSFR maturity-gap \
                  taxonomies, per loan or for a whole portfolio CSV. All monetary math \
                  uses decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the monthly amortization schedule for a single loan
    Schedule(ScheduleArgs),
    /// Bucket a single loan's cash flows into a maturity-gap taxonomy
    Buckets(BucketsArgs),
    /// Produce a single loan's flattened export row (LCR + NSFR + IRRBB columns)
    GapRow(GapRowArgs),
    /// Process a loan portfolio CSV into principal and interest gap tables
    Portfolio(PortfolioArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Buckets(args) => commands::buckets::run_buckets(args),
        Commands::GapRow(args) => commands::portfolio::run_gap_row(args),
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::Version => {
            println!("tenorgap {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
