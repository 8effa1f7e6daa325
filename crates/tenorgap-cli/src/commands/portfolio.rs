use clap::Args;
use serde_json::Value;

use tenorgap_core::portfolio::{self, GapTable, PortfolioInput};

use crate::commands::{LoanArgs, ValueMode};
use crate::input;

/// Arguments for a single loan's flattened export row
#[derive(Args)]
pub struct GapRowArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Which value field to aggregate
    #[arg(long, value_enum, default_value = "principal")]
    pub value: ValueMode,
}

pub fn run_gap_row(args: GapRowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.loan.to_loan()?;
    let row = portfolio::loan_gap_row(&loan, args.value.into())?;
    Ok(serde_json::to_value(row)?)
}

/// Arguments for the portfolio batch run
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to the loan portfolio CSV
    #[arg(long)]
    pub input: String,

    /// Portfolio name used in the report envelope
    #[arg(long, default_value = "portfolio")]
    pub name: String,

    /// Write the principal gap table to this CSV file
    #[arg(long)]
    pub out_principal: Option<String>,

    /// Write the interest gap table to this CSV file
    #[arg(long)]
    pub out_interest: Option<String>,
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loans = input::csv_in::read_loans(&args.input)?;
    let portfolio_input = PortfolioInput {
        portfolio_name: args.name,
        loans,
    };

    let output = portfolio::run_portfolio(&portfolio_input)?;

    if let Some(ref path) = args.out_principal {
        write_gap_table(path, &output.result.principal)?;
    }
    if let Some(ref path) = args.out_interest {
        write_gap_table(path, &output.result.interest)?;
    }

    Ok(serde_json::to_value(output)?)
}

/// Write one gap table as CSV: fixed identity columns, then one column per
/// bucket label (LCR, NSFR, IRRBB order).
fn write_gap_table(path: &str, table: &GapTable) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| format!("Failed to create '{}': {}", path, e))?;

    wtr.write_record(GapTable::headers())?;
    for row in &table.rows {
        let mut record = vec![
            row.account_id.clone(),
            row.remaining_days_to_maturity.to_string(),
        ];
        record.extend(row.buckets.iter().map(|b| b.value.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    Ok(())
}
