use clap::Args;
use serde_json::Value;

use tenorgap_core::schedule;

use crate::commands::LoanArgs;

/// Arguments for the single-loan amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.loan.to_loan()?;
    let output = schedule::loan_schedule(&loan)?;
    Ok(serde_json::to_value(output)?)
}
