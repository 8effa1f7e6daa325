pub mod buckets;
pub mod portfolio;
pub mod schedule;

use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

use tenorgap_core::portfolio::LoanRecord;
use tenorgap_core::{Loan, ValueKind};

use crate::input;

/// Loan fields shared by the single-loan subcommands.
#[derive(Args)]
pub struct LoanArgs {
    /// Path to a JSON loan record (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Account identifier
    #[arg(long, default_value = "CLI-LOAN")]
    pub account_id: String,

    /// Reporting (as-of) date, YYYY-MM-DD
    #[arg(long)]
    pub reporting_date: Option<NaiveDate>,

    /// Contract start date, YYYY-MM-DD (defaults to the reporting date)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Maturity date, YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Outstanding principal
    #[arg(long)]
    pub outstanding: Option<Decimal>,

    /// Annual nominal rate as a decimal fraction (0.12 = 12%)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Installment flag: yes | no
    #[arg(long, default_value = "no")]
    pub installment: String,

    /// Repayment method: annuity | flat
    #[arg(long, default_value = "annuity")]
    pub method: String,

    /// Currency code
    #[arg(long, default_value = "IDR")]
    pub currency: String,
}

impl LoanArgs {
    /// Resolve the loan from JSON file, piped stdin, or individual flags.
    pub fn to_loan(&self) -> Result<Loan, Box<dyn std::error::Error>> {
        let record: LoanRecord = if let Some(ref path) = self.input {
            input::file::read_json(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            serde_json::from_value(data)?
        } else {
            let reporting_date = self
                .reporting_date
                .ok_or("--reporting-date is required (or provide --input)")?;
            LoanRecord {
                reporting_date,
                account_id: self.account_id.clone(),
                currency: Some(self.currency.clone()),
                outstanding: self
                    .outstanding
                    .ok_or("--outstanding is required (or provide --input)")?,
                interest_rate: self
                    .interest_rate
                    .ok_or("--interest-rate is required (or provide --input)")?,
                start_date: self.start_date.unwrap_or(reporting_date),
                end_date: self
                    .end_date
                    .ok_or("--end-date is required (or provide --input)")?,
                installment: Some(self.installment.clone()),
                method: Some(self.method.clone()),
                product_type: None,
                segment: None,
                region: None,
                postal_code: None,
                insured: None,
                transactional: None,
            }
        };

        Ok(Loan::try_from(record)?)
    }
}

/// Value-mode selector shared by the bucket subcommands.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ValueMode {
    Principal,
    Interest,
    Total,
}

impl From<ValueMode> for ValueKind {
    fn from(v: ValueMode) -> Self {
        match v {
            ValueMode::Principal => ValueKind::Principal,
            ValueMode::Interest => ValueKind::Interest,
            ValueMode::Total => ValueKind::Total,
        }
    }
}
