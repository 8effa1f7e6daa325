use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TenorGapError;
use crate::TenorGapResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.12 = 12% annual nominal). Never as percentages.
pub type Rate = Decimal;

/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    IDR,
    USD,
    EUR,
    SGD,
    JPY,
    Other(String),
}

impl Currency {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "" | "IDR" => Currency::IDR,
            "USD" => Currency::USD,
            "EUR" => Currency::EUR,
            "SGD" => Currency::SGD,
            "JPY" => Currency::JPY,
            other => Currency::Other(other.to_string()),
        }
    }
}

/// Whether the loan amortizes in installments or repays principal at maturity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Installment {
    Yes,
    /// Bullet / interest-only structure: principal in one lump sum at maturity.
    No,
}

impl Installment {
    /// Parse the raw flag from an input row. Blank defaults to `No`.
    pub fn parse(raw: &str) -> TenorGapResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "" | "no" => Ok(Installment::No),
            "yes" => Ok(Installment::Yes),
            other => Err(TenorGapError::InvalidInstallmentFlag(other.to_string())),
        }
    }
}

/// Repayment method for installment loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepaymentMethod {
    /// Level payment; principal/interest split shifts over time.
    Annuity,
    /// Constant principal and constant interest on the original principal.
    Flat,
}

impl RepaymentMethod {
    /// Parse the raw method from an input row. Blank defaults to `Annuity`.
    pub fn parse(raw: &str) -> TenorGapResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "" | "annuity" => Ok(RepaymentMethod::Annuity),
            "flat" => Ok(RepaymentMethod::Flat),
            other => Err(TenorGapError::InvalidMethod(other.to_string())),
        }
    }
}

/// Which monetary field of a schedule row is aggregated into buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Principal,
    Interest,
    /// Principal + interest, evaluated per row before aggregation.
    #[default]
    Total,
}

/// A single loan position as of the reporting date. Immutable input record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub reporting_date: NaiveDate,
    pub account_id: String,
    pub currency: Currency,
    /// Outstanding principal as of the reporting date. Must be positive.
    pub outstanding: Money,
    /// Annual nominal rate as a decimal fraction.
    pub interest_rate: Rate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub installment: Installment,
    pub method: RepaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insured: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactional: Option<String>,
}

impl Loan {
    /// Remaining days to maturity relative to the reporting date.
    pub fn tenor_days(&self) -> i64 {
        (self.end_date - self.reporting_date).num_days()
    }

    /// Remaining whole calendar months to maturity. Day-of-month is ignored.
    pub fn tenor_months(&self) -> i32 {
        (self.end_date.year() - self.reporting_date.year()) * 12
            + (self.end_date.month() as i32 - self.reporting_date.month() as i32)
    }
}

/// One period of an amortization schedule. All monetary fields are rounded
/// to 2 decimal places independently; remaining balance is floored at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based sequential period number.
    pub period: u32,
    pub payment_date: NaiveDate,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub remaining_balance: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
