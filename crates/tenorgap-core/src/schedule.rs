//! Payment-date generation and amortization schedules.
//!
//! Dates follow a strict monthly cadence anchored to the maturity
//! day-of-month, clamped to month length. Three repayment structures are
//! supported: bullet (interest-only), annuity, and flat. All math uses
//! `rust_decimal::Decimal`.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TenorGapError;
use crate::types::{with_metadata, ComputationOutput, Installment, Loan, Money, RepaymentMethod, ScheduleRow};
use crate::TenorGapResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Amortization schedule for one loan, with portfolio-friendly totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub account_id: String,
    pub periods: u32,
    pub total_principal: Money,
    pub total_interest: Money,
    pub schedule: Vec<ScheduleRow>,
}

// ---------------------------------------------------------------------------
// Date generator
// ---------------------------------------------------------------------------

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Generate the monthly payment-date sequence between the reporting date and
/// maturity.
///
/// The anchor is the maturity day-of-month. Generation starts in the
/// reporting month, or the following month when the reporting day has already
/// reached the anchor. Each emitted day is `min(anchor, month length)`, so an
/// anchor of 31 lands on 28/29 February. The last emitted date never exceeds
/// the maturity date.
///
/// Pure function of its inputs; callers own the empty-schedule guard for
/// `end_date <= reporting_date`.
pub fn payment_dates(reporting_date: NaiveDate, end_date: NaiveDate) -> Vec<NaiveDate> {
    let anchor_day = end_date.day();

    let mut year = reporting_date.year();
    let mut month = reporting_date.month();

    if reporting_date.day() >= anchor_day {
        (year, month) = next_month(year, month);
    }

    let mut dates = Vec::new();

    loop {
        let day = anchor_day.min(days_in_month(year, month));
        let Some(d) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        if d > end_date {
            break;
        }
        dates.push(d);
        (year, month) = next_month(year, month);
    }

    dates
}

// ---------------------------------------------------------------------------
// Schedule engine
// ---------------------------------------------------------------------------

fn validate_loan(loan: &Loan) -> TenorGapResult<()> {
    if loan.outstanding <= Decimal::ZERO {
        return Err(TenorGapError::InvalidInput {
            field: "outstanding".into(),
            reason: "Outstanding principal must be positive".into(),
        });
    }
    if loan.interest_rate < Decimal::ZERO {
        return Err(TenorGapError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate must not be negative".into(),
        });
    }
    Ok(())
}

/// Level annuity payment for a monthly rate and period count.
fn annuity_payment(principal: Money, monthly_rate: Decimal, periods: u32) -> Money {
    if monthly_rate.is_zero() {
        return principal / Decimal::from(periods);
    }
    let factor = (Decimal::ONE + monthly_rate).powi(periods as i64);
    principal * monthly_rate * factor / (factor - Decimal::ONE)
}

fn make_row(
    period: u32,
    payment_date: NaiveDate,
    payment: Money,
    principal: Money,
    interest: Money,
    balance: Money,
) -> ScheduleRow {
    // Each field rounds independently; payment may drift a penny from
    // principal + interest. Balance is floored before rounding so residue
    // never shows as a negative final balance.
    ScheduleRow {
        period,
        payment_date,
        payment: payment.round_dp(2),
        principal: principal.round_dp(2),
        interest: interest.round_dp(2),
        remaining_balance: balance.max(Decimal::ZERO).round_dp(2),
    }
}

/// Build the full period-by-period amortization table for a loan.
///
/// Returns an empty table when the loan has already matured
/// (`end_date <= reporting_date`) — that is a defined empty-result case,
/// not an error.
pub fn amortization_schedule(loan: &Loan) -> TenorGapResult<Vec<ScheduleRow>> {
    validate_loan(loan)?;

    if loan.end_date <= loan.reporting_date {
        return Ok(Vec::new());
    }

    let dates = payment_dates(loan.reporting_date, loan.end_date);
    if dates.is_empty() {
        return Ok(Vec::new());
    }
    let periods = dates.len() as u32;

    let principal = loan.outstanding;
    let r = loan.interest_rate / MONTHS_PER_YEAR;
    let mut balance = principal;
    let mut rows = Vec::with_capacity(dates.len());

    match (loan.installment, loan.method) {
        // Bullet: interest-only on the original principal, lump-sum
        // repayment at the final period. The method field is not consulted.
        (Installment::No, _) => {
            let monthly_interest = principal * r;
            for (i, pay_date) in dates.into_iter().enumerate() {
                let period = i as u32 + 1;
                let principal_payment = if period == periods {
                    principal
                } else {
                    Decimal::ZERO
                };
                let payment = principal_payment + monthly_interest;
                balance -= principal_payment;
                rows.push(make_row(
                    period,
                    pay_date,
                    payment,
                    principal_payment,
                    monthly_interest,
                    balance,
                ));
            }
        }

        (Installment::Yes, RepaymentMethod::Annuity) => {
            let pmt = annuity_payment(principal, r, periods);
            for (i, pay_date) in dates.into_iter().enumerate() {
                let interest = balance * r;
                let principal_payment = pmt - interest;
                balance -= principal_payment;
                rows.push(make_row(
                    i as u32 + 1,
                    pay_date,
                    pmt,
                    principal_payment,
                    interest,
                    balance,
                ));
            }
        }

        // Flat: constant principal and constant interest computed on the
        // original principal, not the declining balance.
        (Installment::Yes, RepaymentMethod::Flat) => {
            let monthly_principal = principal / Decimal::from(periods);
            let monthly_interest = principal * r;
            let payment = monthly_principal + monthly_interest;
            for (i, pay_date) in dates.into_iter().enumerate() {
                balance -= monthly_principal;
                rows.push(make_row(
                    i as u32 + 1,
                    pay_date,
                    payment,
                    monthly_principal,
                    monthly_interest,
                    balance,
                ));
            }
        }
    }

    Ok(rows)
}

/// Amortization schedule wrapped in the standard output envelope.
pub fn loan_schedule(loan: &Loan) -> TenorGapResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let schedule = amortization_schedule(loan)?;
    if schedule.is_empty() {
        warnings.push(format!(
            "Loan '{}' matures on or before the reporting date; schedule is empty",
            loan.account_id
        ));
    }

    let total_principal: Money = schedule.iter().map(|row| row.principal).sum();
    let total_interest: Money = schedule.iter().map(|row| row.interest).sum();

    let output = ScheduleOutput {
        account_id: loan.account_id.clone(),
        periods: schedule.len() as u32,
        total_principal,
        total_interest,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly amortization schedule — anchor-day payment dates, bullet/annuity/flat repayment",
        &serde_json::json!({
            "account_id": loan.account_id,
            "outstanding": loan.outstanding.to_string(),
            "interest_rate": loan.interest_rate.to_string(),
            "installment": loan.installment,
            "method": loan.method,
            "reporting_date": loan.reporting_date,
            "end_date": loan.end_date,
        }),
        warnings,
        elapsed,
        output,
    ))
}
