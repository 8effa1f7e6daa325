use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tenorgap_core::schedule::{amortization_schedule, loan_schedule, payment_dates};
use tenorgap_core::{Currency, Installment, Loan, RepaymentMethod};

// ===========================================================================
// Sample loans
// ===========================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_loan(installment: Installment, method: RepaymentMethod) -> Loan {
    // The worked reference case: 1.2M at 12% nominal, reporting 2024-01-01,
    // maturing 2025-01-01 -> 12 monthly periods
    Loan {
        reporting_date: date(2024, 1, 1),
        account_id: "LN-001".into(),
        currency: Currency::IDR,
        outstanding: dec!(1_200_000),
        interest_rate: dec!(0.12),
        start_date: date(2022, 1, 1),
        end_date: date(2025, 1, 1),
        installment,
        method,
        product_type: Some("Term Loan".into()),
        segment: Some("SME".into()),
        region: None,
        postal_code: None,
        insured: None,
        transactional: None,
    }
}

// ===========================================================================
// Date generator
// ===========================================================================

#[test]
fn test_dates_clamp_to_short_months() {
    // Anchor 31 over a leap February
    let dates = payment_dates(date(2023, 12, 1), date(2024, 3, 31));
    assert_eq!(
        dates,
        vec![
            date(2023, 12, 31),
            date(2024, 1, 31),
            date(2024, 2, 29),
            date(2024, 3, 31),
        ]
    );
}

#[test]
fn test_dates_first_month_rule() {
    // Reporting day < anchor: first date falls in the reporting month
    let early = payment_dates(date(2024, 5, 3), date(2024, 9, 10));
    assert_eq!(early[0], date(2024, 5, 10));

    // Reporting day >= anchor: first date moves to the following month
    let late = payment_dates(date(2024, 5, 10), date(2024, 9, 10));
    assert_eq!(late[0], date(2024, 6, 10));
}

#[test]
fn test_dates_properties_hold_over_long_horizon() {
    let end = date(2045, 1, 30);
    let dates = payment_dates(date(2024, 6, 15), end);
    assert!(!dates.is_empty());
    assert!(*dates.last().unwrap() <= end);
    for pair in dates.windows(2) {
        assert!(pair[0] < pair[1], "sequence must be strictly increasing");
        let months_apart = (pair[1].year() - pair[0].year()) * 12
            + (pair[1].month() as i32 - pair[0].month() as i32);
        assert_eq!(months_apart, 1, "cadence must be strictly monthly");
    }
}

// ===========================================================================
// Schedule engine — worked reference cases
// ===========================================================================

#[test]
fn test_bullet_reference_case() {
    let loan = sample_loan(Installment::No, RepaymentMethod::Annuity);
    let rows = amortization_schedule(&loan).unwrap();

    assert_eq!(rows.len(), 12);
    for row in &rows[..11] {
        assert_eq!(row.interest, dec!(12_000));
        assert_eq!(row.principal, Decimal::ZERO);
        assert_eq!(row.remaining_balance, dec!(1_200_000));
    }
    assert_eq!(rows[11].principal, dec!(1_200_000));
    assert_eq!(rows[11].interest, dec!(12_000));
    assert_eq!(rows[11].remaining_balance, Decimal::ZERO);
}

#[test]
fn test_flat_reference_case() {
    let loan = sample_loan(Installment::Yes, RepaymentMethod::Flat);
    let rows = amortization_schedule(&loan).unwrap();

    assert_eq!(rows.len(), 12);
    let mut expected_balance = dec!(1_200_000);
    for row in &rows {
        assert_eq!(row.principal, dec!(100_000));
        assert_eq!(row.interest, dec!(12_000));
        assert_eq!(row.payment, dec!(112_000));
        expected_balance -= dec!(100_000);
        assert_eq!(row.remaining_balance, expected_balance);
    }
}

#[test]
fn test_annuity_reference_case() {
    let loan = sample_loan(Installment::Yes, RepaymentMethod::Annuity);
    let rows = amortization_schedule(&loan).unwrap();

    assert_eq!(rows.len(), 12);
    let pmt = rows[0].payment;
    assert!(pmt > dec!(100_000) && pmt < dec!(112_000));
    for row in &rows {
        assert_eq!(row.payment, pmt);
    }
    for pair in rows.windows(2) {
        assert!(pair[1].interest < pair[0].interest);
        assert!(pair[1].principal > pair[0].principal);
    }
    assert!(rows[11].remaining_balance <= dec!(0.01));
}

#[test]
fn test_schedule_periods_are_sequential() {
    let loan = sample_loan(Installment::Yes, RepaymentMethod::Flat);
    let rows = amortization_schedule(&loan).unwrap();
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.period, i as u32 + 1);
    }
    for pair in rows.windows(2) {
        assert!(pair[0].payment_date < pair[1].payment_date);
    }
}

#[test]
fn test_matured_loan_yields_empty_schedule_not_error() {
    let mut loan = sample_loan(Installment::No, RepaymentMethod::Annuity);
    loan.end_date = loan.reporting_date;
    assert!(amortization_schedule(&loan).unwrap().is_empty());

    let out = loan_schedule(&loan).unwrap();
    assert_eq!(out.result.periods, 0);
    assert_eq!(out.result.total_principal, Decimal::ZERO);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_loan_schedule_envelope_totals() {
    let loan = sample_loan(Installment::No, RepaymentMethod::Annuity);
    let out = loan_schedule(&loan).unwrap();
    assert_eq!(out.result.total_principal, dec!(1_200_000));
    assert_eq!(out.result.total_interest, dec!(144_000));
    assert_eq!(out.result.account_id, "LN-001");
    assert!(out.metadata.version.starts_with("0."));
}
