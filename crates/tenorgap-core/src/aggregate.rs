//! Bucket aggregation of amortization cash flows.
//!
//! One aggregation primitive (sum a per-row value into the taxonomy's
//! canonical label vector) behind two presentation shapes: "tall" — one
//! entry per bucket for a single loan breakdown — and "flattened" — the
//! same sums read as one record with one column per bucket, used for the
//! portfolio-level export. The flattened path carries taxonomy-specific
//! value overrides inherited from the upstream reporting system; see
//! `flattened_row_value`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::bucket::Taxonomy;
use crate::schedule::amortization_schedule;
use crate::types::{with_metadata, ComputationOutput, Loan, Money, ScheduleRow, ValueKind};
use crate::TenorGapResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Aggregated value for one bucket label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketValue {
    pub bucket: String,
    pub value: Money,
}

/// Presentation shape of a bucket aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketShape {
    /// One row per bucket.
    Tall,
    /// One logical row, one column per bucket.
    Flattened,
}

/// Bucket breakdown for one loan, one taxonomy, and one value mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketBreakdown {
    pub account_id: String,
    pub taxonomy: Taxonomy,
    pub value_kind: ValueKind,
    pub shape: BucketShape,
    pub buckets: Vec<BucketValue>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

fn plain_row_value(row: &ScheduleRow, value: ValueKind) -> Money {
    match value {
        ValueKind::Principal => row.principal,
        ValueKind::Interest => row.interest,
        ValueKind::Total => row.principal + row.interest,
    }
}

/// Per-row value on the flattened path.
///
/// Three (taxonomy, value-mode) combinations override the plain selection.
/// These reproduce the upstream reporting system exactly and apply ONLY to
/// the flattened export, never to tall breakdowns:
///   - LCR/interest counts interest only from the "≤30D" bucket;
///   - LCR/total is principal from all buckets plus "≤30D" interest;
///   - NSFR/interest is always zero.
fn flattened_row_value(
    taxonomy: Taxonomy,
    value: ValueKind,
    row: &ScheduleRow,
    bucket: &str,
) -> Money {
    match (taxonomy, value) {
        (Taxonomy::Lcr, ValueKind::Interest) => {
            if bucket == "≤30D" {
                row.interest
            } else {
                Decimal::ZERO
            }
        }
        (Taxonomy::Lcr, ValueKind::Total) => {
            row.principal
                + if bucket == "≤30D" {
                    row.interest
                } else {
                    Decimal::ZERO
                }
        }
        (Taxonomy::Nsfr, ValueKind::Interest) => Decimal::ZERO,
        _ => plain_row_value(row, value),
    }
}

fn sum_by_bucket<F>(
    rows: &[ScheduleRow],
    taxonomy: Taxonomy,
    reference: chrono::NaiveDate,
    row_value: F,
) -> Vec<BucketValue>
where
    F: Fn(&ScheduleRow, &str) -> Money,
{
    let labels = taxonomy.labels();
    let mut totals = vec![Decimal::ZERO; labels.len()];

    for row in rows {
        let bucket = taxonomy.classify(reference, row.payment_date);
        if let Some(idx) = labels.iter().position(|l| *l == bucket) {
            totals[idx] += row_value(row, bucket);
        }
    }

    labels
        .iter()
        .zip(totals)
        .map(|(label, value)| BucketValue {
            bucket: (*label).to_string(),
            value,
        })
        .collect()
}

/// Tall aggregation: one entry per bucket, full canonical label set,
/// empty buckets zero-filled. Plain value selection, no overrides.
pub fn tall(
    rows: &[ScheduleRow],
    taxonomy: Taxonomy,
    reference: chrono::NaiveDate,
    value: ValueKind,
) -> Vec<BucketValue> {
    sum_by_bucket(rows, taxonomy, reference, |row, _| plain_row_value(row, value))
}

/// Flattened aggregation: identical sums transposed into a single record,
/// with the taxonomy-specific value overrides applied.
pub fn flattened(
    rows: &[ScheduleRow],
    taxonomy: Taxonomy,
    reference: chrono::NaiveDate,
    value: ValueKind,
) -> Vec<BucketValue> {
    sum_by_bucket(rows, taxonomy, reference, |row, bucket| {
        flattened_row_value(taxonomy, value, row, bucket)
    })
}

/// Bucket breakdown for one loan, wrapped in the standard output envelope.
///
/// An already-matured loan yields the full label set mapped to zero.
pub fn bucket_breakdown(
    loan: &Loan,
    taxonomy: Taxonomy,
    value: ValueKind,
    shape: BucketShape,
) -> TenorGapResult<ComputationOutput<BucketBreakdown>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let rows = amortization_schedule(loan)?;
    if rows.is_empty() {
        warnings.push(format!(
            "Loan '{}' matures on or before the reporting date; all buckets are zero",
            loan.account_id
        ));
    }

    let buckets = match shape {
        BucketShape::Tall => tall(&rows, taxonomy, loan.reporting_date, value),
        BucketShape::Flattened => flattened(&rows, taxonomy, loan.reporting_date, value),
    };

    let output = BucketBreakdown {
        account_id: loan.account_id.clone(),
        taxonomy,
        value_kind: value,
        shape,
        buckets,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Maturity-gap bucketing — cash flows classified against the reporting date",
        &serde_json::json!({
            "account_id": loan.account_id,
            "taxonomy": taxonomy,
            "value_kind": value,
            "shape": shape,
            "reporting_date": loan.reporting_date,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(period: u32, payment_date: NaiveDate, principal: Decimal, interest: Decimal) -> ScheduleRow {
        ScheduleRow {
            period,
            payment_date,
            payment: principal + interest,
            principal,
            interest,
            remaining_balance: Decimal::ZERO,
        }
    }

    fn sample_rows() -> Vec<ScheduleRow> {
        // Reference 2024-01-01: first row within 30 days, second beyond
        vec![
            row(1, date(2024, 1, 20), dec!(100), dec!(10)),
            row(2, date(2024, 3, 20), dec!(200), dec!(20)),
        ]
    }

    #[test]
    fn test_tall_zero_fills_canonical_order() {
        let reference = date(2024, 1, 1);
        let result = tall(&sample_rows(), Taxonomy::Irrbb, reference, ValueKind::Total);
        assert_eq!(result.len(), 18);
        assert_eq!(result[0].bucket, "≤ 1 bulan");
        assert_eq!(result[0].value, dec!(110));
        assert_eq!(result[1].bucket, "1-3 bulan");
        assert_eq!(result[1].value, dec!(220));
        for entry in &result[2..] {
            assert_eq!(entry.value, Decimal::ZERO);
        }
    }

    #[test]
    fn test_tall_has_no_value_overrides() {
        let reference = date(2024, 1, 1);
        // Tall LCR interest keeps >30D interest
        let result = tall(&sample_rows(), Taxonomy::Lcr, reference, ValueKind::Interest);
        assert_eq!(result[0].value, dec!(10));
        assert_eq!(result[1].value, dec!(20));
        // Tall NSFR interest is the plain interest, not zero
        let nsfr = tall(&sample_rows(), Taxonomy::Nsfr, reference, ValueKind::Interest);
        let total: Decimal = nsfr.iter().map(|b| b.value).sum();
        assert_eq!(total, dec!(30));
    }

    #[test]
    fn test_flattened_lcr_interest_zeroes_far_bucket() {
        let reference = date(2024, 1, 1);
        let result = flattened(&sample_rows(), Taxonomy::Lcr, reference, ValueKind::Interest);
        assert_eq!(result[0].bucket, "≤30D");
        assert_eq!(result[0].value, dec!(10));
        assert_eq!(result[1].bucket, ">30D");
        assert_eq!(result[1].value, Decimal::ZERO);
    }

    #[test]
    fn test_flattened_lcr_total_asymmetric() {
        let reference = date(2024, 1, 1);
        let result = flattened(&sample_rows(), Taxonomy::Lcr, reference, ValueKind::Total);
        // ≤30D: principal + interest; >30D: principal only
        assert_eq!(result[0].value, dec!(110));
        assert_eq!(result[1].value, dec!(200));
    }

    #[test]
    fn test_flattened_nsfr_interest_always_zero() {
        let reference = date(2024, 1, 1);
        let result = flattened(&sample_rows(), Taxonomy::Nsfr, reference, ValueKind::Interest);
        for entry in &result {
            assert_eq!(entry.value, Decimal::ZERO);
        }
        // Principal mode is untouched
        let principal = flattened(&sample_rows(), Taxonomy::Nsfr, reference, ValueKind::Principal);
        let total: Decimal = principal.iter().map(|b| b.value).sum();
        assert_eq!(total, dec!(300));
    }

    #[test]
    fn test_empty_rows_zero_fill_both_shapes() {
        let reference = date(2024, 1, 1);
        for taxonomy in [Taxonomy::Irrbb, Taxonomy::Lcr, Taxonomy::Nsfr] {
            for shape_rows in [
                tall(&[], taxonomy, reference, ValueKind::Total),
                flattened(&[], taxonomy, reference, ValueKind::Total),
            ] {
                let labels: Vec<&str> = shape_rows.iter().map(|b| b.bucket.as_str()).collect();
                assert_eq!(labels, taxonomy.labels());
                assert!(shape_rows.iter().all(|b| b.value == Decimal::ZERO));
            }
        }
    }
}
