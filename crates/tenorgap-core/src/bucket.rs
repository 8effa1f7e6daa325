//! Regulatory maturity-bucket taxonomies (IRRBB, LCR, NSFR) and the
//! classification of a payment date relative to a reference date.
//!
//! IRRBB uses a day threshold for the shortest bucket and whole
//! calendar-month intervals beyond it; LCR is a pure day split; NSFR is a
//! pure month split. Month differences deliberately ignore day-of-month —
//! a payment one day into the next calendar month already counts a full
//! month elapsed. That is calendar-month arithmetic, not elapsed-day
//! arithmetic, and it is the reporting convention this engine reproduces.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::TenorGapError;
use crate::TenorGapResult;

/// Day threshold shared by the shortest IRRBB and LCR buckets.
const SHORT_BUCKET_MAX_DAYS: i64 = 30;

/// IRRBB labels in canonical order: the day-based bucket first, then the 17
/// month intervals.
pub const IRRBB_LABELS: [&str; 18] = [
    "≤ 1 bulan",
    "1-3 bulan",
    "3-6 bulan",
    "6-9 bulan",
    "9-12 bulan",
    "1-1.5Y",
    "1.5-2Y",
    "2-3Y",
    "3-4Y",
    "4-5Y",
    "5-6Y",
    "6-7Y",
    "7-8Y",
    "8-9Y",
    "9-10Y",
    "10-15Y",
    "15-20Y",
    "> 20Y",
];

pub const LCR_LABELS: [&str; 2] = ["≤30D", ">30D"];

pub const NSFR_LABELS: [&str; 3] = ["<6M", "6-12M", ">12M"];

/// Right-closed month intervals for IRRBB: first upper edge that the month
/// count does not exceed wins. The lowest interval is inclusive of its lower
/// edge, so months 1..=3 map to "1-3 bulan".
const IRRBB_MONTH_EDGES: [(i32, &str); 16] = [
    (3, "1-3 bulan"),
    (6, "3-6 bulan"),
    (9, "6-9 bulan"),
    (12, "9-12 bulan"),
    (18, "1-1.5Y"),
    (24, "1.5-2Y"),
    (36, "2-3Y"),
    (48, "3-4Y"),
    (60, "4-5Y"),
    (72, "5-6Y"),
    (84, "6-7Y"),
    (96, "7-8Y"),
    (108, "8-9Y"),
    (120, "9-10Y"),
    (180, "10-15Y"),
    (240, "15-20Y"),
];

/// Elapsed days between the reference date and a payment date.
pub fn day_count(reference: NaiveDate, date: NaiveDate) -> i64 {
    (date - reference).num_days()
}

/// Whole calendar-month difference. Day-of-month is ignored on both sides.
pub fn month_count(reference: NaiveDate, date: NaiveDate) -> i32 {
    (date.year() - reference.year()) * 12 + (date.month() as i32 - reference.month() as i32)
}

/// The three maturity-bucket taxonomies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Taxonomy {
    Irrbb,
    Lcr,
    Nsfr,
}

impl Taxonomy {
    pub fn parse(raw: &str) -> TenorGapResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "irrbb" => Ok(Taxonomy::Irrbb),
            "lcr" => Ok(Taxonomy::Lcr),
            "nsfr" => Ok(Taxonomy::Nsfr),
            other => Err(TenorGapError::InvalidBucketType(other.to_string())),
        }
    }

    /// Full canonical label set, in reporting order.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Taxonomy::Irrbb => &IRRBB_LABELS,
            Taxonomy::Lcr => &LCR_LABELS,
            Taxonomy::Nsfr => &NSFR_LABELS,
        }
    }

    /// Classify a payment date against the reference date into one label of
    /// this taxonomy. Total: every date maps to exactly one label.
    pub fn classify(&self, reference: NaiveDate, payment_date: NaiveDate) -> &'static str {
        match self {
            Taxonomy::Irrbb => {
                let days = day_count(reference, payment_date);
                if days <= SHORT_BUCKET_MAX_DAYS {
                    return IRRBB_LABELS[0];
                }
                let months = month_count(reference, payment_date);
                for (upper, label) in IRRBB_MONTH_EDGES {
                    if months <= upper {
                        return label;
                    }
                }
                "> 20Y"
            }
            Taxonomy::Lcr => {
                if day_count(reference, payment_date) <= SHORT_BUCKET_MAX_DAYS {
                    "≤30D"
                } else {
                    ">30D"
                }
            }
            Taxonomy::Nsfr => {
                let months = month_count(reference, payment_date);
                match months {
                    m if m < 6 => "<6M",
                    m if m <= 12 => "6-12M",
                    _ => ">12M",
                }
            }
        }
    }
}
