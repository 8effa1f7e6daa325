use thiserror::Error;

#[derive(Debug, Error)]
pub enum TenorGapError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid repayment method '{0}': must be 'annuity' or 'flat'")]
    InvalidMethod(String),

    #[error("Invalid installment flag '{0}': must be 'yes' or 'no'")]
    InvalidInstallmentFlag(String),

    #[error("Unknown bucket taxonomy '{0}': must be 'irrbb', 'lcr' or 'nsfr'")]
    InvalidBucketType(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for TenorGapError {
    fn from(e: serde_json::Error) -> Self {
        TenorGapError::SerializationError(e.to_string())
    }
}
