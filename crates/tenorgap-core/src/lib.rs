pub mod aggregate;
pub mod bucket;
pub mod error;
pub mod portfolio;
pub mod schedule;
pub mod types;

pub use error::TenorGapError;
pub use types::*;

/// Standard result type for all tenorgap operations
pub type TenorGapResult<T> = Result<T, TenorGapError>;
