use chrono::NaiveDate;
use thiserror::Error;

use crate::source::SourceError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("expiry of {0} is out of the supported date range")]
    DateOverflow(NaiveDate),

    #[error("column '{column}' holds '{value}', expected a whole number")]
    InvalidNumber { column: &'static str, value: String },

    #[error(transparent)]
    Source(#[from] SourceError),
}
