//! Errors raised by the seasonal signal and influent stages.
//!
//! Every variant is a precondition or data-quality failure detected when a
//! stage starts, before any output is produced.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("insufficient data: need at least {required} {what}, found {found}")]
    InsufficientData {
        what: &'static str,
        required: usize,
        found: usize,
    },

    #[error("degenerate range: every monthly water level equals {value}, normalization is undefined")]
    DegenerateRange { value: f64 },

    #[error("no water level observations in month starting {month}")]
    MonthGap { month: NaiveDate },

    #[error(
        "target range {target_start}..={target_end} does not overlap anchor span {anchor_start}..={anchor_end}"
    )]
    DateRangeMismatch {
        target_start: NaiveDate,
        target_end: NaiveDate,
        anchor_start: NaiveDate,
        anchor_end: NaiveDate,
    },

    #[error("range mismatch: {detail}")]
    RangeMismatch { detail: String },

    #[error("alpha reaches the ground level threshold on {} day(s), first {}", .dates.len(), first_date(.dates))]
    DivisionSingularity { dates: Vec<NaiveDate> },

    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },
}

fn first_date(dates: &[NaiveDate]) -> String {
    dates
        .first()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl ModelError {
    pub fn invalid(name: &'static str, value: impl ToString) -> Self {
        ModelError::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}
