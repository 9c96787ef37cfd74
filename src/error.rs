use crate::event::EventKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("Invalid principal: {0} (must be greater than zero)")]
    InvalidPrincipal(f64),

    #[error("Invalid annual rate: {0}% (must be between 0 and 100)")]
    InvalidRate(f64),

    #[error("Invalid term: {0} months (must be at least 1)")]
    InvalidTerm(u32),

    #[error("Event month {month} is outside the loan term (1 to {term_months})")]
    EventMonthOutOfRange { month: u32, term_months: u32 },

    #[error("Invalid lump sum in month {month}: {value} (must be zero or more)")]
    InvalidLumpSum { month: u32, value: f64 },

    #[error("Invalid rate change in month {month}: {value}% (must be between 0 and 100)")]
    InvalidRateChange { month: u32, value: f64 },

    #[error("Invalid term change in month {month}: {value} (must be a whole number of periods from 1 to {term_months})")]
    InvalidTermChange {
        month: u32,
        value: f64,
        term_months: u32,
    },

    #[error("More than one {kind} event in month {month}")]
    DuplicateEvent { kind: EventKind, month: u32 },

    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type LoanResult<T> = Result<T, LoanError>;
