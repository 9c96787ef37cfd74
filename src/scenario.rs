//! Loan scenarios stored as JSON.
//!
//! ```json
//! {
//!   "principal": 1000000,
//!   "annual_rate": 4.5,
//!   "term_months": 360,
//!   "style": "equal_payment",
//!   "first_pmt_date": "2024-04-01",
//!   "events": [
//!     { "type": "lump_sum", "month": 12, "value": 10000 },
//!     { "type": "rate_change", "month": 24, "value": 3.9 }
//!   ]
//! }
//! ```

use crate::error::LoanResult;
use crate::event::LoanEvent;
use crate::loan::LoanParameters;
use crate::schedule::Amortization;
use crate::validate::validate;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(flatten)]
    pub loan: LoanParameters,
    #[serde(default)]
    pub events: Vec<LoanEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_pmt_date: Option<NaiveDate>,
}

impl Scenario {
    pub fn new(loan: LoanParameters) -> Self {
        Self {
            loan,
            events: Vec::new(),
            first_pmt_date: None,
        }
    }

    pub fn from_json(json: &str) -> LoanResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> LoanResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let scenario = Self::from_json(&contents)?;
        debug!(
            "loaded scenario from {}: {} with {} events",
            path.display(),
            scenario.loan,
            scenario.events.len()
        );
        Ok(scenario)
    }

    pub fn to_json(&self) -> LoanResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> LoanResult<()> {
        validate(&self.loan, &self.events)
    }

    pub fn amortize(&self) -> Amortization {
        let amortization = Amortization::new(self.loan, self.events.clone());
        match self.first_pmt_date {
            Some(date) => amortization.with_first_pmt_date(date),
            None => amortization,
        }
    }
}
