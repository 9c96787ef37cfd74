use chrono::{Months, NaiveDate};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RepaymentStyle {
    /// constant periodic payment (standard annuity)
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "equalPayment"))]
    EqualPayment,
    /// constant principal portion, declining payment
    #[cfg_attr(feature = "serde", serde(alias = "equalPrincipal"))]
    EqualPrincipal,
}

impl fmt::Display for RepaymentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepaymentStyle::EqualPayment => write!(f, "equal payment"),
            RepaymentStyle::EqualPrincipal => write!(f, "equal principal"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanParameters {
    pub principal: f64,
    /// annual interest rate as a percentage (i.e., 4.5, 7.0)
    pub annual_rate: f64,
    pub term_months: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub style: RepaymentStyle,
}

impl LoanParameters {
    pub fn new(principal: f64, annual_rate: f64, term_months: u32, style: RepaymentStyle) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            style,
        }
    }

    pub fn periodic_rate(&self) -> f64 {
        periodic_rate(self.annual_rate)
    }

    /// payment charged in the first period, before any event
    pub fn get_pmt_amount(&self) -> f64 {
        get_pmt_amount(
            self.principal,
            self.periodic_rate(),
            i64::from(self.term_months),
            self.style,
        )
    }

    /// interest over the full term if no event ever fires
    pub fn get_total_interest(&self) -> f64 {
        get_total_interest(
            self.principal,
            self.periodic_rate(),
            i64::from(self.term_months),
            self.style,
        )
    }
}

impl Default for LoanParameters {
    fn default() -> Self {
        Self::new(1_000_000., 4.5, 360, RepaymentStyle::EqualPayment)
    }
}

impl fmt::Display for LoanParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "principal ${:.2}, annual rate {}%, term {} months, {}",
            self.principal, self.annual_rate, self.term_months, self.style
        )
    }
}

pub fn periodic_rate(annual_rate: f64) -> f64 {
    annual_rate / 100. / 12.
}

pub fn round(amt: f64, dec: f64) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 10_f64.powf(dec)).round() / 10_f64.powf(dec)
    }
}

/// Periodic payment for `balance` over `remaining_periods`.
///
/// Under `EqualPrincipal` the result is the first period's total charge: the
/// constant principal portion plus that period's interest.
pub fn get_pmt_amount(
    balance: f64,            // outstanding balance
    periodic_rate: f64,      // annual rate / 100 / 12
    remaining_periods: i64,  // periods left, including the current one
    style: RepaymentStyle,
) -> f64 {
    match style {
        RepaymentStyle::EqualPrincipal => {
            balance / remaining_periods as f64 + balance * periodic_rate
        }
        RepaymentStyle::EqualPayment => {
            if periodic_rate == 0. {
                balance / remaining_periods as f64
            } else if remaining_periods <= 0 {
                balance
            } else {
                let factor = (1. + periodic_rate).powf(remaining_periods as f64);
                (balance * periodic_rate * factor) / (factor - 1.)
            }
        }
    }
}

/// Interest that would accrue on `principal` over `remaining_periods` with no
/// further events.
pub fn get_total_interest(
    principal: f64,
    periodic_rate: f64,
    remaining_periods: i64,
    style: RepaymentStyle,
) -> f64 {
    if periodic_rate == 0. || remaining_periods <= 0 {
        return 0.;
    }

    match style {
        RepaymentStyle::EqualPrincipal => {
            let periodic_principal = principal / remaining_periods as f64;
            let mut remaining_principal = principal;
            let mut total_interest = 0.;
            for _ in 0..remaining_periods {
                total_interest += remaining_principal * periodic_rate;
                remaining_principal -= periodic_principal;
            }
            total_interest
        }
        RepaymentStyle::EqualPayment => {
            let pmt_amount = get_pmt_amount(principal, periodic_rate, remaining_periods, style);
            pmt_amount * remaining_periods as f64 - principal
        }
    }
}

/// Date of payment `pmt_number` (1-indexed) when the first payment falls on
/// `first_pmt_date`. Always offset from the first date, so month-end days are
/// clamped per month rather than drifting.
pub fn get_pmt_date(first_pmt_date: NaiveDate, pmt_number: u32) -> Option<NaiveDate> {
    let offset = pmt_number.checked_sub(1)?;
    first_pmt_date.checked_add_months(Months::new(offset))
}

pub fn payment_dates(first_pmt_date: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (1..)
        .take(count)
        .map_while(|pmt_number| get_pmt_date(first_pmt_date, pmt_number))
        .collect()
}
