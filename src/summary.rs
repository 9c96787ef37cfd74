use crate::loan::round;
use crate::schedule::PaymentRecord;
use std::fmt;

/// Totals over a computed schedule.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleSummary {
    pub initial_payment: f64,
    /// payment charged in the last scheduled period
    pub current_payment: f64,
    /// regular payments plus lump sums
    pub total_payments: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_lump_sums: f64,
    pub payoff_period: u32,
}

impl ScheduleSummary {
    pub fn from_schedule(schedule: &[PaymentRecord]) -> Self {
        let mut summary = schedule.iter().fold(Self::default(), |mut summary, pmt| {
            summary.total_payments += pmt.total_paid();
            summary.total_interest += pmt.pmt_interest_paid;
            summary.total_principal += pmt.pmt_principal_paid;
            summary.total_lump_sums += pmt.lump_sum.unwrap_or(0.);
            summary
        });

        if let (Some(first), Some(last)) = (schedule.first(), schedule.last()) {
            summary.initial_payment = first.pmt_amount;
            summary.current_payment = last.pmt_amount;
            summary.payoff_period = last.pmt_number;
        }
        summary
    }

    pub fn rounded(&self, dec_places: f64) -> Self {
        Self {
            initial_payment: round(self.initial_payment, dec_places),
            current_payment: round(self.current_payment, dec_places),
            total_payments: round(self.total_payments, dec_places),
            total_interest: round(self.total_interest, dec_places),
            total_principal: round(self.total_principal, dec_places),
            total_lump_sums: round(self.total_lump_sums, dec_places),
            payoff_period: self.payoff_period,
        }
    }
}

impl fmt::Display for ScheduleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "initial payment ${:.2}", self.initial_payment)?;
        writeln!(f, "current payment ${:.2}", self.current_payment)?;
        writeln!(f, "total payments ${:.2}", self.total_payments)?;
        writeln!(f, "total interest ${:.2}", self.total_interest)?;
        if self.total_lump_sums > 0. {
            writeln!(f, "total lump sums ${:.2}", self.total_lump_sums)?;
        }
        write!(f, "paid off after {} payments", self.payoff_period)
    }
}

/// Running totals up to and including `pmt_number`.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CumulativeTotals {
    pub pmt_number: u32,
    pub total_payments: f64,
    pub total_interest: f64,
}

pub fn cumulative_totals(schedule: &[PaymentRecord]) -> Vec<CumulativeTotals> {
    schedule
        .iter()
        .scan((0., 0.), |(payments, interest), pmt| {
            *payments += pmt.total_paid();
            *interest += pmt.pmt_interest_paid;
            Some(CumulativeTotals {
                pmt_number: pmt.pmt_number,
                total_payments: *payments,
                total_interest: *interest,
            })
        })
        .collect()
}
