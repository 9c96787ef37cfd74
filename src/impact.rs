//! Preview of how a single event changes the interest still to be paid.
//!
//! Each event is judged on its own against the event-free schedule, so the
//! figures are estimates rather than a breakdown of the combined schedule.

use crate::event::{EventKind, LoanEvent};
use crate::loan::{get_total_interest, periodic_rate, LoanParameters};
use crate::schedule::compute_schedule;
use log::debug;
use std::fmt;

/// Balance at the start of `month` when no event has fired.
pub fn balance_before(loan: &LoanParameters, month: u32) -> f64 {
    if month <= 1 {
        return loan.principal;
    }
    compute_schedule(loan, &[])
        .get(month as usize - 2)
        .map_or(0., |pmt| pmt.pmt_end_balance)
}

/// Change in total remaining interest caused by `event`. Negative values are
/// savings.
pub fn interest_change(loan: &LoanParameters, event: &LoanEvent) -> f64 {
    let balance = balance_before(loan, event.month);
    let remaining_periods = i64::from(loan.term_months) - i64::from(event.month) + 1;
    let rate = loan.periodic_rate();

    let baseline = get_total_interest(balance, rate, remaining_periods, loan.style);
    let updated = match event.kind {
        EventKind::LumpSum => get_total_interest(
            (balance - event.value).max(0.),
            rate,
            remaining_periods,
            loan.style,
        ),
        EventKind::RateChange => get_total_interest(
            balance,
            periodic_rate(event.value),
            remaining_periods,
            loan.style,
        ),
        EventKind::TermChange => {
            get_total_interest(balance, rate, event.term_periods(), loan.style)
        }
    };

    debug!(
        "{}: balance {}, interest {} -> {}",
        event, balance, baseline, updated
    );
    updated - baseline
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventImpact {
    pub event: LoanEvent,
    pub interest_change: f64,
}

impl fmt::Display for EventImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.interest_change < 0. {
            "decrease"
        } else {
            "increase"
        };
        write!(
            f,
            "{}, interest {} ${:.2}",
            self.event,
            direction,
            self.interest_change.abs()
        )
    }
}

pub fn event_impacts(loan: &LoanParameters, events: &[LoanEvent]) -> Vec<EventImpact> {
    events
        .iter()
        .map(|event| EventImpact {
            event: *event,
            interest_change: interest_change(loan, event),
        })
        .collect()
}
