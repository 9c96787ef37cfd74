use crate::loan::LoanParameters;
use log::warn;
use std::fmt;

pub const DEFAULT_LUMP_SUM: f64 = 10000.;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventKind {
    #[cfg_attr(feature = "serde", serde(alias = "lumpSum"))]
    LumpSum,
    #[cfg_attr(feature = "serde", serde(alias = "rateChange"))]
    RateChange,
    #[cfg_attr(feature = "serde", serde(alias = "termChange"))]
    TermChange,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::LumpSum => write!(f, "lump sum"),
            EventKind::RateChange => write!(f, "rate change"),
            EventKind::TermChange => write!(f, "term change"),
        }
    }
}

/// A change to the loan taking effect in `month` (1-indexed).
///
/// `value` depends on `kind`: the extra principal paid for a lump sum, the new
/// annual rate percentage for a rate change, or the number of periods left
/// (including `month`) for a term change.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanEvent {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: EventKind,
    pub month: u32,
    pub value: f64,
}

impl LoanEvent {
    pub fn new(kind: EventKind, month: u32, value: f64) -> Self {
        Self { kind, month, value }
    }

    pub fn lump_sum(month: u32, amount: f64) -> Self {
        Self::new(EventKind::LumpSum, month, amount)
    }

    pub fn rate_change(month: u32, annual_rate: f64) -> Self {
        Self::new(EventKind::RateChange, month, annual_rate)
    }

    pub fn term_change(month: u32, remaining_periods: u32) -> Self {
        Self::new(EventKind::TermChange, month, f64::from(remaining_periods))
    }

    /// A fresh month 1 event with a starting value suited to `loan`.
    pub fn with_defaults(kind: EventKind, loan: &LoanParameters) -> Self {
        let value = match kind {
            EventKind::LumpSum => DEFAULT_LUMP_SUM,
            EventKind::RateChange => loan.annual_rate,
            EventKind::TermChange => f64::from(loan.term_months.saturating_sub(12).max(1)),
        };
        Self::new(kind, 1, value)
    }

    /// term change value as a whole number of periods
    pub fn term_periods(&self) -> i64 {
        self.value.round() as i64
    }
}

impl fmt::Display for LoanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::LumpSum => write!(f, "month {}: lump sum ${:.2}", self.month, self.value),
            EventKind::RateChange => {
                write!(f, "month {}: rate change to {}%", self.month, self.value)
            }
            EventKind::TermChange => write!(
                f,
                "month {}: term change to {} periods",
                self.month,
                self.term_periods()
            ),
        }
    }
}

/// Copy of `events` ordered by month. The sort is stable, so events sharing a
/// month keep their input order.
pub fn sort_by_month(events: &[LoanEvent]) -> Vec<LoanEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|event| event.month);
    sorted
}

/// The events firing in a single period, at most one per kind.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct PeriodEvents {
    pub lump_sum: Option<f64>,
    pub rate_change: Option<f64>,
    pub term_change: Option<i64>,
}

impl PeriodEvents {
    /// Picks the events of `events` that fall in `period`. When a kind occurs
    /// more than once the first occurrence wins and the rest are logged and
    /// dropped.
    pub fn collect(period: u32, events: &[LoanEvent]) -> Self {
        let mut period_events = Self::default();

        for event in events.iter().filter(|event| event.month == period) {
            let taken = match event.kind {
                EventKind::LumpSum => take_first(&mut period_events.lump_sum, event.value),
                EventKind::RateChange => take_first(&mut period_events.rate_change, event.value),
                EventKind::TermChange => {
                    take_first(&mut period_events.term_change, event.term_periods())
                }
            };
            if !taken {
                warn!("period {}: ignoring duplicate {} ({})", period, event.kind, event);
            }
        }
        period_events
    }

    pub fn is_empty(&self) -> bool {
        self.lump_sum.is_none() && self.rate_change.is_none() && self.term_change.is_none()
    }

    /// rate and term changes force the payment to be recomputed before it is charged
    pub fn reamortizes(&self) -> bool {
        self.rate_change.is_some() || self.term_change.is_some()
    }
}

fn take_first<T>(slot: &mut Option<T>, value: T) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value);
    true
}
