use crate::event::{sort_by_month, LoanEvent, PeriodEvents};
use crate::loan::{get_pmt_amount, get_pmt_date, periodic_rate, round, LoanParameters, RepaymentStyle};
use crate::summary::ScheduleSummary;
use chrono::NaiveDate;
use log::{debug, info, trace};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaymentRecord {
    pub pmt_number: u32,
    /// regular payment, lump sum excluded
    pub pmt_amount: f64,
    pub pmt_principal_paid: f64,
    pub pmt_interest_paid: f64,
    /// balance after the regular payment and any lump sum
    pub pmt_end_balance: f64,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub lump_sum: Option<f64>,
}

impl PaymentRecord {
    pub fn new(
        pmt_number: u32,
        pmt_amount: f64,
        pmt_principal_paid: f64,
        pmt_interest_paid: f64,
        pmt_end_balance: f64,
        lump_sum: Option<f64>,
    ) -> Self {
        Self {
            pmt_number,
            pmt_amount,
            pmt_principal_paid,
            pmt_interest_paid,
            pmt_end_balance,
            lump_sum,
        }
    }

    /// copy with every amount rounded to `dec_places`, for display
    pub fn rounded(&self, dec_places: f64) -> Self {
        Self {
            pmt_number: self.pmt_number,
            pmt_amount: round(self.pmt_amount, dec_places),
            pmt_principal_paid: round(self.pmt_principal_paid, dec_places),
            pmt_interest_paid: round(self.pmt_interest_paid, dec_places),
            pmt_end_balance: round(self.pmt_end_balance, dec_places),
            lump_sum: self.lump_sum.map(|amt| round(amt, dec_places)),
        }
    }

    /// regular payment plus any lump sum
    pub fn total_paid(&self) -> f64 {
        self.pmt_amount + self.lump_sum.unwrap_or(0.)
    }
}

impl fmt::Display for PaymentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pmt number {}, payment ${:.2}, principal paid ${:.2}, interest paid ${:.2}, ending balance ${:.2}",
            self.pmt_number,
            self.pmt_amount,
            self.pmt_principal_paid,
            self.pmt_interest_paid,
            self.pmt_end_balance
        )?;
        if let Some(lump_sum) = self.lump_sum {
            write!(f, ", lump sum ${:.2}", lump_sum)?;
        }
        Ok(())
    }
}

/// Values carried from one period to the next while a schedule is built.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ScheduleState {
    pub style: RepaymentStyle,
    pub balance: f64,
    pub annual_rate: f64,
    pub periodic_rate: f64,
    /// countdown used by the payment formula, including the current period;
    /// can reach zero or below once a term change shortens the horizon
    pub remaining_periods: i64,
    pub pmt_amount: f64,
    /// fixed principal portion, `EqualPrincipal` only
    pub periodic_principal: f64,
}

impl ScheduleState {
    pub fn new(loan: &LoanParameters) -> Self {
        let periodic_rate = periodic_rate(loan.annual_rate);
        let remaining_periods = i64::from(loan.term_months);
        let periodic_principal = match loan.style {
            RepaymentStyle::EqualPrincipal => loan.principal / remaining_periods as f64,
            RepaymentStyle::EqualPayment => 0.,
        };

        Self {
            style: loan.style,
            balance: loan.principal,
            annual_rate: loan.annual_rate,
            periodic_rate,
            remaining_periods,
            pmt_amount: get_pmt_amount(loan.principal, periodic_rate, remaining_periods, loan.style),
            periodic_principal,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance == 0.
    }

    // recompute the payment (or principal portion) from the current balance,
    // rate and remaining periods
    fn reamortize(&mut self) {
        match self.style {
            RepaymentStyle::EqualPayment => {
                self.pmt_amount = get_pmt_amount(
                    self.balance,
                    self.periodic_rate,
                    self.remaining_periods,
                    self.style,
                );
            }
            RepaymentStyle::EqualPrincipal => {
                self.periodic_principal = self.balance / self.remaining_periods as f64;
            }
        }
        debug!(
            "re-amortized: balance {}, annual rate {}%, {} periods left, payment {}, principal portion {}",
            self.balance,
            self.annual_rate,
            self.remaining_periods,
            self.pmt_amount,
            self.periodic_principal
        );
    }

    /// Charges one period and returns its record.
    ///
    /// Rate and term changes apply before interest is charged. A lump sum comes
    /// off after the regular principal, so it only lowers later interest.
    pub fn step(&mut self, pmt_number: u32, events: &PeriodEvents) -> PaymentRecord {
        if let Some(annual_rate) = events.rate_change {
            self.annual_rate = annual_rate;
            self.periodic_rate = periodic_rate(annual_rate);
        }
        if let Some(remaining_periods) = events.term_change {
            self.remaining_periods = remaining_periods;
        }
        if events.reamortizes() {
            self.reamortize();
        }

        let interest = self.balance * self.periodic_rate;
        let principal = match self.style {
            RepaymentStyle::EqualPrincipal => {
                self.pmt_amount = self.periodic_principal + interest;
                self.periodic_principal
            }
            RepaymentStyle::EqualPayment => self.pmt_amount - interest,
        };
        self.balance = (self.balance - principal).max(0.);

        let lump_sum = events.lump_sum.filter(|amt| *amt > 0.);
        if let Some(amt) = lump_sum {
            self.balance = (self.balance - amt).max(0.);
        }

        let record = PaymentRecord::new(
            pmt_number,
            self.pmt_amount,
            principal,
            interest,
            self.balance,
            lump_sum,
        );
        trace!(
            "Pmt # {}, payment {}, interest {}, principal {}, end bal {}",
            pmt_number,
            self.pmt_amount,
            interest,
            principal,
            self.balance
        );

        if !self.is_paid_off() {
            self.remaining_periods -= 1;
            if lump_sum.is_some() {
                self.reamortize();
            }
        }
        record
    }
}

/// Builds the month-by-month schedule for `loan` with `events` applied.
///
/// `events` need not be sorted. The loop runs at most `term_months` periods and
/// stops early once the balance reaches zero.
pub fn compute_schedule(loan: &LoanParameters, events: &[LoanEvent]) -> Vec<PaymentRecord> {
    let events = sort_by_month(events);
    let mut state = ScheduleState::new(loan);
    let mut schedule = Vec::new();

    for pmt_number in 1..=loan.term_months {
        let start = events.partition_point(|event| event.month < pmt_number);
        let end = events.partition_point(|event| event.month <= pmt_number);
        let period_events = PeriodEvents::collect(pmt_number, &events[start..end]);

        schedule.push(state.step(pmt_number, &period_events));

        if state.is_paid_off() {
            if pmt_number < loan.term_months {
                info!(
                    "loan paid off at pmt # {} of {}",
                    pmt_number, loan.term_months
                );
            }
            break;
        }
    }

    debug!(
        "computed {} payments for {} with {} events",
        schedule.len(),
        loan,
        events.len()
    );
    schedule
}

/// A loan together with its events and computed schedule.
#[derive(Clone, PartialEq, Debug)]
pub struct Amortization {
    pub loan: LoanParameters,
    pub events: Vec<LoanEvent>,
    pub first_pmt_date: Option<NaiveDate>,
    scheduled_pmts: Vec<PaymentRecord>,
}

impl Amortization {
    pub fn new(loan: LoanParameters, events: Vec<LoanEvent>) -> Self {
        let scheduled_pmts = compute_schedule(&loan, &events);
        Self {
            loan,
            events,
            first_pmt_date: None,
            scheduled_pmts,
        }
    }

    pub fn with_first_pmt_date(mut self, first_pmt_date: NaiveDate) -> Self {
        self.first_pmt_date = Some(first_pmt_date);
        self
    }

    pub fn payments(&self) -> &[PaymentRecord] {
        &self.scheduled_pmts
    }

    /// first period's payment
    pub fn get_pmt_amount(&self) -> f64 {
        self.scheduled_pmts.first().map_or(0., |pmt| pmt.pmt_amount)
    }

    pub fn get_pmt_count(&self) -> usize {
        self.scheduled_pmts.len()
    }

    pub fn get_pmt_detail(&self, pmt_number: usize) -> Option<&PaymentRecord> {
        self.scheduled_pmts.get(pmt_number.checked_sub(1)?)
    }

    pub fn get_pmt_date(&self, pmt_number: u32) -> Option<NaiveDate> {
        get_pmt_date(self.first_pmt_date?, pmt_number)
    }

    pub fn get_pmt_info(&self, pmt_number: usize) -> String {
        match self.get_pmt_detail(pmt_number) {
            Some(pmt) => match self.get_pmt_date(pmt.pmt_number) {
                Some(date) => format!("{}: {}", date, pmt),
                None => pmt.to_string(),
            },
            None => "No payment information.".to_string(),
        }
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::from_schedule(&self.scheduled_pmts)
    }

    pub fn show_amortization(&self) {
        for pmt_number in 1..=self.get_pmt_count() {
            println!("{}", self.get_pmt_info(pmt_number));
        }
    }
}
