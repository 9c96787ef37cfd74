//! Checks applied to loan parameters and events before a schedule is built.
//!
//! The schedule engine itself trusts its input; these are the constraints a
//! caller collecting values from a user is expected to enforce.

use crate::error::{LoanError, LoanResult};
use crate::event::{EventKind, LoanEvent};
use crate::loan::LoanParameters;
use std::collections::HashSet;

pub const MAX_ANNUAL_RATE: f64 = 100.;

fn is_valid_rate(rate: f64) -> bool {
    (0.0..=MAX_ANNUAL_RATE).contains(&rate)
}

pub fn validate_params(loan: &LoanParameters) -> LoanResult<()> {
    if !(loan.principal.is_finite() && loan.principal > 0.) {
        return Err(LoanError::InvalidPrincipal(loan.principal));
    }
    if !is_valid_rate(loan.annual_rate) {
        return Err(LoanError::InvalidRate(loan.annual_rate));
    }
    if loan.term_months < 1 {
        return Err(LoanError::InvalidTerm(loan.term_months));
    }
    Ok(())
}

pub fn validate_event(event: &LoanEvent, term_months: u32) -> LoanResult<()> {
    let LoanEvent { kind, month, value } = *event;

    if month < 1 || month > term_months {
        return Err(LoanError::EventMonthOutOfRange { month, term_months });
    }

    match kind {
        EventKind::LumpSum if !(value.is_finite() && value >= 0.) => {
            Err(LoanError::InvalidLumpSum { month, value })
        }
        EventKind::RateChange if !is_valid_rate(value) => {
            Err(LoanError::InvalidRateChange { month, value })
        }
        EventKind::TermChange
            if value.fract() != 0. || value < 1. || value > f64::from(term_months) =>
        {
            Err(LoanError::InvalidTermChange {
                month,
                value,
                term_months,
            })
        }
        _ => Ok(()),
    }
}

/// Validates each event, then rejects two events of the same kind in the same
/// month.
pub fn validate_events(events: &[LoanEvent], term_months: u32) -> LoanResult<()> {
    let mut seen = HashSet::new();
    for event in events {
        validate_event(event, term_months)?;
        if !seen.insert((event.kind, event.month)) {
            return Err(LoanError::DuplicateEvent {
                kind: event.kind,
                month: event.month,
            });
        }
    }
    Ok(())
}

pub fn validate(loan: &LoanParameters, events: &[LoanEvent]) -> LoanResult<()> {
    validate_params(loan)?;
    validate_events(events, loan.term_months)
}

#[cfg(test)]
mod tests {
    use super::{validate, validate_event, validate_events, validate_params};
    use crate::error::LoanError;
    use crate::event::{EventKind, LoanEvent};
    use crate::loan::{LoanParameters, RepaymentStyle};
    use test_log::test;

    #[test]
    fn test_validate_params() {
        assert!(validate_params(&LoanParameters::default()).is_ok());
        assert!(validate_params(&LoanParameters::new(1., 0., 1, RepaymentStyle::EqualPrincipal)).is_ok());
        assert!(validate_params(&LoanParameters::new(1., 100., 1, RepaymentStyle::EqualPayment)).is_ok());

        assert!(matches!(
            validate_params(&LoanParameters::new(0., 4.5, 360, RepaymentStyle::EqualPayment)),
            Err(LoanError::InvalidPrincipal(_))
        ));
        assert!(matches!(
            validate_params(&LoanParameters::new(f64::NAN, 4.5, 360, RepaymentStyle::EqualPayment)),
            Err(LoanError::InvalidPrincipal(_))
        ));
        assert!(matches!(
            validate_params(&LoanParameters::new(1000., -0.5, 360, RepaymentStyle::EqualPayment)),
            Err(LoanError::InvalidRate(_))
        ));
        assert!(matches!(
            validate_params(&LoanParameters::new(1000., 100.5, 360, RepaymentStyle::EqualPayment)),
            Err(LoanError::InvalidRate(_))
        ));
        assert!(matches!(
            validate_params(&LoanParameters::new(1000., 4.5, 0, RepaymentStyle::EqualPayment)),
            Err(LoanError::InvalidTerm(0))
        ));
    }

    #[test]
    fn test_validate_event() {
        assert!(validate_event(&LoanEvent::lump_sum(1, 0.), 360).is_ok());
        assert!(validate_event(&LoanEvent::lump_sum(360, 25000.), 360).is_ok());
        assert!(validate_event(&LoanEvent::rate_change(12, 0.), 360).is_ok());
        assert!(validate_event(&LoanEvent::term_change(12, 360), 360).is_ok());

        assert!(matches!(
            validate_event(&LoanEvent::lump_sum(0, 1000.), 360),
            Err(LoanError::EventMonthOutOfRange { month: 0, term_months: 360 })
        ));
        assert!(matches!(
            validate_event(&LoanEvent::rate_change(361, 5.), 360),
            Err(LoanError::EventMonthOutOfRange { month: 361, .. })
        ));
        assert!(matches!(
            validate_event(&LoanEvent::lump_sum(5, -1.), 360),
            Err(LoanError::InvalidLumpSum { month: 5, .. })
        ));
        assert!(matches!(
            validate_event(&LoanEvent::rate_change(5, 101.), 360),
            Err(LoanError::InvalidRateChange { month: 5, .. })
        ));
        assert!(matches!(
            validate_event(&LoanEvent::new(EventKind::TermChange, 5, 120.5), 360),
            Err(LoanError::InvalidTermChange { .. })
        ));
        assert!(matches!(
            validate_event(&LoanEvent::term_change(5, 0), 360),
            Err(LoanError::InvalidTermChange { .. })
        ));
        assert!(matches!(
            validate_event(&LoanEvent::term_change(5, 361), 360),
            Err(LoanError::InvalidTermChange { .. })
        ));
    }

    #[test]
    fn test_duplicate_events_rejected() {
        let events = [
            LoanEvent::lump_sum(12, 1000.),
            LoanEvent::rate_change(12, 3.),
            LoanEvent::term_change(12, 200),
        ];
        assert!(validate_events(&events, 360).is_ok());

        let events = [
            LoanEvent::lump_sum(12, 1000.),
            LoanEvent::rate_change(24, 3.),
            LoanEvent::lump_sum(12, 500.),
        ];
        let err = validate_events(&events, 360).unwrap_err();
        assert!(matches!(
            err,
            LoanError::DuplicateEvent { kind: EventKind::LumpSum, month: 12 }
        ));
        assert_eq!(err.to_string(), "More than one lump sum event in month 12");
    }

    #[test]
    fn test_validate() {
        let loan = LoanParameters::new(300000., 5., 120, RepaymentStyle::EqualPayment);
        assert!(validate(&loan, &[LoanEvent::rate_change(60, 6.)]).is_ok());

        let err = validate(&loan, &[LoanEvent::lump_sum(121, 100.)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Event month 121 is outside the loan term (1 to 120)"
        );
    }
}
