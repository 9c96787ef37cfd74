pub mod error;
pub mod event;
pub mod impact;
pub mod loan;
#[cfg(feature = "serde")]
pub mod scenario;
pub mod schedule;
pub mod summary;
pub mod validate;

pub use error::{LoanError, LoanResult};
pub use event::{EventKind, LoanEvent};
pub use loan::{LoanParameters, RepaymentStyle};
pub use schedule::{compute_schedule, Amortization, PaymentRecord};

#[cfg(test)]
mod tests {
    use super::*;

    // verifies that types can implement the gated traits below
    fn is_normal<T: Sized + Send + Sync + Unpin>() {}

    #[test]
    fn normal_types() {
        is_normal::<PaymentRecord>();
        is_normal::<LoanEvent>();
        is_normal::<LoanParameters>();
        is_normal::<Amortization>();
        is_normal::<LoanError>();
    }
}
