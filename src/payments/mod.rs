pub mod amortization;
pub mod grace;
pub mod prepayment;

pub use amortization::{annuity_installment, AmortizationContext, AmortizationMethod};
pub use grace::{GraceContext, GraceInstallment, GracePeriod};
pub use prepayment::{
    MonthSelector, PrepaymentAmount, PrepaymentContext, PrepaymentEvent, PrepaymentOutcome,
    PrepaymentPlan, PrepaymentPolicy,
};
