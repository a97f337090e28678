use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// per-month inputs to an amortization method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmortizationContext {
    pub month_index: u32,
    pub periodic_rate: Rate,
    /// months left including the current one
    pub remaining_months: u32,
}

/// how an installment is split between interest and principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AmortizationMethod {
    /// level payment over the remaining term
    #[default]
    Annuity,
    /// equal principal each month plus interest on the balance
    Differentiated,
}

impl AmortizationMethod {
    pub const ALL: [AmortizationMethod; 2] =
        [AmortizationMethod::Annuity, AmortizationMethod::Differentiated];

    pub fn id(&self) -> &'static str {
        match self {
            AmortizationMethod::Annuity => "Annuity",
            AmortizationMethod::Differentiated => "Differentiated",
        }
    }

    /// total installment due this month on `remaining_principal` (balance at month start)
    pub fn compute_installment(&self, remaining_principal: Money, ctx: &AmortizationContext) -> Money {
        if ctx.remaining_months == 0 {
            return Money::ZERO;
        }

        match self {
            AmortizationMethod::Annuity => {
                annuity_installment(remaining_principal, ctx.periodic_rate, ctx.remaining_months)
            }
            AmortizationMethod::Differentiated => {
                let principal = equal_principal(remaining_principal, ctx.remaining_months);
                principal + remaining_principal * ctx.periodic_rate
            }
        }
    }

    /// principal part of `installment`
    pub fn compute_principal_portion(
        &self,
        installment: Money,
        remaining_principal: Money,
        ctx: &AmortizationContext,
    ) -> Money {
        match self {
            AmortizationMethod::Annuity => installment - remaining_principal * ctx.periodic_rate,
            AmortizationMethod::Differentiated => {
                equal_principal(remaining_principal, ctx.remaining_months)
            }
        }
    }
}

impl fmt::Display for AmortizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AmortizationMethod {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| ScheduleError::UnknownStrategy {
                family: "amortization",
                id: s.to_string(),
            })
    }
}

/// level payment: `P * r * (1 + r)^n / ((1 + r)^n - 1)`, or `P / n` at zero rate
pub fn annuity_installment(principal: Money, periodic_rate: Rate, months: u32) -> Money {
    if months == 0 {
        return Money::ZERO;
    }

    if periodic_rate.is_zero() {
        return principal / Decimal::from(months);
    }

    let compound = periodic_rate.growth_factor(months);
    let numerator = principal.as_decimal() * periodic_rate.as_decimal() * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}

fn equal_principal(remaining_principal: Money, remaining_months: u32) -> Money {
    if remaining_months == 0 {
        return Money::ZERO;
    }
    remaining_principal / Decimal::from(remaining_months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ctx(rate: Decimal, remaining_months: u32) -> AmortizationContext {
        AmortizationContext {
            month_index: 1,
            periodic_rate: Rate::from_decimal(rate),
            remaining_months,
        }
    }

    #[test]
    fn test_annuity_installment() {
        let installment = AmortizationMethod::Annuity
            .compute_installment(Money::from_major(1_000), &ctx(dec!(0.01), 12));
        assert_eq!(installment.round_to(2).to_string(), "88.85");
    }

    #[test]
    fn test_annuity_zero_rate() {
        let installment = AmortizationMethod::Annuity
            .compute_installment(Money::from_major(12_000), &ctx(Decimal::ZERO, 12));
        assert_eq!(installment, Money::from_major(1_000));
    }

    #[test]
    fn test_annuity_last_month_clears_balance() {
        let remaining = Money::from_major(500);
        let context = ctx(dec!(0.01), 1);
        let installment = AmortizationMethod::Annuity.compute_installment(remaining, &context);
        assert_eq!(installment, Money::from_major(505));

        let principal = AmortizationMethod::Annuity
            .compute_principal_portion(installment, remaining, &context);
        assert_eq!(principal, remaining);
    }

    #[test]
    fn test_differentiated_installment() {
        let remaining = Money::from_major(12_000);
        let context = ctx(dec!(0.01), 12);

        let installment = AmortizationMethod::Differentiated.compute_installment(remaining, &context);
        assert_eq!(installment, Money::from_major(1_120));

        let principal = AmortizationMethod::Differentiated
            .compute_principal_portion(installment, remaining, &context);
        assert_eq!(principal, Money::from_major(1_000));
    }

    #[test]
    fn test_no_remaining_months_yields_zero() {
        for method in AmortizationMethod::ALL {
            let installment = method.compute_installment(Money::from_major(1_000), &ctx(dec!(0.01), 0));
            assert_eq!(installment, Money::ZERO);
        }
    }

    #[test]
    fn test_ids_round_trip() {
        for method in AmortizationMethod::ALL {
            assert_eq!(method.id().parse::<AmortizationMethod>().unwrap(), method);
        }
        assert!(matches!(
            "Balloon".parse::<AmortizationMethod>(),
            Err(ScheduleError::UnknownStrategy { family: "amortization", .. })
        ));
    }
}
