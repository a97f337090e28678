use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// per-month inputs to a grace installment override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraceContext {
    pub month_index: u32,
    pub periodic_rate: Rate,
    pub remaining_principal: Money,
}

/// installment breakdown dictated by a grace strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraceInstallment {
    pub installment: Money,
    pub interest: Money,
    pub principal: Money,
}

/// modified payment behavior for the leading `months` of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GracePeriod {
    /// pay interest only, principal untouched
    InterestOnly { months: u32 },
    /// amortize normally at a reduced nominal rate
    ReducedRate {
        months: u32,
        reduced_annual_rate_percent: Decimal,
    },
}

impl GracePeriod {
    pub fn interest_only(months: u32) -> Self {
        GracePeriod::InterestOnly { months }
    }

    pub fn reduced_rate(months: u32, reduced_annual_rate_percent: Decimal) -> Self {
        GracePeriod::ReducedRate {
            months,
            reduced_annual_rate_percent,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            GracePeriod::InterestOnly { .. } => "InterestOnly",
            GracePeriod::ReducedRate { .. } => "ReducedRate",
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            GracePeriod::InterestOnly { months } | GracePeriod::ReducedRate { months, .. } => *months,
        }
    }

    /// months `1..=months` are in grace
    pub fn covers(&self, month_index: u32) -> bool {
        month_index >= 1 && month_index <= self.months()
    }

    /// annual rate (percent) to use instead of the nominal one
    pub fn override_annual_rate(&self, _nominal_percent: Decimal, _month_index: u32) -> Option<Decimal> {
        match self {
            GracePeriod::InterestOnly { .. } => None,
            GracePeriod::ReducedRate {
                reduced_annual_rate_percent,
                ..
            } => Some(*reduced_annual_rate_percent),
        }
    }

    /// whether this strategy replaces the whole installment while in grace
    pub fn overrides_installment(&self) -> bool {
        matches!(self, GracePeriod::InterestOnly { .. })
    }

    /// installment replacement for an in-grace month
    ///
    /// A strategy that [`overrides_installment`](Self::overrides_installment)
    /// must return `Some` for every covered month; `None` there means it could
    /// not honor that and the computation has to stop.
    pub fn override_installment(&self, ctx: &GraceContext) -> Option<GraceInstallment> {
        match self {
            GracePeriod::InterestOnly { .. } => {
                let interest = ctx.remaining_principal.checked_mul_rate(ctx.periodic_rate)?;
                Some(GraceInstallment {
                    installment: interest,
                    interest,
                    principal: Money::ZERO,
                })
            }
            GracePeriod::ReducedRate { .. } => None,
        }
    }
}
