use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::decimal::{Money, Rate};

/// discounts nominal cash flows back to month zero at a constant inflation rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflationDiscount {
    monthly_rate: Rate,
}

impl InflationDiscount {
    /// build from an annual inflation percentage
    ///
    /// Returns `None` for a non-positive rate (present values are not tracked)
    /// or when the monthly equivalent cannot be represented.
    pub fn from_annual_percent(annual_percent: Decimal) -> Option<Self> {
        if annual_percent <= Decimal::ZERO {
            return None;
        }
        monthly_equivalent(Rate::from_percent(annual_percent))
            .map(|monthly_rate| Self { monthly_rate })
    }

    pub fn monthly_rate(&self) -> Rate {
        self.monthly_rate
    }

    /// `(1 + monthly)^month`
    pub fn factor(&self, month: u32) -> Decimal {
        self.monthly_rate.growth_factor(month)
    }

    /// present value of `amount` paid at the end of `month`
    pub fn discount(&self, amount: Money, month: u32) -> Money {
        amount / self.factor(month)
    }
}

/// monthly rate compounding to the same annual growth: `(1 + annual)^(1/12) - 1`
pub fn monthly_equivalent(annual: Rate) -> Option<Rate> {
    let growth = Decimal::ONE + annual.as_decimal();
    let twelfth = Decimal::ONE / dec!(12);
    growth
        .checked_powd(twelfth)
        .map(|monthly| Rate::from_decimal(monthly - Decimal::ONE))
}
