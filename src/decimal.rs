use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// balance at or below this is treated as paid off
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 8);

/// half-up, applied only when a value is finalized for display
pub const DISPLAY_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

pub const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// money amount carried at full working precision
///
/// Arithmetic never rounds; rounding to a currency's minor unit happens only
/// through [`Money::round_to`] when a row or aggregate is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str_exact(s)?))
    }

    /// create from integer amount (dollars, euros, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round half-up to `scale` places and pad to exactly that many digits
    pub fn round_to(&self, scale: u32) -> Self {
        let mut rounded = self.0.round_dp_with_strategy(scale, DISPLAY_ROUNDING);
        rounded.rescale(scale);
        Money(rounded)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// at or below [`EPSILON`]
    pub fn is_settled(&self) -> bool {
        self.0 <= EPSILON
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// clamp into `[low, high]`; `low` wins if the bounds cross
    pub fn clamp_between(self, low: Self, high: Self) -> Self {
        self.min(high).max(low)
    }

    /// calculate percentage (e.g., 5% of $100)
    pub fn percentage(&self, percent: Decimal) -> Self {
        Money(self.0 * percent / ONE_HUNDRED)
    }

    /// multiply by a rate, returning `None` on overflow
    pub fn checked_mul_rate(&self, rate: Rate) -> Option<Self> {
        self.0.checked_mul(rate.as_decimal()).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(self.0 * other)
    }
}

impl Mul<Rate> for Money {
    type Output = Money;

    fn mul(self, rate: Rate) -> Money {
        Money(self.0 * rate.as_decimal())
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money(self.0 / other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

/// rate type for interest rates expressed as a fraction (0.01 for 1%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 9.5 for 9.5%)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p / ONE_HUNDRED)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * ONE_HUNDRED
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `(1 + self)^n`
    pub fn growth_factor(&self, n: u32) -> Decimal {
        pow1p(self.0, n)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

/// `(1 + rate)^n` without leaving decimal arithmetic
pub fn pow1p(rate: Decimal, n: u32) -> Decimal {
    let base = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for _ in 0..n {
        factor *= base;
    }
    factor
}
