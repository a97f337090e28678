pub mod day_count;
pub mod inflation;

use rust_decimal::Decimal;

use crate::decimal::Rate;

pub use day_count::{DayCountContext, DayCountConvention, DEFAULT_COMPOUNDING_PER_YEAR};
pub use inflation::{monthly_equivalent, InflationDiscount};

/// periodic rate the generator uses for one month
pub fn periodic_rate(
    day_count: DayCountConvention,
    annual_rate_percent: Decimal,
    month_index: u32,
    ctx: &DayCountContext,
) -> Rate {
    day_count.periodic_rate(annual_rate_percent, month_index, ctx)
}
