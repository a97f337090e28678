use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::decimal::Rate;
use crate::errors::{Result, ScheduleError};

/// compounding periods per year when nothing else is configured
pub const DEFAULT_COMPOUNDING_PER_YEAR: u32 = 12;

/// calendar inputs shared by every month of one computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCountContext {
    pub start_date: Option<NaiveDate>,
    pub compounding_per_year: u32,
}

impl DayCountContext {
    pub fn new(start_date: Option<NaiveDate>, compounding_per_year: Option<u32>) -> Self {
        Self {
            start_date,
            compounding_per_year: compounding_per_year.unwrap_or(DEFAULT_COMPOUNDING_PER_YEAR),
        }
    }

    /// calendar (year, month) that schedule month `month_index` falls in
    pub fn calendar_month(&self, month_index: u32) -> Option<(i32, u32)> {
        self.start_date.map(|start| {
            let offset = start.month0() as i64 + month_index as i64 - 1;
            let year = start.year() + offset.div_euclid(12) as i32;
            let month = offset.rem_euclid(12) as u32 + 1;
            (year, month)
        })
    }
}

impl Default for DayCountContext {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// day count convention for turning an annual rate into a monthly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// every month is 30 days of a 360 day year
    #[serde(rename = "30E_360")]
    Thirty360E,
    /// actual days in the month over 365
    #[serde(rename = "Actual_365")]
    Actual365,
    /// actual days in the month over 365 or 366
    #[serde(rename = "Actual_Actual")]
    ActualActual,
}

impl DayCountConvention {
    pub const ALL: [DayCountConvention; 3] = [
        DayCountConvention::Thirty360E,
        DayCountConvention::Actual365,
        DayCountConvention::ActualActual,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            DayCountConvention::Thirty360E => "30E_360",
            DayCountConvention::Actual365 => "Actual_365",
            DayCountConvention::ActualActual => "Actual_Actual",
        }
    }

    /// periodic rate for schedule month `month_index`
    ///
    /// Calendar-aware conventions fall back to annual/12 when the context has
    /// no start date.
    pub fn periodic_rate(
        &self,
        annual_rate_percent: Decimal,
        month_index: u32,
        ctx: &DayCountContext,
    ) -> Rate {
        let annual = Rate::from_percent(annual_rate_percent).as_decimal();
        if annual.is_zero() {
            return Rate::ZERO;
        }

        match self {
            DayCountConvention::Thirty360E => {
                let periods = match ctx.compounding_per_year {
                    0 => DEFAULT_COMPOUNDING_PER_YEAR,
                    n => n,
                };
                Rate::from_decimal(annual / Decimal::from(periods))
            }
            DayCountConvention::Actual365 => match ctx.calendar_month(month_index) {
                Some((year, month)) => {
                    let days = Decimal::from(days_in_month(year, month));
                    Rate::from_decimal(annual * days / dec!(365))
                }
                None => Rate::from_decimal(annual / dec!(12)),
            },
            DayCountConvention::ActualActual => match ctx.calendar_month(month_index) {
                Some((year, month)) => {
                    let days = Decimal::from(days_in_month(year, month));
                    let year_days = if is_leap_year(year) { dec!(366) } else { dec!(365) };
                    Rate::from_decimal(annual * days / year_days)
                }
                None => Rate::from_decimal(annual / dec!(12)),
            },
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DayCountConvention {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|dc| dc.id() == s)
            .ok_or_else(|| ScheduleError::UnknownStrategy {
                family: "day count",
                id: s.to_string(),
            })
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// check if year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_from(year: i32, month: u32, day: u32) -> DayCountContext {
        DayCountContext::new(NaiveDate::from_ymd_opt(year, month, day), None)
    }

    #[test]
    fn test_thirty_360_ignores_calendar() {
        let ctx = ctx_from(2024, 2, 1);
        for month in [1, 2, 13] {
            let rate = DayCountConvention::Thirty360E.periodic_rate(dec!(12), month, &ctx);
            assert_eq!(rate.as_decimal(), dec!(0.01));
        }
    }

    #[test]
    fn test_thirty_360_uses_compounding_periods() {
        let ctx = DayCountContext::new(None, Some(4));
        let rate = DayCountConvention::Thirty360E.periodic_rate(dec!(12), 1, &ctx);
        assert_eq!(rate.as_decimal(), dec!(0.03));
    }

    #[test]
    fn test_actual_365_prorates_by_days() {
        let ctx = ctx_from(2024, 1, 1);

        let january = DayCountConvention::Actual365.periodic_rate(dec!(12), 1, &ctx);
        assert_eq!(january.as_decimal(), dec!(0.12) * dec!(31) / dec!(365));

        let february = DayCountConvention::Actual365.periodic_rate(dec!(12), 2, &ctx);
        assert_eq!(february.as_decimal(), dec!(0.12) * dec!(29) / dec!(365));
    }

    #[test]
    fn test_actual_actual_uses_leap_year_basis() {
        let ctx = ctx_from(2024, 1, 15);

        let february = DayCountConvention::ActualActual.periodic_rate(dec!(12), 2, &ctx);
        assert_eq!(february.as_decimal(), dec!(0.12) * dec!(29) / dec!(366));

        // month 13 lands in january 2025
        let next_january = DayCountConvention::ActualActual.periodic_rate(dec!(12), 13, &ctx);
        assert_eq!(next_january.as_decimal(), dec!(0.12) * dec!(31) / dec!(365));
    }

    #[test]
    fn test_calendar_conventions_fall_back_without_start_date() {
        let ctx = DayCountContext::default();
        for dc in [DayCountConvention::Actual365, DayCountConvention::ActualActual] {
            assert_eq!(dc.periodic_rate(dec!(12), 7, &ctx).as_decimal(), dec!(0.01));
        }
    }

    #[test]
    fn test_zero_rate_is_zero_everywhere() {
        let ctx = ctx_from(2023, 6, 1);
        for dc in DayCountConvention::ALL {
            assert!(dc.periodic_rate(Decimal::ZERO, 3, &ctx).is_zero());
        }
    }

    #[test]
    fn test_calendar_month_rolls_over_years() {
        let ctx = ctx_from(2023, 11, 30);
        assert_eq!(ctx.calendar_month(1), Some((2023, 11)));
        assert_eq!(ctx.calendar_month(3), Some((2024, 1)));
        assert_eq!(ctx.calendar_month(27), Some((2026, 1)));
        assert_eq!(DayCountContext::default().calendar_month(1), None);
    }

    #[test]
    fn test_ids_round_trip() {
        for dc in DayCountConvention::ALL {
            assert_eq!(dc.id().parse::<DayCountConvention>().unwrap(), dc);
            assert_eq!(serde_json::to_string(&dc).unwrap(), format!("\"{}\"", dc.id()));
        }
        assert!("30/360".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
    }
}
