use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};

/// display policy for a currency: ISO code plus minor-unit scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Currency {
    code: &'static str,
    scale: u32,
}

impl Currency {
    pub const USD: Currency = Currency { code: "USD", scale: 2 };
    pub const EUR: Currency = Currency { code: "EUR", scale: 2 };
    pub const BYN: Currency = Currency { code: "BYN", scale: 2 };
    pub const GBP: Currency = Currency { code: "GBP", scale: 2 };
    pub const JPY: Currency = Currency { code: "JPY", scale: 0 };

    /// every currency the engine knows how to round
    pub const CATALOG: [Currency; 5] = [
        Currency::USD,
        Currency::EUR,
        Currency::BYN,
        Currency::GBP,
        Currency::JPY,
    ];

    /// look up a catalog currency by code (case-insensitive)
    pub fn from_code(code: &str) -> Result<Self> {
        Self::CATALOG
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
            .copied()
            .ok_or_else(|| ScheduleError::UnknownCurrency {
                code: code.to_string(),
            })
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// decimal places of the minor unit
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// round half-up to the minor unit
    pub fn round(&self, amount: Money) -> Money {
        amount.round_to(self.scale)
    }

    /// rounded amount as a display string
    pub fn format(&self, amount: Money) -> String {
        self.round(amount).to_string()
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl FromStr for Currency {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Currency::from_code(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = ScheduleError;

    fn try_from(code: String) -> Result<Self> {
        Currency::from_code(&code)
    }
}

// resolved through the catalog
impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::try_from(code).map_err(serde::de::Error::custom)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code.to_string()
    }
}
