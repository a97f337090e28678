use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::interest::{DayCountContext, DayCountConvention};
use crate::payments::{AmortizationMethod, GracePeriod, PrepaymentEvent, PrepaymentPolicy};
use crate::types::LoanId;

/// down payment taken from principal before month 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FirstPayment {
    /// percent of the original principal (0-100)
    Percent { value: Decimal },
    /// literal amount in currency units
    Absolute { value: Money },
}

impl FirstPayment {
    /// amount taken out of `principal`
    pub fn resolve(&self, principal: Money) -> Money {
        match *self {
            FirstPayment::Percent { value } => principal.percentage(value),
            FirstPayment::Absolute { value } => value,
        }
    }
}

/// everything one schedule computation needs
///
/// Inputs are assumed to be validated upstream; nothing here range-checks
/// principal, rate or term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LoanId>,
    #[serde(default)]
    pub currency: Currency,
    pub principal: Money,
    pub nominal_annual_rate_percent: Decimal,
    pub term_months: u32,
    #[serde(default)]
    pub amortization: AmortizationMethod,
    pub day_count: DayCountConvention,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compounding_per_year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace: Option<GracePeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment: Option<FirstPayment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prepayments: Vec<PrepaymentEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment_policy: Option<PrepaymentPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_inflation_rate_percent: Option<Decimal>,
}

impl LoanConfiguration {
    pub fn builder() -> LoanConfigurationBuilder {
        LoanConfigurationBuilder::new()
    }

    /// plain annuity loan on 30E/360 with no extras
    pub fn annuity(currency: Currency, principal: Money, rate_percent: Decimal, term_months: u32) -> Self {
        Self {
            id: None,
            currency,
            principal,
            nominal_annual_rate_percent: rate_percent,
            term_months,
            amortization: AmortizationMethod::Annuity,
            day_count: DayCountConvention::Thirty360E,
            compounding_per_year: None,
            start_date: None,
            grace: None,
            first_payment: None,
            prepayments: Vec::new(),
            prepayment_policy: None,
            annual_inflation_rate_percent: None,
        }
    }

    /// load from json
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// calendar context for the day count convention
    pub fn day_count_context(&self) -> DayCountContext {
        DayCountContext::new(self.start_date, self.compounding_per_year)
    }

    /// configured policy or ReduceTerm
    pub fn effective_prepayment_policy(&self) -> PrepaymentPolicy {
        self.prepayment_policy.unwrap_or_default()
    }

    /// first payment amount, zero when none is configured
    pub fn first_payment_amount(&self) -> Money {
        self.first_payment
            .map(|fp| fp.resolve(self.principal))
            .unwrap_or(Money::ZERO)
    }
}

/// builder for loan configurations
#[derive(Debug, Clone, Default)]
pub struct LoanConfigurationBuilder {
    id: Option<LoanId>,
    currency: Option<Currency>,
    principal: Option<Money>,
    rate_percent: Option<Decimal>,
    term_months: Option<u32>,
    amortization: Option<AmortizationMethod>,
    day_count: Option<DayCountConvention>,
    compounding_per_year: Option<u32>,
    start_date: Option<NaiveDate>,
    grace: Option<GracePeriod>,
    first_payment: Option<FirstPayment>,
    prepayments: Vec<PrepaymentEvent>,
    prepayment_policy: Option<PrepaymentPolicy>,
    inflation_percent: Option<Decimal>,
}

impl LoanConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<LoanId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    /// nominal annual rate in percent (9.5 for 9.5%)
    pub fn rate_percent(mut self, rate: Decimal) -> Self {
        self.rate_percent = Some(rate);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn amortization(mut self, method: AmortizationMethod) -> Self {
        self.amortization = Some(method);
        self
    }

    pub fn day_count(mut self, convention: DayCountConvention) -> Self {
        self.day_count = Some(convention);
        self
    }

    pub fn compounding_per_year(mut self, periods: u32) -> Self {
        self.compounding_per_year = Some(periods);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn grace(mut self, grace: GracePeriod) -> Self {
        self.grace = Some(grace);
        self
    }

    pub fn first_payment(mut self, first_payment: FirstPayment) -> Self {
        self.first_payment = Some(first_payment);
        self
    }

    pub fn prepayment(mut self, event: PrepaymentEvent) -> Self {
        self.prepayments.push(event);
        self
    }

    pub fn prepayments(mut self, events: impl IntoIterator<Item = PrepaymentEvent>) -> Self {
        self.prepayments.extend(events);
        self
    }

    pub fn prepayment_policy(mut self, policy: PrepaymentPolicy) -> Self {
        self.prepayment_policy = Some(policy);
        self
    }

    /// annual inflation in percent, enables present values
    pub fn inflation_percent(mut self, rate: Decimal) -> Self {
        self.inflation_percent = Some(rate);
        self
    }

    pub fn build(self) -> Result<LoanConfiguration> {
        let principal = self.principal.ok_or(ScheduleError::InvalidConfiguration {
            message: "Principal required".to_string(),
        })?;

        let rate = self.rate_percent.ok_or(ScheduleError::InvalidConfiguration {
            message: "Rate required".to_string(),
        })?;

        let term = self.term_months.ok_or(ScheduleError::InvalidConfiguration {
            message: "Term required".to_string(),
        })?;

        Ok(LoanConfiguration {
            id: self.id,
            currency: self.currency.unwrap_or_default(),
            principal,
            nominal_annual_rate_percent: rate,
            term_months: term,
            amortization: self.amortization.unwrap_or_default(),
            day_count: self.day_count.unwrap_or(DayCountConvention::Thirty360E),
            compounding_per_year: self.compounding_per_year,
            start_date: self.start_date,
            grace: self.grace,
            first_payment: self.first_payment,
            prepayments: self.prepayments,
            prepayment_policy: self.prepayment_policy,
            annual_inflation_rate_percent: self.inflation_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::MonthSelector;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder_defaults() {
        let config = LoanConfiguration::builder()
            .principal(Money::from_major(10_000))
            .rate_percent(dec!(8))
            .term_months(12)
            .build()
            .unwrap();

        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.amortization, AmortizationMethod::Annuity);
        assert_eq!(config.day_count, DayCountConvention::Thirty360E);
        assert_eq!(config.effective_prepayment_policy(), PrepaymentPolicy::ReduceTerm);
        assert_eq!(config.day_count_context().compounding_per_year, 12);
        assert_eq!(config.first_payment_amount(), Money::ZERO);
    }

    #[test]
    fn test_builder_requires_core_terms() {
        let missing_rate = LoanConfiguration::builder()
            .principal(Money::from_major(10_000))
            .term_months(12)
            .build();
        assert!(matches!(missing_rate, Err(ScheduleError::InvalidConfiguration { .. })));

        let missing_principal = LoanConfiguration::builder().rate_percent(dec!(5)).term_months(12).build();
        assert!(missing_principal.is_err());
    }

    #[test]
    fn test_first_payment_resolution() {
        let principal = Money::from_major(20_000);
        assert_eq!(
            FirstPayment::Percent { value: dec!(15) }.resolve(principal),
            Money::from_major(3_000)
        );
        assert_eq!(
            FirstPayment::Absolute { value: Money::from_major(2_500) }.resolve(principal),
            Money::from_major(2_500)
        );
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "id": "byn-mortgage",
            "currency": "BYN",
            "principal": "150000",
            "nominal_annual_rate_percent": "18.11",
            "term_months": 240,
            "amortization": "Differentiated",
            "day_count": "Actual_365",
            "start_date": "2025-03-01",
            "grace": {"type": "ReducedRate", "months": 12, "reduced_annual_rate_percent": "4.22"},
            "first_payment": {"type": "Percent", "value": "10"},
            "prepayments": [{"months": {"month": 6}, "amount": {"type": "Amount", "amount": "500"}}],
            "prepayment_policy": "ReduceInstallment",
            "annual_inflation_rate_percent": "6"
        }"#;
        let config = LoanConfiguration::from_json(json).unwrap();

        assert_eq!(config.id.as_deref(), Some("byn-mortgage"));
        assert_eq!(config.currency, Currency::BYN);
        assert_eq!(config.nominal_annual_rate_percent, dec!(18.11));
        assert_eq!(config.amortization, AmortizationMethod::Differentiated);
        assert_eq!(config.day_count, DayCountConvention::Actual365);
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(config.grace, Some(GracePeriod::reduced_rate(12, dec!(4.22))));
        assert_eq!(config.first_payment_amount(), Money::from_major(15_000));
        assert_eq!(config.prepayments[0].months, MonthSelector::Single { month: 6 });
        assert_eq!(config.effective_prepayment_policy(), PrepaymentPolicy::ReduceInstallment);
    }

    #[test]
    fn test_from_json_rejects_unknown_ids() {
        let json = r#"{"principal": "1000", "nominal_annual_rate_percent": "5",
                       "term_months": 12, "day_count": "30/360"}"#;
        assert!(matches!(LoanConfiguration::from_json(json), Err(ScheduleError::Json(_))));
    }
}
