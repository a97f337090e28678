pub mod generator;
pub mod state;

use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{LoanId, ScheduleNote};

pub use generator::{compute_loan, MonthOutcome, ScheduleGenerator};
pub use state::{InstallmentRange, ScheduleState};

/// one simulated month, money fields rounded to the currency scale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month_index: u32,
    pub installment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_principal: Money,
    pub periodic_rate: Rate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<ScheduleNote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_pv: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_portion_pv: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_portion_pv: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_principal_pv: Option<Money>,
}

impl ScheduleRow {
    pub fn has_note(&self, note: ScheduleNote) -> bool {
        self.notes.contains(&note)
    }

    pub fn has_present_values(&self) -> bool {
        self.installment_pv.is_some()
    }
}

/// aggregates over a finished schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub total_paid: Money,
    pub total_interest: Money,
    pub max_installment: Money,
    pub min_installment: Money,
    /// equals the number of rows
    pub payoff_month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_paid_pv: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_interest_pv: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_installment_pv: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_installment_pv: Option<Money>,
}

/// schedule plus aggregates for one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LoanId>,
    pub currency: String,
    pub schedule: Vec<ScheduleRow>,
    pub summary: LoanSummary,
}

impl LoanResult {
    pub fn payoff_month(&self) -> u32 {
        self.summary.payoff_month
    }

    pub fn last_row(&self) -> Option<&ScheduleRow> {
        self.schedule.last()
    }

    pub fn has_present_values(&self) -> bool {
        self.schedule.first().map_or(false, ScheduleRow::has_present_values)
    }

    /// sum of principal portions, prepayments included
    pub fn total_principal(&self) -> Money {
        self.schedule.iter().map(|r| r.principal_portion).sum()
    }
}
