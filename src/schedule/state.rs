use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// smallest and largest installment seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentRange {
    pub min: Money,
    pub max: Money,
}

impl InstallmentRange {
    pub fn single(value: Money) -> Self {
        Self { min: value, max: value }
    }

    pub fn include(self, value: Money) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }
}

/// widen an optional range, starting it on the first value
pub fn track(range: Option<InstallmentRange>, value: Money) -> Option<InstallmentRange> {
    Some(match range {
        Some(r) => r.include(value),
        None => InstallmentRange::single(value),
    })
}

/// what carries from one month to the next, at full precision
///
/// Each month consumes one state and yields a fresh one; nothing is mutated in
/// place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleState {
    pub remaining: Money,
    pub installments: Option<InstallmentRange>,
    pub installments_pv: Option<InstallmentRange>,
}

impl ScheduleState {
    /// state before month 1
    pub fn opening(principal: Money) -> Self {
        Self {
            remaining: principal,
            installments: None,
            installments_pv: None,
        }
    }

    /// carry forward after a month settled
    pub fn advance(&self, remaining: Money, installment: Money, installment_pv: Option<Money>) -> Self {
        Self {
            remaining,
            installments: track(self.installments, installment),
            installments_pv: match installment_pv {
                Some(pv) => track(self.installments_pv, pv),
                None => self.installments_pv,
            },
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.remaining.is_settled()
    }
}
