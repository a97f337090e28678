use serde::{Deserialize, Serialize};
use std::fmt;

/// identifier carried from a loan configuration into its result
pub type LoanId = String;

/// marker attached to a schedule row describing what shaped it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScheduleNote {
    /// down payment taken out of principal before month 1
    FirstPayment,
    /// installment produced by a grace strategy override
    Grace,
    /// extra principal applied on top of the installment
    Prepayment,
}

impl ScheduleNote {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleNote::FirstPayment => "firstPayment",
            ScheduleNote::Grace => "grace",
            ScheduleNote::Prepayment => "prepayment",
        }
    }
}

impl fmt::Display for ScheduleNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// pipe-joined notes as rendered in tabular exports
pub fn join_notes(notes: &[ScheduleNote]) -> String {
    notes
        .iter()
        .map(ScheduleNote::as_str)
        .collect::<Vec<_>>()
        .join("|")
}
