use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// which schedule months an event fires in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthSelector {
    Single {
        month: u32,
    },
    Range {
        start: u32,
        end: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<u32>,
    },
}

impl MonthSelector {
    /// months this selector hits inside `[1, term_months]`, ascending
    pub fn months(&self, term_months: u32) -> Vec<u32> {
        match *self {
            MonthSelector::Single { month } => {
                if month >= 1 && month <= term_months {
                    vec![month]
                } else {
                    Vec::new()
                }
            }
            MonthSelector::Range { start, end, step } => {
                // a zero step would never advance
                let step = step.unwrap_or(1).max(1) as usize;
                let last = end.min(term_months);
                (start.max(1)..=last)
                    .filter(|m| (m - start) as usize % step == 0)
                    .collect()
            }
        }
    }
}

/// how an event's extra principal is sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PrepaymentAmount {
    /// literal extra principal
    Amount { amount: Money },
    /// pay the balance down to `principal`
    TargetPrincipal { principal: Money },
    /// percent of the month's base installment
    ExtraInstallmentPercent { percent: Decimal },
}

/// an extra principal payment scheduled on one or more months
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepaymentEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub months: MonthSelector,
    pub amount: PrepaymentAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_override: Option<PrepaymentPolicy>,
}

impl PrepaymentEvent {
    pub fn new(months: MonthSelector, amount: PrepaymentAmount) -> Self {
        Self {
            id: None,
            months,
            amount,
            policy_override: None,
        }
    }

    /// literal amount in a single month
    pub fn single(month: u32, amount: Money) -> Self {
        Self::new(MonthSelector::Single { month }, PrepaymentAmount::Amount { amount })
    }

    pub fn with_policy(mut self, policy: PrepaymentPolicy) -> Self {
        self.policy_override = Some(policy);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// extra principal this event asks for, never negative
    ///
    /// `base_installment` is the month's installment before any prepayment and
    /// `current_remaining` the balance at the start of the month.
    pub fn resolve_extra(&self, base_installment: Money, current_remaining: Money) -> Money {
        let extra = match self.amount {
            PrepaymentAmount::Amount { amount } => amount,
            PrepaymentAmount::TargetPrincipal { principal } => current_remaining - principal,
            PrepaymentAmount::ExtraInstallmentPercent { percent } => {
                base_installment.percentage(percent)
            }
        };
        extra.max(Money::ZERO)
    }

    /// policy in force for this event given the configuration default
    pub fn effective_policy(&self, default: PrepaymentPolicy) -> PrepaymentPolicy {
        self.policy_override.unwrap_or(default)
    }
}

/// month -> events multimap built once before the simulation
#[derive(Debug, Clone, Default)]
pub struct PrepaymentPlan<'a> {
    by_month: BTreeMap<u32, Vec<&'a PrepaymentEvent>>,
}

impl<'a> PrepaymentPlan<'a> {
    /// expand every selector, clipped to `[1, term_months]`
    pub fn expand(events: &'a [PrepaymentEvent], term_months: u32) -> Self {
        let mut by_month: BTreeMap<u32, Vec<&'a PrepaymentEvent>> = BTreeMap::new();
        for event in events {
            for month in event.months.months(term_months) {
                by_month.entry(month).or_default().push(event);
            }
        }
        Self { by_month }
    }

    pub fn events_for(&self, month: u32) -> &[&'a PrepaymentEvent] {
        self.by_month.get(&month).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// state handed to a prepayment policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepaymentContext {
    pub month_index: u32,
    /// base installment of the month, before prepayment
    pub installment: Money,
    pub periodic_rate: Rate,
    /// balance after the month's scheduled principal
    pub remaining_principal: Money,
    pub remaining_months: u32,
}

/// what a policy did with an extra payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepaymentOutcome {
    pub new_remaining_principal: Money,
    pub recompute_installment: bool,
}

/// how extra principal affects the rest of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PrepaymentPolicy {
    /// keep the installment, finish earlier
    #[default]
    ReduceTerm,
    /// keep the term, shrink later installments
    ReduceInstallment,
}

impl PrepaymentPolicy {
    pub const ALL: [PrepaymentPolicy; 2] =
        [PrepaymentPolicy::ReduceTerm, PrepaymentPolicy::ReduceInstallment];

    pub fn id(&self) -> &'static str {
        match self {
            PrepaymentPolicy::ReduceTerm => "ReduceTerm",
            PrepaymentPolicy::ReduceInstallment => "ReduceInstallment",
        }
    }

    /// reduce the balance by `extra_principal`
    ///
    /// Both policies lower the balance the same way and only differ in the
    /// recompute flag.
    pub fn apply(&self, extra_principal: Money, ctx: &PrepaymentContext) -> PrepaymentOutcome {
        PrepaymentOutcome {
            new_remaining_principal: ctx.remaining_principal - extra_principal,
            recompute_installment: matches!(self, PrepaymentPolicy::ReduceInstallment),
        }
    }
}

impl fmt::Display for PrepaymentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PrepaymentPolicy {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| ScheduleError::UnknownStrategy {
                family: "prepayment policy",
                id: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn range(start: u32, end: u32, step: Option<u32>) -> MonthSelector {
        MonthSelector::Range { start, end, step }
    }

    #[test]
    fn test_stepped_range_expansion() {
        assert_eq!(range(3, 9, Some(3)).months(24), vec![3, 6, 9]);
        assert_eq!(range(2, 5, None).months(24), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_range_is_clipped_to_term() {
        assert_eq!(range(10, 20, Some(5)).months(12), vec![10]);
        assert_eq!(range(0, 3, None).months(12), vec![1, 2, 3]);
        assert!(range(13, 20, None).months(12).is_empty());
    }

    #[test]
    fn test_zero_step_behaves_like_one() {
        assert_eq!(range(1, 3, Some(0)).months(12), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_month_bounds() {
        assert_eq!(MonthSelector::Single { month: 12 }.months(12), vec![12]);
        assert!(MonthSelector::Single { month: 0 }.months(12).is_empty());
        assert!(MonthSelector::Single { month: 13 }.months(12).is_empty());
    }

    #[test]
    fn test_plan_groups_events_by_month() {
        let events = vec![
            PrepaymentEvent::single(6, Money::from_major(500)),
            PrepaymentEvent::new(
                range(3, 9, Some(3)),
                PrepaymentAmount::ExtraInstallmentPercent { percent: dec!(10) },
            ),
            PrepaymentEvent::single(40, Money::from_major(1)),
        ];
        let plan = PrepaymentPlan::expand(&events, 24);

        let hit: Vec<u32> = (1..=24).filter(|m| !plan.events_for(*m).is_empty()).collect();
        assert_eq!(hit, vec![3, 6, 9]);
        assert_eq!(plan.events_for(6).len(), 2);
        assert_eq!(plan.events_for(3).len(), 1);
        assert!(plan.events_for(40).is_empty());
        assert!(PrepaymentPlan::expand(&[], 12).events_for(1).is_empty());
    }

    #[test]
    fn test_resolve_extra_modes() {
        let base = Money::from_major(1_120);
        let remaining = Money::from_major(10_000);

        let literal = PrepaymentEvent::single(1, Money::from_major(500));
        assert_eq!(literal.resolve_extra(base, remaining), Money::from_major(500));

        let target = PrepaymentEvent::new(
            MonthSelector::Single { month: 1 },
            PrepaymentAmount::TargetPrincipal { principal: Money::from_major(5_000) },
        );
        assert_eq!(target.resolve_extra(base, remaining), Money::from_major(5_000));
        assert_eq!(target.resolve_extra(base, Money::from_major(4_000)), Money::ZERO);

        let percent = PrepaymentEvent::new(
            MonthSelector::Single { month: 1 },
            PrepaymentAmount::ExtraInstallmentPercent { percent: dec!(50) },
        );
        assert_eq!(percent.resolve_extra(base, remaining), Money::from_major(560));
    }

    #[test]
    fn test_policies_reduce_balance_identically() {
        let ctx = PrepaymentContext {
            month_index: 6,
            installment: Money::from_major(900),
            periodic_rate: Rate::from_decimal(dec!(0.01)),
            remaining_principal: Money::from_major(10_000),
            remaining_months: 18,
        };

        let term = PrepaymentPolicy::ReduceTerm.apply(Money::from_major(500), &ctx);
        let installment = PrepaymentPolicy::ReduceInstallment.apply(Money::from_major(500), &ctx);

        assert_eq!(term.new_remaining_principal, Money::from_major(9_500));
        assert_eq!(installment.new_remaining_principal, Money::from_major(9_500));
        assert!(!term.recompute_installment);
        assert!(installment.recompute_installment);
    }

    #[test]
    fn test_event_override_wins() {
        let event = PrepaymentEvent::single(2, Money::from_major(1))
            .with_policy(PrepaymentPolicy::ReduceInstallment);
        assert_eq!(
            event.effective_policy(PrepaymentPolicy::ReduceTerm),
            PrepaymentPolicy::ReduceInstallment
        );
        let plain = PrepaymentEvent::single(2, Money::from_major(1));
        assert_eq!(plain.effective_policy(PrepaymentPolicy::ReduceTerm), PrepaymentPolicy::ReduceTerm);
    }

    #[test]
    fn test_event_json_shapes() {
        let json = r#"[
            {"months": {"month": 6}, "amount": {"type": "Amount", "amount": "500"}},
            {"months": {"start": 3, "end": 9, "step": 3},
             "amount": {"type": "ExtraInstallmentPercent", "percent": "25"},
             "policy_override": "ReduceInstallment"}
        ]"#;
        let events: Vec<PrepaymentEvent> = serde_json::from_str(json).unwrap();

        assert_eq!(events[0].months, MonthSelector::Single { month: 6 });
        assert_eq!(events[1].months, range(3, 9, Some(3)));
        assert_eq!(events[1].policy_override, Some(PrepaymentPolicy::ReduceInstallment));
    }
}
