use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::config::LoanConfiguration;
use crate::decimal::{Money, Rate, EPSILON};
use crate::errors::{Result, ScheduleError};
use crate::interest::{periodic_rate, DayCountContext, InflationDiscount};
use crate::payments::{
    AmortizationContext, GraceContext, GracePeriod, PrepaymentContext, PrepaymentPlan,
    PrepaymentPolicy,
};
use crate::types::ScheduleNote;

use super::state::{InstallmentRange, ScheduleState};
use super::{LoanResult, LoanSummary, ScheduleRow};

/// generate the full schedule for one configuration
pub fn compute_loan(config: &LoanConfiguration) -> Result<LoanResult> {
    ScheduleGenerator::new(config).generate()
}

/// a settled month: the row to append and the state for the next month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOutcome {
    pub row: ScheduleRow,
    pub state: ScheduleState,
}

/// unrounded breakdown of one month
#[derive(Debug, Clone, Copy)]
struct Breakdown {
    installment: Money,
    interest: Money,
    principal: Money,
    remaining: Money,
}

/// month-by-month simulation over an immutable configuration
pub struct ScheduleGenerator<'a> {
    config: &'a LoanConfiguration,
    day_count_context: DayCountContext,
    prepayments: PrepaymentPlan<'a>,
    default_policy: PrepaymentPolicy,
    first_payment: Money,
    inflation: Option<InflationDiscount>,
}

impl<'a> ScheduleGenerator<'a> {
    pub fn new(config: &'a LoanConfiguration) -> Self {
        let inflation = config.annual_inflation_rate_percent.and_then(|annual| {
            let discount = InflationDiscount::from_annual_percent(annual);
            if discount.is_none() && annual > Decimal::ZERO {
                warn!(annual_percent = %annual, "inflation rate has no monthly equivalent, present values disabled");
            }
            discount
        });

        Self {
            config,
            day_count_context: config.day_count_context(),
            prepayments: PrepaymentPlan::expand(&config.prepayments, config.term_months),
            default_policy: config.effective_prepayment_policy(),
            first_payment: config.first_payment_amount(),
            inflation,
        }
    }

    /// run months `1..=term_months`, stopping early once the balance is paid off
    pub fn generate(&self) -> Result<LoanResult> {
        let config = self.config;
        debug!(
            loan_id = ?config.id,
            principal = %config.principal,
            term_months = config.term_months,
            amortization = %config.amortization,
            day_count = %config.day_count,
            "generating schedule"
        );

        let mut state = ScheduleState::opening(config.principal);
        let mut schedule = Vec::with_capacity(config.term_months as usize);

        for month in 1..=config.term_months {
            let outcome = self.step(month, &state)?;
            schedule.push(outcome.row);
            state = outcome.state;

            if state.is_paid_off() {
                break;
            }
        }

        let summary = self.summarize(&schedule, &state);
        debug!(
            loan_id = ?config.id,
            payoff_month = summary.payoff_month,
            total_paid = %summary.total_paid,
            total_interest = %summary.total_interest,
            "schedule generated"
        );

        Ok(LoanResult {
            id: config.id.clone(),
            currency: config.currency.code().to_string(),
            schedule,
            summary,
        })
    }

    /// settle a single month starting from `state`
    pub fn step(&self, month: u32, state: &ScheduleState) -> Result<MonthOutcome> {
        let config = self.config;
        let mut notes = Vec::new();
        let mut remaining = state.remaining;

        if month == 1 && self.first_payment.is_positive() {
            remaining = (remaining - self.first_payment).max(Money::ZERO);
            notes.push(ScheduleNote::FirstPayment);
        }

        let grace = config.grace.as_ref().filter(|g| g.covers(month));

        let annual_rate = grace
            .and_then(|g| g.override_annual_rate(config.nominal_annual_rate_percent, month))
            .unwrap_or(config.nominal_annual_rate_percent);
        let rate = periodic_rate(config.day_count, annual_rate, month, &self.day_count_context);

        let mut breakdown = match grace.filter(|g| g.overrides_installment()) {
            Some(grace) => {
                let breakdown = self.grace_month(grace, month, rate, remaining)?;
                notes.push(ScheduleNote::Grace);
                breakdown
            }
            None => {
                let (breakdown, prepaid) = self.standard_month(month, rate, remaining);
                if prepaid {
                    notes.push(ScheduleNote::Prepayment);
                }
                breakdown
            }
        };

        // residual dust before the final month
        if breakdown.remaining.as_decimal() < EPSILON && month < config.term_months {
            breakdown.remaining = Money::ZERO;
        }

        let row = self.finalize_row(month, rate, &breakdown, notes);
        let installment_pv = self
            .inflation
            .map(|discount| discount.discount(breakdown.installment, month));

        trace!(
            month,
            installment = %breakdown.installment,
            interest = %breakdown.interest,
            principal = %breakdown.principal,
            remaining = %breakdown.remaining,
            "month settled"
        );

        Ok(MonthOutcome {
            row,
            state: state.advance(breakdown.remaining, breakdown.installment, installment_pv),
        })
    }

    fn grace_month(
        &self,
        grace: &GracePeriod,
        month: u32,
        rate: Rate,
        remaining: Money,
    ) -> Result<Breakdown> {
        if !self.prepayments.events_for(month).is_empty() {
            debug!(month, grace = grace.id(), "prepayment events skipped during grace override");
        }

        let ctx = GraceContext {
            month_index: month,
            periodic_rate: rate,
            remaining_principal: remaining,
        };
        let grace_installment =
            grace
                .override_installment(&ctx)
                .ok_or_else(|| ScheduleError::GraceContractViolation {
                    strategy: grace.id().to_string(),
                    month,
                })?;

        Ok(Breakdown {
            installment: grace_installment.installment,
            interest: grace_installment.interest,
            principal: grace_installment.principal,
            remaining: remaining - grace_installment.principal,
        })
    }

    /// regular amortization plus any prepayments; the flag reports whether extra was applied
    fn standard_month(&self, month: u32, rate: Rate, remaining: Money) -> (Breakdown, bool) {
        let config = self.config;
        let remaining_months = config.term_months - month + 1;
        let amortization_ctx = AmortizationContext {
            month_index: month,
            periodic_rate: rate,
            remaining_months,
        };
        let base_installment = config.amortization.compute_installment(remaining, &amortization_ctx);

        // sized against the balance at month start
        let requested: Vec<(Money, PrepaymentPolicy)> = self
            .prepayments
            .events_for(month)
            .iter()
            .map(|event| {
                (
                    event.resolve_extra(base_installment, remaining),
                    event.effective_policy(self.default_policy),
                )
            })
            .filter(|(extra, _)| extra.is_positive())
            .collect();

        let interest = remaining * rate;
        let principal = (base_installment - interest).clamp_between(Money::ZERO, remaining);
        let mut balance = remaining - principal;

        let mut extra = Money::ZERO;
        let mut recompute = false;
        for (requested_extra, policy) in requested {
            // never push the balance below zero
            let applied = requested_extra.min(balance);
            if !applied.is_positive() {
                continue;
            }
            let outcome = policy.apply(
                applied,
                &PrepaymentContext {
                    month_index: month,
                    installment: base_installment,
                    periodic_rate: rate,
                    remaining_principal: balance,
                    remaining_months,
                },
            );
            balance = outcome.new_remaining_principal;
            extra += applied;
            recompute |= outcome.recompute_installment;
        }

        let prepaid = extra.is_positive();
        if prepaid {
            debug!(month, extra = %extra, recompute_installment = recompute, "prepayment applied");
        }

        let installment = if balance.as_decimal() < EPSILON {
            interest + principal + extra
        } else {
            base_installment + extra
        };

        (
            Breakdown {
                installment,
                interest,
                principal: principal + extra,
                remaining: balance,
            },
            prepaid,
        )
    }

    fn finalize_row(
        &self,
        month: u32,
        rate: Rate,
        breakdown: &Breakdown,
        notes: Vec<ScheduleNote>,
    ) -> ScheduleRow {
        let currency = self.config.currency;
        let pv = |amount: Money| {
            self.inflation
                .map(|discount| currency.round(discount.discount(amount, month)))
        };

        ScheduleRow {
            month_index: month,
            installment: currency.round(breakdown.installment),
            interest_portion: currency.round(breakdown.interest),
            principal_portion: currency.round(breakdown.principal),
            remaining_principal: currency.round(breakdown.remaining),
            periodic_rate: rate,
            notes,
            installment_pv: pv(breakdown.installment),
            interest_portion_pv: pv(breakdown.interest),
            principal_portion_pv: pv(breakdown.principal),
            remaining_principal_pv: pv(breakdown.remaining),
        }
    }

    fn summarize(&self, schedule: &[ScheduleRow], state: &ScheduleState) -> LoanSummary {
        let currency = self.config.currency;
        let total_paid: Money = schedule.iter().map(|r| r.installment).sum();
        let total_interest: Money = schedule.iter().map(|r| r.interest_portion).sum();
        let range = state
            .installments
            .unwrap_or(InstallmentRange::single(Money::ZERO));

        let (total_paid_pv, total_interest_pv, max_pv, min_pv) = match self.inflation {
            Some(_) => {
                let paid: Money = schedule.iter().filter_map(|r| r.installment_pv).sum();
                let interest: Money = schedule.iter().filter_map(|r| r.interest_portion_pv).sum();
                let pv_range = state
                    .installments_pv
                    .unwrap_or(InstallmentRange::single(Money::ZERO));
                (
                    Some(currency.round(paid)),
                    Some(currency.round(interest)),
                    Some(currency.round(pv_range.max)),
                    Some(currency.round(pv_range.min)),
                )
            }
            None => (None, None, None, None),
        };

        LoanSummary {
            total_paid: currency.round(total_paid),
            total_interest: currency.round(total_interest),
            max_installment: currency.round(range.max),
            min_installment: currency.round(range.min),
            payoff_month: schedule.len() as u32,
            total_paid_pv,
            total_interest_pv,
            max_installment_pv: max_pv,
            min_installment_pv: min_pv,
        }
    }
}
