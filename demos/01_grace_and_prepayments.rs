/// grace periods, a first payment and prepayments on one loan
use loan_schedule_rs::{
    compute_loan, AmortizationMethod, DayCountConvention, FirstPayment, GracePeriod,
    LoanConfiguration, Money, MonthSelector, PrepaymentAmount, PrepaymentEvent, PrepaymentPolicy,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let config = LoanConfiguration::builder()
        .id("car-loan")
        .principal(Money::from_major(20_000))
        .rate_percent(dec!(9.5))
        .term_months(24)
        .amortization(AmortizationMethod::Annuity)
        .day_count(DayCountConvention::Thirty360E)
        .first_payment(FirstPayment::Percent { value: dec!(10) })
        .grace(GracePeriod::interest_only(2))
        // literal extra in month 6
        .prepayment(PrepaymentEvent::single(6, Money::from_major(500)))
        // a quarter of the installment on top every third month
        .prepayment(
            PrepaymentEvent::new(
                MonthSelector::Range { start: 9, end: 21, step: Some(3) },
                PrepaymentAmount::ExtraInstallmentPercent { percent: dec!(25) },
            )
            .with_id("quarterly-bonus"),
        )
        .prepayment_policy(PrepaymentPolicy::ReduceInstallment)
        .build()?;

    let result = compute_loan(&config)?;

    for row in &result.schedule {
        let notes: Vec<String> = row.notes.iter().map(|n| n.to_string()).collect();
        println!(
            "{:>3}  {:>9}  {:>8}  {:>9}  {:>9}  {}",
            row.month_index,
            row.installment,
            row.interest_portion,
            row.principal_portion,
            row.remaining_principal,
            notes.join(",")
        );
    }

    let summary = &result.summary;
    println!("paid off in {} months", summary.payoff_month);
    println!("total paid:     {}", summary.total_paid);
    println!("total interest: {}", summary.total_interest);
    println!("installments:   {} - {}", summary.min_installment, summary.max_installment);

    Ok(())
}
