/// quick start - minimal example to get started
use loan_schedule_rs::{compute_loan, to_json, Currency, Decimal, LoanConfiguration, Money};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    // a $10,000 personal loan at 8% over a year
    let config = LoanConfiguration::annuity(Currency::USD, Money::from_major(10_000), Decimal::from(8), 12);
    let result = compute_loan(&config)?;

    for row in &result.schedule {
        println!(
            "{:>3}  {:>10}  {:>8}  {:>10}  {:>10}",
            row.month_index,
            row.installment,
            row.interest_portion,
            row.principal_portion,
            row.remaining_principal
        );
    }

    println!("{}", to_json(&result)?);

    Ok(())
}
