/// compute a batch of loans in parallel and export them
use loan_schedule_rs::{
    compute_batch, to_csv, AmortizationMethod, Currency, DayCountConvention, GracePeriod,
    LoanConfiguration, Money,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("bad start date")?;

    let mut configs = Vec::new();
    for (i, method) in AmortizationMethod::ALL.into_iter().enumerate() {
        for day_count in DayCountConvention::ALL {
            configs.push(
                LoanConfiguration::builder()
                    .id(format!("{}-{}", method, day_count))
                    .currency(Currency::EUR)
                    .principal(Money::from_major(150_000 + 50_000 * i as i64))
                    .rate_percent(dec!(4.2))
                    .term_months(240)
                    .amortization(method)
                    .day_count(day_count)
                    .start_date(start)
                    .grace(GracePeriod::reduced_rate(6, dec!(1.5)))
                    .inflation_percent(dec!(2.5))
                    .build()?,
            );
        }
    }

    let results = compute_batch(&configs);

    for result in &results {
        match result {
            Ok(result) => {
                let summary = &result.summary;
                println!(
                    "{:<28} paid {:>12} interest {:>11} (pv {:>12})",
                    result.id.as_deref().unwrap_or("-"),
                    summary.total_paid,
                    summary.total_interest,
                    summary.total_paid_pv.map(|m| m.to_string()).unwrap_or_default()
                );
            }
            Err(err) => println!("failed: {}", err),
        }
    }

    // first schedule as csv
    if let Some(Ok(first)) = results.first() {
        let csv = to_csv(first)?;
        for line in csv.lines().take(8) {
            println!("{}", line);
        }
    }

    Ok(())
}
