/// json and csv renderings of a computed schedule
use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::schedule::{LoanResult, ScheduleRow};
use crate::types::join_notes;

const BASE_COLUMNS: [&str; 5] = [
    "month_index",
    "installment",
    "interest_portion",
    "principal_portion",
    "remaining_principal",
];

const PV_COLUMNS: [&str; 4] = [
    "installment_pv",
    "interest_portion_pv",
    "principal_portion_pv",
    "remaining_principal_pv",
];

const TRAILING_COLUMNS: [&str; 2] = ["periodic_rate", "notes"];

/// pretty-printed json of the whole result, snake_case field names
pub fn to_json(result: &LoanResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// header plus one line per schedule row
///
/// Column names are snake_case (`month_index`, `interest_portion`, ...), not
/// the camelCase some exporters use. Present-value columns appear only when
/// the result carries them.
pub fn to_csv(result: &LoanResult) -> Result<String> {
    let with_pv = result.has_present_values();
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(csv_header(with_pv))?;
    for row in &result.schedule {
        writer.write_record(csv_record(row, with_pv))?;
    }
    writer.flush().map_err(csv::Error::from)?;

    let bytes = writer.into_inner().map_err(|e| ScheduleError::Export {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| ScheduleError::Export {
        message: e.to_string(),
    })
}

/// column names in output order
pub fn csv_header(with_pv: bool) -> Vec<&'static str> {
    let mut header = BASE_COLUMNS.to_vec();
    if with_pv {
        header.extend(PV_COLUMNS);
    }
    header.extend(TRAILING_COLUMNS);
    header
}

fn csv_record(row: &ScheduleRow, with_pv: bool) -> Vec<String> {
    let mut record = vec![
        row.month_index.to_string(),
        row.installment.to_string(),
        row.interest_portion.to_string(),
        row.principal_portion.to_string(),
        row.remaining_principal.to_string(),
    ];
    if with_pv {
        let pv = |value: Option<Money>| value.map(|m| m.to_string()).unwrap_or_default();
        record.push(pv(row.installment_pv));
        record.push(pv(row.interest_portion_pv));
        record.push(pv(row.principal_portion_pv));
        record.push(pv(row.remaining_principal_pv));
    }
    record.push(row.periodic_rate.as_decimal().to_string());
    record.push(join_notes(&row.notes));
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FirstPayment, LoanConfiguration};
    use crate::decimal::Money;
    use crate::payments::PrepaymentEvent;
    use crate::schedule::compute_loan;
    use rust_decimal_macros::dec;

    fn result(inflation: bool) -> LoanResult {
        let mut builder = LoanConfiguration::builder()
            .id("csv-demo")
            .principal(Money::from_major(1_200))
            .rate_percent(dec!(12))
            .term_months(3)
            .first_payment(FirstPayment::Absolute { value: Money::from_major(300) })
            .prepayment(PrepaymentEvent::single(1, Money::from_major(100)));
        if inflation {
            builder = builder.inflation_percent(dec!(5));
        }
        compute_loan(&builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_csv_header_and_line_count() {
        let result = result(false);
        let csv = to_csv(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), result.schedule.len() + 1);
        assert_eq!(
            lines[0],
            "month_index,installment,interest_portion,principal_portion,remaining_principal,periodic_rate,notes"
        );
        assert!(lines[1].starts_with("1,"));
        assert!(lines[1].ends_with(",0.01,firstPayment|prepayment"));
    }

    #[test]
    fn test_csv_includes_present_values_when_present() {
        let result = result(true);
        let csv = to_csv(&result).unwrap();
        let header = csv.lines().next().unwrap();

        assert_eq!(header.split(',').count(), 11);
        assert!(header.contains("installment_pv,interest_portion_pv,principal_portion_pv,remaining_principal_pv"));
        assert_eq!(csv.lines().count(), result.schedule.len() + 1);
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let json = to_json(&result(false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let first = &value["schedule"][0];
        assert_eq!(first["notes"], serde_json::json!(["firstPayment", "prepayment"]));
        assert!(first.get("installment_pv").is_none());
        assert!(value["schedule"][1].get("notes").is_none());
        assert_eq!(value["id"], "csv-demo");
        assert_eq!(value["currency"], "USD");
        assert!(value["summary"].get("total_paid_pv").is_none());
    }

    #[test]
    fn test_json_round_trips() {
        let result = result(true);
        let json = to_json(&result).unwrap();
        let parsed: LoanResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
