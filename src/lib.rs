pub mod batch;
pub mod config;
pub mod currency;
pub mod decimal;
pub mod errors;
pub mod interest;
pub mod payments;
pub mod schedule;
pub mod serialization;
pub mod types;

// re-export key types
pub use batch::{compute_batch, try_compute_batch};
pub use config::{FirstPayment, LoanConfiguration, LoanConfigurationBuilder};
pub use currency::Currency;
pub use decimal::{Money, Rate};
pub use errors::{Result, ScheduleError};
pub use interest::{DayCountContext, DayCountConvention, InflationDiscount};
pub use payments::{
    AmortizationMethod, GracePeriod, MonthSelector, PrepaymentAmount, PrepaymentEvent,
    PrepaymentPolicy,
};
pub use schedule::{compute_loan, LoanResult, LoanSummary, ScheduleGenerator, ScheduleRow};
pub use serialization::{to_csv, to_json};
pub use types::{LoanId, ScheduleNote};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
