use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("grace strategy {strategy} declares an installment override but returned none for month {month}")]
    GraceContractViolation {
        strategy: String,
        month: u32,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("unknown {family} strategy: {id}")]
    UnknownStrategy {
        family: &'static str,
        id: String,
    },

    #[error("unknown currency: {code}")]
    UnknownCurrency {
        code: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export error: {message}")]
    Export {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
