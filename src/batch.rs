use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::LoanConfiguration;
use crate::errors::Result;
use crate::schedule::{compute_loan, LoanResult};

/// compute every configuration independently, preserving input order
///
/// A failing entry yields its own `Err` and leaves the others untouched.
pub fn compute_batch(configs: &[LoanConfiguration]) -> Vec<Result<LoanResult>> {
    debug!(count = configs.len(), "computing batch");

    configs
        .par_iter()
        .enumerate()
        .map(|(index, config)| {
            let result = compute_loan(config);
            if let Err(err) = &result {
                warn!(index, loan_id = ?config.id, error = %err, "batch entry failed");
            }
            result
        })
        .collect()
}

/// like [`compute_batch`] but fails on the first error
pub fn try_compute_batch(configs: &[LoanConfiguration]) -> Result<Vec<LoanResult>> {
    compute_batch(configs).into_iter().collect()
}
