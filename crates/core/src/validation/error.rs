//! Validation pipeline error types.

use std::collections::BTreeMap;

use thiserror::Error;

use super::types::{RejectionCategory, ValidatorFault};

/// Validation pipeline errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more validators rejected the file. Aggregates every rejecting
    /// validator's category and reason.
    #[error("content rejected: {filename}")]
    Rejected {
        /// Filename of the rejected content.
        filename: String,
        /// Reason per rejection category.
        reasons: BTreeMap<RejectionCategory, String>,
    },

    /// A validator could not be executed. Fatal; carries no verdict.
    #[error("validation pipeline failed: {0}")]
    Execution(String),
}

impl From<ValidatorFault> for ValidationError {
    fn from(fault: ValidatorFault) -> Self {
        Self::Execution(fault.to_string())
    }
}
