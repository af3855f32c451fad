//! Errors raised outside the boolean evaluation contract.

use crate::condition::ConditionKind;
use crate::outcome::FailReason;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConditionError {
    #[error("{kind} condition '{expression}' failed at '{path}': {reason}")]
    Violated {
        path: String,
        kind: ConditionKind,
        expression: String,
        reason: FailReason,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
