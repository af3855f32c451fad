use thiserror::Error;
use yangcond_core::ConditionError;

/// Errors surfaced by the command line tool and the schema loader.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Condition error: {0}")]
    Condition(#[from] ConditionError),

    #[error("Schema XML is malformed: {0}")]
    SchemaXml(#[from] roxmltree::Error),

    #[error("Schema is invalid: {0}")]
    Schema(String),

    #[error("Invalid assignment '{0}', expected PATH=VALUE with an absolute PATH")]
    InvalidAssignment(String),

    #[error("Expression '{0}' did not parse")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
