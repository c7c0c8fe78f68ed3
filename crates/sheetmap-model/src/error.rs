use thiserror::Error;

use crate::target::TargetTable;

/// Structural problems that leave nothing to classify.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("collection '{collection}' has no fields")]
    NoFields { collection: String },

    #[error("collection '{collection}' has no sample rows and no sample values")]
    NoSampleData { collection: String },

    #[error("field #{index} has a blank name")]
    BlankFieldName { index: usize },

    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },

    #[error("sample row {row} has header '{field}' with no field analysis")]
    UndeclaredField { field: String, row: usize },

    #[error("field '{field}' carries confidence {confidence} for {table}; expected a value in [0, 1]")]
    InvalidConfidence {
        field: String,
        table: TargetTable,
        confidence: f64,
    },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
