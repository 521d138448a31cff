//! Error types for agreement computations

use thiserror::Error;

/// Errors surfaced by table access and agreement statistics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgreementError {
    #[error("column not found: {0}")]
    MissingColumn(String),

    #[error("row {row} has {found} values but the table has {expected} columns")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column {column} has {found} values but the table has {expected} rows")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid records: {0}")]
    InvalidRecords(String),

    #[error("output columns collide: {0}")]
    ConflictingOutputColumns(String),

    #[error("kappa is undefined: no item pairs ({items} items, {groups} annotator groups)")]
    NoItemPairs { items: usize, groups: usize },

    #[error("kappa is undefined: the selected columns hold no codes")]
    NoCodedValues,

    #[error("kappa is undefined: chance agreement is 1")]
    ChanceAgreementIsOne,
}

impl AgreementError {
    /// Check if this error means the statistic is mathematically undefined
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            AgreementError::NoItemPairs { .. }
                | AgreementError::NoCodedValues
                | AgreementError::ChanceAgreementIsOne
        )
    }

    /// Check if this error is a failed column lookup
    pub fn is_missing_column(&self) -> bool {
        matches!(self, AgreementError::MissingColumn(_))
    }
}

pub type Result<T> = std::result::Result<T, AgreementError>;
