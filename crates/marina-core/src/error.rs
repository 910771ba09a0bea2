//! Error types for marina core operations.
//!
//! Each ledger operation has its own error enum so callers can match on the
//! exact failure. [`MarinaError`] wraps all of them for code that only needs
//! to propagate. The CLI layer maps these to user-facing messages.

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::record::format_amount;

/// Result type alias for marina operations.
pub type Result<T> = std::result::Result<T, MarinaError>;

/// Umbrella error for any marina core operation.
#[derive(Debug, Error)]
pub enum MarinaError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Add(#[from] AddError),

    #[error(transparent)]
    Remove(#[from] RemoveError),

    #[error(transparent)]
    Pay(#[from] PayError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A single record line could not be turned into a [`crate::BoatRecord`].
///
/// Lenient parsing only produces `FieldCount` and `EmptyName`; every other
/// variant is raised by strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Line did not split into exactly five comma-separated fields
    #[error("expected 5 comma-separated fields, found {0}")]
    FieldCount(usize),

    /// Name field was blank
    #[error("boat name is empty")]
    EmptyName,

    /// Name exceeds the maximum length
    #[error("boat name is longer than {max} characters: {name}")]
    NameTooLong { name: String, max: usize },

    /// A numeric field did not hold a number
    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Placement keyword not recognized
    #[error("unknown placement kind: {0:?}")]
    UnknownPlacement(String),

    /// Placement value outside its allowed range
    #[error("invalid {kind} value: {value:?}")]
    InvalidPlacementValue { kind: &'static str, value: String },

    /// Amount owed below zero
    #[error("amount owed cannot be negative: {0}")]
    NegativeAmount(String),

    /// Amount larger than the ledger can carry
    #[error("amount is larger than {max}: {value}")]
    AmountTooLarge { value: String, max: Decimal },

    /// Line bytes were not valid UTF-8
    #[error("line is not valid UTF-8")]
    InvalidEncoding,
}

/// Loading a ledger from storage failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Source could not be opened
    #[error("could not open {}: {source}", path.display())]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source was opened but reading failed
    #[error("failed reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line was rejected (strict mode only)
    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: ParseError,
    },
}

/// Saving a ledger to storage failed.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Destination could not be opened for writing
    #[error("could not open {} to save: {source}", path.display())]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination was opened but writing failed
    #[error("failed writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Adding a record failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddError {
    /// Ledger already holds the maximum number of boats
    #[error("at maximum capacity for boats ({0})")]
    AtCapacity(usize),

    /// Raw input line could not be parsed into a record
    #[error("malformed boat data: {0}")]
    Malformed(#[from] ParseError),
}

/// Removing a record failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoveError {
    #[error("no boat named {0:?}")]
    NotFound(String),
}

/// Applying a payment failed. The balance is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayError {
    #[error("no boat named {0:?}")]
    NotFound(String),

    /// Payment is larger than the balance; carries the current balance
    #[error("that is more than the amount owed, ${}", format_amount(.0))]
    ExceedsBalance(Decimal),

    /// Payment amount is negative
    #[error("payment amount cannot be negative: {0}")]
    InvalidAmount(Decimal),
}
