//! Storage trait definition.
//!
//! The `LedgerStore` trait is the seam between [`crate::BoatLedger`] and
//! wherever its records live. The ledger owns ordering and capacity; a store
//! only moves records in and out.

use crate::error::{LoadError, SaveError};
use crate::record::BoatRecord;

/// Persistence backend for a boat ledger.
pub trait LedgerStore {
    /// Read at most `limit` records, in stored order.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::CannotOpen` if the source cannot be opened,
    /// `LoadError::Read` if reading fails, and `LoadError::Malformed` when a
    /// strict store meets a bad line.
    fn load(&self, limit: usize) -> Result<Vec<BoatRecord>, LoadError>;

    /// Replace the stored records with `records`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::CannotOpen` if the destination cannot be opened for
    /// writing and `SaveError::Write` if writing fails.
    fn save(&self, records: &[BoatRecord]) -> Result<(), SaveError>;
}
