//! # Marina Core
//!
//! Core library for Marina - a billing ledger for the boats kept at a marina.
//!
//! This crate provides the record model, the in-memory ledger and its flat-file
//! storage, independent of the interactive shell.
//!
//! ## Architecture
//!
//! - **record**: boat records, placements, and the comma-separated line codec
//! - **ledger**: the sorted, capacity-bounded [`BoatLedger`] and its operations
//! - **storage**: the [`LedgerStore`] trait and the flat-file backend
//! - **error**: one error enum per operation
//!
//! ## Example
//!
//! ```
//! use marina_core::BoatLedger;
//!
//! let mut ledger = BoatLedger::new();
//! ledger.add_line("Betty,20,slip,1,500.00").unwrap();
//! ledger.apply_monthly_charge();
//!
//! let row = ledger.list().next().unwrap().to_string();
//! assert!(row.ends_with("Owes $ 750.00"));
//! ```

pub mod error;
pub mod fs;
pub mod ledger;
pub mod record;
pub mod storage;

pub use error::{
    AddError, LoadError, MarinaError, ParseError, PayError, RemoveError, Result, SaveError,
};
pub use ledger::{BoatLedger, Inventory, InventoryRow, CAPACITY};
pub use record::{
    format_amount, parse_payment, BoatRecord, ParseMode, Placement, PlacementKind, MAX_AMOUNT,
};
pub use storage::{FlatFileStore, LedgerStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
