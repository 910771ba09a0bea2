//! The boat ledger: an ordered, capacity-bounded collection of boat records.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{AddError, LoadError, PayError, RemoveError, SaveError};
use crate::record::{format_amount, to_cents, BoatRecord, ParseMode};
use crate::storage::{FlatFileStore, LedgerStore};

/// Maximum number of boats the marina tracks.
pub const CAPACITY: usize = 120;

/// Case-insensitive (ASCII) name order, ties broken by byte order.
pub fn name_order(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
        .then_with(|| a.cmp(b))
}

/// In-memory ledger of boats, always sorted by [`name_order`].
///
/// Names are matched case-insensitively. Duplicate names are allowed; lookups
/// by name act on the first match in ledger order.
#[derive(Debug, Clone, Default)]
pub struct BoatLedger {
    boats: Vec<BoatRecord>,
    mode: ParseMode,
}

impl BoatLedger {
    /// Empty ledger with lenient parsing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty ledger that parses loaded files and added lines with `mode`.
    pub fn with_mode(mode: ParseMode) -> Self {
        Self {
            boats: Vec::new(),
            mode,
        }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.boats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boats.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.boats.len() >= CAPACITY
    }

    /// Records in ledger order.
    pub fn records(&self) -> &[BoatRecord] {
        &self.boats
    }

    /// Replace the ledger contents with the data file at `source`.
    ///
    /// # Errors
    ///
    /// See [`LedgerStore::load`]. On error the ledger is left unchanged.
    pub fn load(&mut self, source: impl AsRef<Path>) -> Result<(), LoadError> {
        let store = FlatFileStore::new(source.as_ref()).with_mode(self.mode);
        self.load_from(&store)
    }

    /// Replace the ledger contents with up to [`CAPACITY`] records from `store`.
    pub fn load_from(&mut self, store: &impl LedgerStore) -> Result<(), LoadError> {
        let mut boats = store.load(CAPACITY)?;
        boats.sort_by(|a, b| name_order(a.name(), b.name()));
        self.boats = boats;
        info!(count = self.boats.len(), "ledger loaded");
        Ok(())
    }

    /// Write every record to `destination` in ledger order.
    pub fn save(&self, destination: impl AsRef<Path>) -> Result<(), SaveError> {
        self.save_to(&FlatFileStore::new(destination.as_ref()))
    }

    pub fn save_to(&self, store: &impl LedgerStore) -> Result<(), SaveError> {
        store.save(&self.boats)?;
        info!(count = self.boats.len(), "ledger saved");
        Ok(())
    }

    /// Display rows for every boat, in ledger order.
    ///
    /// The iterator borrows the ledger and can be cloned to walk it again.
    pub fn list(&self) -> Inventory<'_> {
        Inventory {
            boats: self.boats.iter(),
        }
    }

    /// Insert `record` at its sorted position.
    ///
    /// A record whose name compares equal to existing ones goes after them.
    ///
    /// # Errors
    ///
    /// Returns `AddError::AtCapacity` when the ledger already holds [`CAPACITY`] boats.
    pub fn add(&mut self, record: BoatRecord) -> Result<(), AddError> {
        if self.is_full() {
            return Err(AddError::AtCapacity(CAPACITY));
        }
        let index = self
            .boats
            .partition_point(|boat| name_order(boat.name(), record.name()) != Ordering::Greater);
        debug!(name = record.name(), index, "adding boat");
        self.boats.insert(index, record);
        Ok(())
    }

    /// Parse a raw record line and add it.
    ///
    /// # Errors
    ///
    /// Returns `AddError::AtCapacity` before looking at the line when the
    /// ledger is full, and `AddError::Malformed` when the line does not parse.
    pub fn add_line(&mut self, line: &str) -> Result<(), AddError> {
        if self.is_full() {
            return Err(AddError::AtCapacity(CAPACITY));
        }
        let record = BoatRecord::parse_line(line, self.mode)?;
        self.add(record)
    }

    /// Remove the first boat named `name`, keeping the rest in order.
    pub fn remove(&mut self, name: &str) -> Result<BoatRecord, RemoveError> {
        let index = self
            .position(name)
            .ok_or_else(|| RemoveError::NotFound(name.to_string()))?;
        let removed = self.boats.remove(index);
        debug!(name = removed.name(), "removed boat");
        Ok(removed)
    }

    /// Apply a payment to the first boat named `name`, returning the new balance.
    ///
    /// The amount is rounded to cents first. Paying the full balance leaves
    /// exactly zero.
    ///
    /// # Errors
    ///
    /// - `PayError::NotFound` if no boat has that name
    /// - `PayError::InvalidAmount` if the amount is negative
    /// - `PayError::ExceedsBalance` with the current balance if the amount is
    ///   larger than what is owed
    pub fn pay(&mut self, name: &str, amount: Decimal) -> Result<Decimal, PayError> {
        let index = self
            .position(name)
            .ok_or_else(|| PayError::NotFound(name.to_string()))?;
        let amount = to_cents(amount);
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PayError::InvalidAmount(amount));
        }

        let boat = &mut self.boats[index];
        if amount > boat.amount_owed() {
            return Err(PayError::ExceedsBalance(boat.amount_owed()));
        }
        boat.credit(amount);
        debug!(name = boat.name(), paid = %amount, balance = %boat.amount_owed(), "payment applied");
        Ok(boat.amount_owed())
    }

    /// Bill every boat for one month. Each call is one more billing cycle.
    ///
    /// Returns the total amount charged across the ledger.
    pub fn apply_monthly_charge(&mut self) -> Decimal {
        let mut total = Decimal::ZERO;
        for boat in &mut self.boats {
            let charge = boat.monthly_charge();
            boat.charge(charge);
            total += charge;
        }
        info!(boats = self.boats.len(), total = %format_amount(&total), "monthly charges applied");
        total
    }

    pub fn exists(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// First boat named `name` (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&BoatRecord> {
        self.position(name).map(|index| &self.boats[index])
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.boats
            .iter()
            .position(|boat| boat.name().eq_ignore_ascii_case(name))
    }
}

/// Iterator over inventory display rows. See [`BoatLedger::list`].
#[derive(Debug, Clone)]
pub struct Inventory<'a> {
    boats: std::slice::Iter<'a, BoatRecord>,
}

impl<'a> Iterator for Inventory<'a> {
    type Item = InventoryRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.boats.next().map(|boat| InventoryRow { boat })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.boats.size_hint()
    }
}

impl ExactSizeIterator for Inventory<'_> {}

/// One formatted inventory line.
///
/// Displays as fixed-width columns, for example:
///
/// ```text
/// Betty                  20' slip     # 1     Owes $ 500.00
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InventoryRow<'a> {
    boat: &'a BoatRecord,
}

impl<'a> InventoryRow<'a> {
    pub fn record(&self) -> &'a BoatRecord {
        self.boat
    }
}

impl fmt::Display for InventoryRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let placement = self.boat.placement();
        write!(
            f,
            "{:<20} {:>4}' {:<8} {:<7} Owes ${:>7}",
            self.boat.name(),
            self.boat.length(),
            placement.kind().keyword(),
            placement.display_value(),
            format_amount(&self.boat.amount_owed())
        )
    }
}
