//! Storage layer: the [`LedgerStore`] trait and its flat-file implementation.

pub mod flat_file;
pub mod traits;

pub use flat_file::FlatFileStore;
pub use traits::LedgerStore;
