//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (OrderedStore, IdGenerator, Clock)
//! but are themselves concrete structs, not traits.

mod collection;
mod ledger;

pub use collection::{Collection, TimberCollection, TreeCollection};
pub use ledger::{Ledger, LedgerSummary};
