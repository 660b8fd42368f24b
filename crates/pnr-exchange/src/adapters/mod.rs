//! # Storage Adapters
//!
//! Implementations of the storage port:
//!
//! - `privatedata` - production adapter over per-party private collections
//! - `publicledger` - production adapter over public ledger state only
//! - `memory` - in-memory reference repository for deterministic tests
//!
//! All three are exercised by the same conformance battery.

#[cfg(test)]
pub(crate) mod conformance;
pub mod memory;
pub mod privatedata;
pub mod publicledger;

pub use memory::InMemoryRepository;
pub use privatedata::{collection_name, PrivateDataRepository};
pub use publicledger::PublicLedgerRepository;
