//! # Composite Keys
//!
//! Key layout for the host key-value store. Every persisted record lives
//! under a `⟨objectType, id⟩` composite key; the null-byte framing keeps
//! object types from colliding on common prefixes and gives partial-key
//! scans a cheap `prefix` to range over.

/// Separator used by the host's composite-key scheme.
const DELIMITER: char = '\u{0}';

/// Object types persisted by the storage adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    /// PIU rows, public ledger state.
    Piu,
    /// PNR metadata projection, private collections.
    PnrMeta,
    /// PNR payload projection, private collections. Purge-eligible.
    PnrData,
    /// Garbage-collection metadata, private collections.
    Gc,
    /// Whole-PNR records used by the public-ledger adapter.
    Pnr,
}

impl ObjectType {
    /// The stored name of this object type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Piu => "piu",
            ObjectType::PnrMeta => "pnrMeta",
            ObjectType::PnrData => "pnrData",
            ObjectType::Gc => "gc",
            ObjectType::Pnr => "pnr",
        }
    }

    /// Scan prefix covering every key of this object type.
    pub fn prefix(&self) -> String {
        format!("{DELIMITER}{}{DELIMITER}", self.as_str())
    }

    /// Full composite key for `id`.
    pub fn key(&self, id: &str) -> String {
        format!("{DELIMITER}{}{DELIMITER}{id}{DELIMITER}", self.as_str())
    }
}
