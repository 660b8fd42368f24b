//! # Ports
//!
//! - `inbound` - the API the host drives ([`PnrExchangeApi`])
//! - `outbound` - what the core depends on ([`Repository`], [`LedgerHost`])

pub mod inbound;
pub mod outbound;

pub use inbound::PnrExchangeApi;
pub use outbound::{InMemoryLedger, LedgerHost, Repository};
