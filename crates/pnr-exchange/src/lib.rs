//! # PNR Exchange
//!
//! Two-party Passenger Name Record exchange over a permissioned ledger.
//! Two Passenger Information Units negotiate a request/response exchange
//! that is mutually confirmed before data transfer, stored only in
//! privacy-segregated collections visible to exactly those two parties,
//! and eligible for purge once both sides have acknowledged completion.
//!
//! ## Lifecycle
//!
//! | State | Payload kept? | Reached by |
//! |-------|---------------|------------|
//! | `Pending` | yes | requester's `NewPNRRequest` |
//! | `PendingConfirmed` | yes | responder's `ConfirmPNR` |
//! | `Ack` / `Nack` | yes | responder's `SubmitPNRResponseAck`/`Nack` |
//! | `AckConfirmed` / `NackConfirmed` | no | requester's `ConfirmPNR`, purges payload |
//! | `Terminated` | no | either party's `TerminatePNRRequest`, local side only |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! ```text
//! ledger host
//! ├── contract            (invocation adapter: identity, transient data, dispatch)
//! │   └── service         (exchange core: state machine, authorization, hashing)
//! │       └── ports       (PnrExchangeApi / Repository / LedgerHost)
//! │           └── adapters (privatedata, publicledger, memory)
//! └── domain              (entities, canonicalization, keys, errors)
//! ```
//!
//! The core runs one host-driven invocation at a time and holds no state
//! across invocations; the host transaction is the atomicity and rollback
//! boundary for every operation.

pub mod adapters;
pub mod contract;
pub mod domain;
pub mod ports;
pub mod service;
pub mod test_support;

// Re-export domain types
pub use domain::entities::{
    optional_payload, ConfirmPnrInput, GcMetadata, NewPnrRequestInput, NewPnrRequestOutput, Piu,
    PiuInfo, Pnr, PnrFilter, RequestState, Role, SubmitPnrResponseInput, TerminatePnrRequestInput,
    REQUEST_DATA_TRANSIENT_KEY, RESPONSE_DATA_TRANSIENT_KEY,
};
pub use domain::errors::{ErrorKind, ExchangeError, LedgerError, RepositoryError};
pub use domain::keys::ObjectType;

// Re-export port traits
pub use ports::inbound::PnrExchangeApi;
pub use ports::outbound::{InMemoryLedger, LedgerHost, Repository};

// Re-export service and adapters
pub use adapters::{collection_name, InMemoryRepository, PrivateDataRepository, PublicLedgerRepository};
pub use service::PnrExchangeService;

// Re-export the invocation adapter
pub use contract::PnrExchangeContract;
