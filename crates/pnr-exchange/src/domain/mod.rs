//! # Domain Layer
//!
//! Pure logic of the PNR exchange. No module in here touches the ledger
//! host.
//!
//! ## Modules
//!
//! - `entities` - PIU/PNR/filter/GC records, states and predicates
//! - `errors` - kind-tagged error types
//! - `keys` - composite-key layout for the host key-value store
//! - `canonical` - deterministic JSON canonicalization and hashing
//! - `response` - response payload digesting (hash pipeline + GC timestamp)

pub mod canonical;
pub mod entities;
pub mod errors;
pub mod keys;
pub mod response;

pub use entities::{
    optional_payload, ConfirmPnrInput, GcMetadata, NewPnrRequestInput, NewPnrRequestOutput, Piu,
    PiuInfo, Pnr, PnrFilter, RequestState, Role, SubmitPnrResponseInput, TerminatePnrRequestInput,
};
pub use errors::{ErrorKind, ExchangeError, LedgerError, RepositoryError};
pub use keys::ObjectType;
pub use response::{digest_response, ResponseDigest};
