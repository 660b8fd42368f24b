//! # Error Types
//!
//! Two layers of errors, each kind-tagged for the invocation surface:
//!
//! - [`RepositoryError`]: storage port failures (adapters).
//! - [`ExchangeError`]: operation failures (service and contract).
//!
//! Validation failures are reported directly as `InvalidArgument`; storage
//! failures after validation surface as `Internal`. Nothing retries, since
//! the host transaction abort is the recovery mechanism.

use crate::domain::entities::RequestState;
use std::fmt;
use thiserror::Error;

/// Coarse error classification exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::Internal => "Internal",
        };
        f.write_str(name)
    }
}

/// Failure reported by the ledger host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LedgerError {
    pub message: String,
}

impl LedgerError {
    pub fn new(message: impl Into<String>) -> Self {
        LedgerError {
            message: message.into(),
        }
    }
}

/// Storage port failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("{what} already exists: {id}")]
    AlreadyExists { what: &'static str, id: String },

    /// A stored model could not be encoded or decoded.
    #[error("malformed {what} model: {reason}")]
    Malformed { what: &'static str, reason: String },

    #[error("ledger host failure: {0}")]
    Host(#[from] LedgerError),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::NotFound { .. } => ErrorKind::NotFound,
            RepositoryError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            RepositoryError::Malformed { .. } | RepositoryError::Host(_) => ErrorKind::Internal,
        }
    }
}

/// Operation-level failures of the PNR exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("cannot request data from itself")]
    SelfRequest,

    #[error("PNR request id must not be empty")]
    EmptyId,

    #[error("unknown responding PIU: {id}")]
    UnknownRespondingPiu { id: String },

    #[error("unknown PNR request: {id}")]
    UnknownPnr { id: String },

    #[error("not the requester or responder of this PNR request: {caller}")]
    NotParticipant { caller: String },

    #[error("not allowed to respond to this request: {caller}")]
    NotResponder { caller: String },

    #[error("PNR request must be in {expected} state, found {found}")]
    WrongState {
        expected: RequestState,
        found: RequestState,
    },

    #[error("PNR request already confirmed: {id}")]
    AlreadyConfirmed { id: String },

    #[error("cannot confirm a terminated PNR request: {id}")]
    ConfirmTerminated { id: String },

    #[error("cannot confirm PNR request {id} in state {state}")]
    ForbiddenConfirmation { id: String, state: RequestState },

    /// The response payload could not be parsed or a sub-record could not be
    /// canonicalized.
    #[error("malformed response record: {reason}")]
    MalformedResponse { reason: String },

    #[error("could not parse creation timestamp {value:?}: {reason}")]
    BadCreationTimestamp { value: String, reason: String },

    #[error("missing transient data for key {key}")]
    MissingTransient { key: &'static str },

    #[error("malformed {what} argument: {reason}")]
    MalformedArgument { what: &'static str, reason: String },

    #[error("unknown operation: {name}")]
    UnknownOperation { name: String },

    #[error("could not resolve client identity: {reason}")]
    Identity { reason: String },

    #[error("could not encode result: {reason}")]
    EncodeResult { reason: String },

    #[error("storage failure: {0}")]
    Storage(#[source] RepositoryError),
}

impl ExchangeError {
    /// The kind reported to the host.
    ///
    /// Storage failures keep their `NotFound`/`AlreadyExists` tag where the
    /// repository produced one; everything else from storage is `Internal`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::SelfRequest
            | ExchangeError::EmptyId
            | ExchangeError::UnknownRespondingPiu { .. }
            | ExchangeError::UnknownPnr { .. }
            | ExchangeError::NotParticipant { .. }
            | ExchangeError::NotResponder { .. }
            | ExchangeError::WrongState { .. }
            | ExchangeError::AlreadyConfirmed { .. }
            | ExchangeError::ConfirmTerminated { .. }
            | ExchangeError::ForbiddenConfirmation { .. }
            | ExchangeError::MalformedResponse { .. }
            | ExchangeError::BadCreationTimestamp { .. }
            | ExchangeError::MissingTransient { .. }
            | ExchangeError::MalformedArgument { .. }
            | ExchangeError::UnknownOperation { .. } => ErrorKind::InvalidArgument,
            ExchangeError::Identity { .. } | ExchangeError::EncodeResult { .. } => {
                ErrorKind::Internal
            }
            ExchangeError::Storage(inner) => match inner.kind() {
                ErrorKind::NotFound => ErrorKind::NotFound,
                ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
                _ => ErrorKind::Internal,
            },
        }
    }
}

impl From<RepositoryError> for ExchangeError {
    fn from(err: RepositoryError) -> Self {
        ExchangeError::Storage(err)
    }
}
