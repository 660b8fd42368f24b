//! # Domain Entities
//!
//! The business records exchanged between two Passenger Information Units
//! and the pure predicates over them. Everything here is side-effect free;
//! persistence shapes live with the storage adapters.
//!
//! All records serialize to JSON with the wire field names
//! (`requestingPIU`, `pnrHashes`, ...) used both on the invocation surface
//! and in the persisted models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transient-channel key carrying the request payload bytes.
pub const REQUEST_DATA_TRANSIENT_KEY: &str = "requestData";
/// Transient-channel key carrying the response payload bytes.
pub const RESPONSE_DATA_TRANSIENT_KEY: &str = "responseData";

/// A Passenger Information Unit: one party of the exchange.
///
/// `id` is the host-asserted membership identity of the organization.
/// Created on first `SetPIUInfo` from that identity, update-only afterwards,
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Piu {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "adminEmail", default)]
    pub admin_email: String,
}

/// Caller-supplied PIU attributes for `SetPIUInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PiuInfo {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "adminEmail", default)]
    pub admin_email: String,
}

impl Piu {
    /// Build a fresh PIU row for `id` from the submitted attributes.
    pub fn from_info(id: impl Into<String>, info: PiuInfo) -> Self {
        Piu {
            id: id.into(),
            name: info.name,
            admin_email: info.admin_email,
        }
    }

    /// Partial update: empty fields in `info` leave the stored value untouched.
    pub fn apply_info(mut self, info: PiuInfo) -> Self {
        if !info.name.is_empty() {
            self.name = info.name;
        }
        if !info.admin_email.is_empty() {
            self.admin_email = info.admin_email;
        }
        self
    }
}

/// Lifecycle state of a PNR exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestState {
    /// Created by the requester, not yet seen by the responder.
    #[default]
    Pending,
    /// The responder has confirmed the request.
    PendingConfirmed,
    /// The responder has submitted a positive response.
    Ack,
    /// The requester has confirmed the positive response; payload purged.
    AckConfirmed,
    /// The responder has submitted a negative response.
    Nack,
    /// The requester has confirmed the negative response; payload purged.
    NackConfirmed,
    /// Terminated by one party, on that party's side only.
    Terminated,
}

/// Which side of a PNR exchange a party is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Requester,
    Responder,
}

/// Confirmation transition table: from-state, who may confirm, to-state.
///
/// Everything not listed here is an illegal confirmation.
const CONFIRMATIONS: &[(RequestState, Role, RequestState)] = &[
    (RequestState::Pending, Role::Responder, RequestState::PendingConfirmed),
    (RequestState::Ack, Role::Requester, RequestState::AckConfirmed),
    (RequestState::Nack, Role::Requester, RequestState::NackConfirmed),
];

impl RequestState {
    /// The wire name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Pending => "Pending",
            RequestState::PendingConfirmed => "PendingConfirmed",
            RequestState::Ack => "Ack",
            RequestState::AckConfirmed => "AckConfirmed",
            RequestState::Nack => "Nack",
            RequestState::NackConfirmed => "NackConfirmed",
            RequestState::Terminated => "Terminated",
        }
    }

    /// Whether the payload projection is kept while in this state.
    ///
    /// Once both sides have confirmed a response, or the record has been
    /// terminated, the payload is gone and only metadata survives.
    pub fn has_payload(&self) -> bool {
        !matches!(
            self,
            RequestState::AckConfirmed | RequestState::NackConfirmed | RequestState::Terminated
        )
    }

    /// The confirmed counterpart of this state; identity when there is none.
    pub fn confirmed(&self) -> RequestState {
        CONFIRMATIONS
            .iter()
            .find(|(from, _, _)| from == self)
            .map(|(_, _, to)| *to)
            .unwrap_or(*self)
    }

    /// Look up the confirmation transition for `role`, if one is allowed.
    pub fn confirmation(&self, role: Role) -> Option<RequestState> {
        CONFIRMATIONS
            .iter()
            .find(|(from, by, _)| from == self && *by == role)
            .map(|(_, _, to)| *to)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Passenger Name Record exchange between two PIUs.
///
/// `request_data` and `response_data` are the payload projection; every
/// other field belongs to the metadata projection and survives a purge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pnr {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "requestingPIU", default)]
    pub requesting_piu: String,
    #[serde(rename = "respondingPIU", default)]
    pub responding_piu: String,
    #[serde(rename = "requestTimestamp", default)]
    pub request_timestamp: DateTime<Utc>,
    #[serde(rename = "responseTimestamp", default, skip_serializing_if = "Option::is_none")]
    pub response_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: RequestState,
    #[serde(rename = "requestData", default)]
    pub request_data: String,
    #[serde(rename = "responseData", default)]
    pub response_data: String,
    /// Lowercase hex SHA-256 digests of the canonicalized response
    /// sub-records, in document order.
    #[serde(rename = "pnrHashes", default)]
    pub pnr_hashes: Vec<String>,
}

impl Pnr {
    /// The role `piu_id` plays in this exchange, if any.
    pub fn role_of(&self, piu_id: &str) -> Option<Role> {
        if self.requesting_piu == piu_id {
            Some(Role::Requester)
        } else if self.responding_piu == piu_id {
            Some(Role::Responder)
        } else {
            None
        }
    }

    /// The id of the other party, seen from `piu_id`.
    pub fn remote_piu(&self, piu_id: &str) -> &str {
        if self.requesting_piu == piu_id {
            &self.responding_piu
        } else {
            &self.requesting_piu
        }
    }
}

/// Read-time predicate over PNRs. Unset fields do not constrain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PnrFilter {
    /// Inclusive lower bound on the request timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the request timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RequestState>,
    #[serde(rename = "requestingPIU", default, skip_serializing_if = "Option::is_none")]
    pub requesting_piu: Option<String>,
    #[serde(rename = "respondingPIU", default, skip_serializing_if = "Option::is_none")]
    pub responding_piu: Option<String>,
}

impl PnrFilter {
    /// Conjunction of all set constraints. Empty-string PIU constraints are
    /// treated as unset, mirroring the wire convention that missing fields
    /// arrive as zero values.
    pub fn matches(&self, pnr: &Pnr) -> bool {
        if let Some(start) = self.start {
            if pnr.request_timestamp < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if pnr.request_timestamp > end {
                return false;
            }
        }
        if let Some(state) = self.state {
            if pnr.state != state {
                return false;
            }
        }
        if let Some(id) = self.requesting_piu.as_deref().filter(|s| !s.is_empty()) {
            if pnr.requesting_piu != id {
                return false;
            }
        }
        if let Some(id) = self.responding_piu.as_deref().filter(|s| !s.is_empty()) {
            if pnr.responding_piu != id {
                return false;
            }
        }
        true
    }
}

/// Per-PNR garbage-collection metadata.
///
/// `creation_timestamp` is the minimum of the request timestamp and every
/// `created_on` timestamp found inside the response sub-records; an external
/// GC driver uses it to decide when a record's payload must be force-purged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GcMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "creationTimestamp", default)]
    pub creation_timestamp: DateTime<Utc>,
}

/// Payload bytes from the transient channel as opaque text; absent means empty.
pub fn optional_payload(bytes: Option<&[u8]>) -> String {
    bytes
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default()
}

/// Argument record for `NewPNRRequest`.
///
/// The request payload never travels in the argument JSON; the invocation
/// adapter fills `request_data` from the transient channel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewPnrRequestInput {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "respondingPIU", default)]
    pub responding_piu: String,
    #[serde(rename = "requestTimestamp", default)]
    pub request_timestamp: DateTime<Utc>,
    #[serde(skip)]
    pub request_data: Option<String>,
}

/// Result record for `NewPNRRequest`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewPnrRequestOutput {
    pub id: String,
}

/// Argument record for `SubmitPNRResponseAck` / `SubmitPNRResponseNack`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubmitPnrResponseInput {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "responseTimestamp", default)]
    pub response_timestamp: DateTime<Utc>,
    #[serde(skip)]
    pub response_data: Option<String>,
}

/// Argument record for `ConfirmPNR`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfirmPnrInput {
    #[serde(default)]
    pub id: String,
}

/// Argument record for `TerminatePNRRequest`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TerminatePnrRequestInput {
    #[serde(default)]
    pub id: String,
}
