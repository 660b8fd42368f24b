//! Persisted shapes for the split PNR record.
//!
//! A PNR is stored as two rows: the metadata projection (long-lived) and
//! the payload projection (purge-eligible). Both serialize with the same
//! wire field names as the combined entity.

use crate::domain::entities::{Pnr, RequestState};
use crate::domain::errors::RepositoryError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Metadata projection of a PNR. Survives purge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PnrMeta {
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
    #[serde(rename = "pnrHashes", default)]
    pub pnr_hashes: Vec<String>,
}

/// Payload projection of a PNR. Removed by purge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct PnrData {
    #[serde(rename = "requestData", default)]
    pub request_data: String,
    #[serde(rename = "responseData", default)]
    pub response_data: String,
}

impl PnrMeta {
    pub fn from_pnr(pnr: &Pnr) -> Self {
        PnrMeta {
            id: pnr.id.clone(),
            requesting_piu: pnr.requesting_piu.clone(),
            responding_piu: pnr.responding_piu.clone(),
            request_timestamp: pnr.request_timestamp,
            response_timestamp: pnr.response_timestamp,
            state: pnr.state,
            pnr_hashes: pnr.pnr_hashes.clone(),
        }
    }

    /// Recombine the two projections into the full entity.
    pub fn into_pnr(self, data: PnrData) -> Pnr {
        Pnr {
            id: self.id,
            requesting_piu: self.requesting_piu,
            responding_piu: self.responding_piu,
            request_timestamp: self.request_timestamp,
            response_timestamp: self.response_timestamp,
            state: self.state,
            request_data: data.request_data,
            response_data: data.response_data,
            pnr_hashes: self.pnr_hashes,
        }
    }
}

impl PnrData {
    pub fn from_pnr(pnr: &Pnr) -> Self {
        PnrData {
            request_data: pnr.request_data.clone(),
            response_data: pnr.response_data.clone(),
        }
    }
}

pub(crate) fn encode<T: Serialize>(what: &'static str, value: &T) -> Result<Vec<u8>, RepositoryError> {
    serde_json::to_vec(value).map_err(|err| RepositoryError::Malformed {
        what,
        reason: err.to_string(),
    })
}

pub(crate) fn decode<T: DeserializeOwned>(
    what: &'static str,
    bytes: &[u8],
) -> Result<T, RepositoryError> {
    serde_json::from_slice(bytes).map_err(|err| RepositoryError::Malformed {
        what,
        reason: err.to_string(),
    })
}
