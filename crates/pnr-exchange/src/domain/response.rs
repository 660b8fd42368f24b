//! # Response Digesting
//!
//! Walks a submitted response payload, hashes each embedded passenger
//! sub-record in document order, and collects the earliest `created_on`
//! timestamp for the garbage-collection metadata.

use crate::domain::canonical;
use crate::domain::errors::ExchangeError;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Array of dataset wrappers inside the response document.
const PASSENGER_DATASETS_KEY: &str = "passengerDatasets";
/// Sub-record inside each dataset wrapper.
const PASSENGER_RECORD_KEY: &str = "passenger_obj";
/// Path of the record creation timestamp inside a sub-record.
const CREATED_ON_PATH: [&str; 3] = ["pnr_obj", "iata_pnrgov_notif_rq_obj", "created_on"];

/// What a response payload contributes to the PNR and its GC row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseDigest {
    /// Lowercase-hex SHA-256 of each canonicalized sub-record, in order.
    pub hashes: Vec<String>,
    /// Earliest `created_on` timestamp seen across the sub-records.
    pub earliest_created_on: Option<DateTime<Utc>>,
}

/// Digest `response_data` as an opaque JSON document.
///
/// A document without `passengerDatasets` contributes nothing. A document
/// that fails to parse, a sub-record that cannot be canonicalized, or a
/// `created_on` value that is not an RFC-3339 timestamp fails the whole
/// submission.
pub fn digest_response(response_data: &str) -> Result<ResponseDigest, ExchangeError> {
    let mut digest = ResponseDigest::default();

    if response_data.is_empty() {
        return Ok(digest);
    }

    let document: Value =
        serde_json::from_str(response_data).map_err(|err| ExchangeError::MalformedResponse {
            reason: err.to_string(),
        })?;

    let Some(datasets) = document.get(PASSENGER_DATASETS_KEY).and_then(Value::as_array) else {
        return Ok(digest);
    };

    for entry in datasets {
        let Some(record) = entry.get(PASSENGER_RECORD_KEY) else {
            continue;
        };

        let hash =
            canonical::digest_hex(record).map_err(|err| ExchangeError::MalformedResponse {
                reason: err.to_string(),
            })?;
        digest.hashes.push(hash);

        if let Some(created_on) = lookup(record, &CREATED_ON_PATH) {
            let text = created_on.as_str().unwrap_or_default();
            let timestamp = DateTime::parse_from_rfc3339(text)
                .map_err(|err| ExchangeError::BadCreationTimestamp {
                    value: text.to_string(),
                    reason: err.to_string(),
                })?
                .with_timezone(&Utc);

            digest.earliest_created_on = match digest.earliest_created_on {
                Some(existing) => Some(existing.min(timestamp)),
                None => Some(timestamp),
            };
        }
    }

    Ok(digest)
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, segment| v.get(segment))
}
