//! # JSON Canonicalization and Hashing
//!
//! Deterministic byte form for JSON values so that logically equal values
//! hash equally: object keys sorted lexicographically, no insignificant
//! whitespace, shortest stable number rendering. `serde_json`'s value model
//! provides exactly this (its maps are ordered by key and its compact
//! writer emits shortest integer/float forms), so canonicalization is a
//! re-serialization of the parsed value.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// The canonical byte form of `value`.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Lowercase-hex SHA-256 over the canonical bytes of `value`.
pub fn digest_hex(value: &Value) -> Result<String, serde_json::Error> {
    let bytes = canonical_bytes(value)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
