//! # Outbound Ports (Driven Ports)
//!
//! What the exchange core requires from its environment: the storage port
//! ([`Repository`]) and, one level below, the ledger host surface
//! ([`LedgerHost`]) the production adapters are built on.
//!
//! An in-memory [`LedgerHost`] lives here for tests, next to the trait it
//! implements.

use crate::domain::entities::{GcMetadata, Piu, Pnr, PnrFilter};
use crate::domain::errors::{LedgerError, RepositoryError};
use std::collections::{BTreeMap, HashMap};

/// Storage port for PIU, PNR and GC persistence.
///
/// Production: `PrivateDataRepository` and `PublicLedgerRepository`.
/// Testing: `InMemoryRepository`.
///
/// Inserts fail with `AlreadyExists` when the key is taken; updates fail
/// with `NotFound` when it is not. The `_local` variants touch only the
/// caller's own collection where the shared ones write to both parties.
/// Purge removes the payload projection and is distinct from delete: purge
/// is the host's hard-delete that survives collection replay.
pub trait Repository {
    fn piu_exists(&self, id: &str) -> Result<bool, RepositoryError>;
    fn get_piu(&self, id: &str) -> Result<Piu, RepositoryError>;
    fn get_pius(&self) -> Result<Vec<Piu>, RepositoryError>;
    fn insert_piu(&mut self, id: &str, piu: Piu) -> Result<(), RepositoryError>;
    fn update_piu(&mut self, id: &str, piu: Piu) -> Result<(), RepositoryError>;

    fn pnr_exists(&self, id: &str) -> Result<bool, RepositoryError>;
    fn get_pnr(&self, id: &str) -> Result<Pnr, RepositoryError>;
    /// All PNRs visible to the caller that match `filter`.
    fn get_pnrs(&self, filter: &PnrFilter) -> Result<Vec<Pnr>, RepositoryError>;
    fn insert_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError>;
    fn update_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError>;
    /// Update only the caller's local collection; used by terminate.
    fn update_local_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError>;
    /// Remove the payload projection from both collections, keep metadata.
    fn purge_pnr_data(&mut self, id: &str) -> Result<(), RepositoryError>;
    /// Remove the payload projection from the local collection only.
    fn purge_local_pnr_data(&mut self, id: &str) -> Result<(), RepositoryError>;

    fn gc_metadata_exists(&self, id: &str) -> Result<bool, RepositoryError>;
    fn get_gc_metadata(&self, id: &str) -> Result<GcMetadata, RepositoryError>;
    fn get_gc_metadatas(&self) -> Result<Vec<GcMetadata>, RepositoryError>;
    /// The `pnr` argument carries the routing to the peer's collection.
    fn insert_gc_metadata(&mut self, pnr: &Pnr, gc: GcMetadata) -> Result<(), RepositoryError>;
    fn update_gc_metadata(&mut self, pnr: &Pnr, gc: GcMetadata) -> Result<(), RepositoryError>;
    fn delete_gc_metadata(&mut self, pnr: &Pnr) -> Result<(), RepositoryError>;
    fn delete_local_gc_metadata(&mut self, id: &str) -> Result<(), RepositoryError>;
}

impl<R: Repository + ?Sized> Repository for &mut R {
    fn piu_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        (**self).piu_exists(id)
    }
    fn get_piu(&self, id: &str) -> Result<Piu, RepositoryError> {
        (**self).get_piu(id)
    }
    fn get_pius(&self) -> Result<Vec<Piu>, RepositoryError> {
        (**self).get_pius()
    }
    fn insert_piu(&mut self, id: &str, piu: Piu) -> Result<(), RepositoryError> {
        (**self).insert_piu(id, piu)
    }
    fn update_piu(&mut self, id: &str, piu: Piu) -> Result<(), RepositoryError> {
        (**self).update_piu(id, piu)
    }
    fn pnr_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        (**self).pnr_exists(id)
    }
    fn get_pnr(&self, id: &str) -> Result<Pnr, RepositoryError> {
        (**self).get_pnr(id)
    }
    fn get_pnrs(&self, filter: &PnrFilter) -> Result<Vec<Pnr>, RepositoryError> {
        (**self).get_pnrs(filter)
    }
    fn insert_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError> {
        (**self).insert_pnr(id, pnr)
    }
    fn update_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError> {
        (**self).update_pnr(id, pnr)
    }
    fn update_local_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError> {
        (**self).update_local_pnr(id, pnr)
    }
    fn purge_pnr_data(&mut self, id: &str) -> Result<(), RepositoryError> {
        (**self).purge_pnr_data(id)
    }
    fn purge_local_pnr_data(&mut self, id: &str) -> Result<(), RepositoryError> {
        (**self).purge_local_pnr_data(id)
    }
    fn gc_metadata_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        (**self).gc_metadata_exists(id)
    }
    fn get_gc_metadata(&self, id: &str) -> Result<GcMetadata, RepositoryError> {
        (**self).get_gc_metadata(id)
    }
    fn get_gc_metadatas(&self) -> Result<Vec<GcMetadata>, RepositoryError> {
        (**self).get_gc_metadatas()
    }
    fn insert_gc_metadata(&mut self, pnr: &Pnr, gc: GcMetadata) -> Result<(), RepositoryError> {
        (**self).insert_gc_metadata(pnr, gc)
    }
    fn update_gc_metadata(&mut self, pnr: &Pnr, gc: GcMetadata) -> Result<(), RepositoryError> {
        (**self).update_gc_metadata(pnr, gc)
    }
    fn delete_gc_metadata(&mut self, pnr: &Pnr) -> Result<(), RepositoryError> {
        (**self).delete_gc_metadata(pnr)
    }
    fn delete_local_gc_metadata(&mut self, id: &str) -> Result<(), RepositoryError> {
        (**self).delete_local_gc_metadata(id)
    }
}

/// The slice of the ledger host the storage adapters consume.
///
/// Public state is visible to every party; private data lives in named
/// per-party collections. `purge_private_data` is the host's hard-delete
/// (the record disappears from replay as well) and must stay distinct from
/// `delete_private_data`.
///
/// Prefix scans return materialized vectors so no host iterator outlives
/// the invocation.
pub trait LedgerHost {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;
    fn delete_state(&mut self, key: &str) -> Result<(), LedgerError>;
    fn get_state_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;

    fn get_private_data(&self, collection: &str, key: &str)
        -> Result<Option<Vec<u8>>, LedgerError>;
    fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), LedgerError>;
    fn delete_private_data(&mut self, collection: &str, key: &str) -> Result<(), LedgerError>;
    fn purge_private_data(&mut self, collection: &str, key: &str) -> Result<(), LedgerError>;
    fn get_private_data_by_prefix(
        &self,
        collection: &str,
        prefix: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;

    /// Per-invocation side-channel payload, by key.
    fn transient(&self, key: &str) -> Option<Vec<u8>>;
    /// The caller's host-asserted membership identity.
    fn client_id(&self) -> Result<String, LedgerError>;
}

/// In-memory ledger host for unit tests.
///
/// Keys are kept ordered so prefix scans are deterministic. Purged keys are
/// recorded so tests can assert that purge, not delete, was issued.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    public: BTreeMap<String, Vec<u8>>,
    collections: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    transient: HashMap<String, Vec<u8>>,
    client: String,
    purged: Vec<(String, String)>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity returned by `client_id`.
    pub fn set_client(&mut self, id: impl Into<String>) {
        self.client = id.into();
    }

    /// Stage a transient payload for the next invocation.
    pub fn set_transient(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.transient.insert(key.into(), value.into());
    }

    pub fn clear_transient(&mut self) {
        self.transient.clear();
    }

    /// Every `(collection, key)` purge issued so far.
    pub fn purged(&self) -> &[(String, String)] {
        &self.purged
    }

    /// Direct view of a private collection, for assertions.
    pub fn collection(&self, name: &str) -> Option<&BTreeMap<String, Vec<u8>>> {
        self.collections.get(name)
    }
}

impl LedgerHost for InMemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.public.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.public.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete_state(&mut self, key: &str) -> Result<(), LedgerError> {
        self.public.remove(key);
        Ok(())
    }

    fn get_state_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        Ok(self
            .public
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get_private_data(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.get(key))
            .cloned())
    }

    fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), LedgerError> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete_private_data(&mut self, collection: &str, key: &str) -> Result<(), LedgerError> {
        if let Some(c) = self.collections.get_mut(collection) {
            c.remove(key);
        }
        Ok(())
    }

    fn purge_private_data(&mut self, collection: &str, key: &str) -> Result<(), LedgerError> {
        if let Some(c) = self.collections.get_mut(collection) {
            c.remove(key);
        }
        self.purged.push((collection.to_string(), key.to_string()));
        Ok(())
    }

    fn get_private_data_by_prefix(
        &self,
        collection: &str,
        prefix: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        Ok(self
            .collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .filter(|(k, _)| k.starts_with(prefix))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn transient(&self, key: &str) -> Option<Vec<u8>> {
        self.transient.get(key).cloned()
    }

    fn client_id(&self) -> Result<String, LedgerError> {
        if self.client.is_empty() {
            return Err(LedgerError::new("no client identity on the invocation"));
        }
        Ok(self.client.clone())
    }
}
