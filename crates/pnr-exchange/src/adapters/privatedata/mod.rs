//! # Private-Collection Storage Adapter
//!
//! Backs the storage port against a ledger host with per-party private
//! collections.
//!
//! ## Routing and layout
//!
//! - PIUs live in public state under `piu` composite keys.
//! - Each PNR is split into a `pnrMeta` row and a `pnrData` row in the
//!   private collections of both parties; GC metadata is a `gc` row, also
//!   in both collections.
//! - The collection of PIU `X` is named `XCollection`. The adapter keeps
//!   the caller's local collection and derives the peer's from the PNR.
//! - Shared writes land the same bytes in both collections; the host's
//!   transaction binds the two writes into one atomic commit, so the
//!   adapter surfaces the first failure and writes nothing else.
//! - Purge uses the host's hard-delete on the `pnrData` key only; the
//!   metadata row outlives it.

mod models;

use crate::domain::entities::{GcMetadata, Piu, Pnr, PnrFilter};
use crate::domain::errors::RepositoryError;
use crate::domain::keys::ObjectType;
use crate::ports::outbound::{LedgerHost, Repository};
use models::{decode, encode, PnrData, PnrMeta};
use tracing::{error, warn};

/// Name of the private collection owned by `piu_id`.
pub fn collection_name(piu_id: &str) -> String {
    format!("{piu_id}Collection")
}

/// Storage adapter scoped to one invocation by one PIU.
pub struct PrivateDataRepository<'a, H: LedgerHost> {
    host: &'a mut H,
    piu_id: String,
    local_collection: String,
}

impl<'a, H: LedgerHost> PrivateDataRepository<'a, H> {
    pub fn new(host: &'a mut H, piu_id: impl Into<String>) -> Self {
        let piu_id = piu_id.into();
        let local_collection = collection_name(&piu_id);
        PrivateDataRepository {
            host,
            piu_id,
            local_collection,
        }
    }

    /// The peer's collection for this PNR: the requester's if the caller is
    /// the responder, the responder's otherwise.
    fn remote_collection(&self, pnr: &Pnr) -> String {
        collection_name(pnr.remote_piu(&self.piu_id))
    }

    fn put_to_both_collections(
        &mut self,
        remote_collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), RepositoryError> {
        if let Err(err) = self.host.put_private_data(remote_collection, key, value) {
            error!(key, collection = remote_collection, error = %err,
                "could not put data into remote private collection");
            return Err(err.into());
        }
        if let Err(err) = self.host.put_private_data(&self.local_collection, key, value) {
            error!(key, collection = %self.local_collection, error = %err,
                "could not put data into local private collection");
            return Err(err.into());
        }
        Ok(())
    }

    fn get_pnr_meta(&self, id: &str) -> Result<PnrMeta, RepositoryError> {
        let key = ObjectType::PnrMeta.key(id);
        let bytes = self
            .host
            .get_private_data(&self.local_collection, &key)?
            .ok_or_else(|| RepositoryError::NotFound {
                what: "PNR",
                id: id.to_string(),
            })?;
        decode("PNR metadata", &bytes)
    }

    fn get_pnr_data(&self, id: &str) -> Result<PnrData, RepositoryError> {
        let key = ObjectType::PnrData.key(id);
        let bytes = self
            .host
            .get_private_data(&self.local_collection, &key)?
            .ok_or_else(|| RepositoryError::NotFound {
                what: "PNR payload",
                id: id.to_string(),
            })?;
        decode("PNR payload", &bytes)
    }
}

impl<H: LedgerHost> Repository for PrivateDataRepository<'_, H> {
    fn piu_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        let key = ObjectType::Piu.key(id);
        Ok(self.host.get_state(&key)?.is_some())
    }

    fn get_piu(&self, id: &str) -> Result<Piu, RepositoryError> {
        let key = ObjectType::Piu.key(id);
        let bytes = self
            .host
            .get_state(&key)?
            .ok_or_else(|| RepositoryError::NotFound {
                what: "PIU",
                id: id.to_string(),
            })?;
        decode("PIU", &bytes)
    }

    fn get_pius(&self) -> Result<Vec<Piu>, RepositoryError> {
        let mut result = Vec::new();
        for (_, bytes) in self.host.get_state_by_prefix(&ObjectType::Piu.prefix())? {
            result.push(decode("PIU", &bytes)?);
        }
        Ok(result)
    }

    fn insert_piu(&mut self, id: &str, piu: Piu) -> Result<(), RepositoryError> {
        if self.piu_exists(id)? {
            return Err(RepositoryError::AlreadyExists {
                what: "PIU",
                id: id.to_string(),
            });
        }
        let key = ObjectType::Piu.key(id);
        let model = encode("PIU", &piu)?;
        self.host.put_state(&key, &model).map_err(|err| {
            error!(id, error = %err, "could not put PIU into public ledger");
            err.into()
        })
    }

    fn update_piu(&mut self, id: &str, piu: Piu) -> Result<(), RepositoryError> {
        if !self.piu_exists(id)? {
            return Err(RepositoryError::NotFound {
                what: "PIU",
                id: id.to_string(),
            });
        }
        let key = ObjectType::Piu.key(id);
        let model = encode("PIU", &piu)?;
        self.host.put_state(&key, &model).map_err(|err| {
            error!(id, error = %err, "could not put PIU into public ledger");
            err.into()
        })
    }

    fn pnr_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        let key = ObjectType::PnrMeta.key(id);
        Ok(self
            .host
            .get_private_data(&self.local_collection, &key)?
            .is_some())
    }

    fn get_pnr(&self, id: &str) -> Result<Pnr, RepositoryError> {
        let meta = self.get_pnr_meta(id)?;
        if !meta.state.has_payload() {
            return Ok(meta.into_pnr(PnrData::default()));
        }
        let data = self.get_pnr_data(id)?;
        Ok(meta.into_pnr(data))
    }

    fn get_pnrs(&self, filter: &PnrFilter) -> Result<Vec<Pnr>, RepositoryError> {
        let mut result = Vec::new();

        let rows = self
            .host
            .get_private_data_by_prefix(&self.local_collection, &ObjectType::PnrMeta.prefix())?;

        // A single bad row must not abort the scan.
        for (key, bytes) in rows {
            let meta: PnrMeta = match decode("PNR metadata", &bytes) {
                Ok(meta) => meta,
                Err(err) => {
                    warn!(key = %key, error = %err, "skipping malformed PNR metadata row");
                    continue;
                }
            };

            let pnr = meta.into_pnr(PnrData::default());
            if !filter.matches(&pnr) {
                continue;
            }

            if !pnr.state.has_payload() {
                result.push(pnr);
                continue;
            }

            match self.get_pnr_data(&pnr.id) {
                Ok(data) => {
                    let mut pnr = pnr;
                    pnr.request_data = data.request_data;
                    pnr.response_data = data.response_data;
                    result.push(pnr);
                }
                Err(err) => {
                    warn!(id = %pnr.id, error = %err, "skipping PNR with unreadable payload row");
                    continue;
                }
            }
        }

        Ok(result)
    }

    fn insert_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError> {
        if self.pnr_exists(id)? {
            return Err(RepositoryError::AlreadyExists {
                what: "PNR",
                id: id.to_string(),
            });
        }

        let meta_key = ObjectType::PnrMeta.key(id);
        let data_key = ObjectType::PnrData.key(id);
        let meta_model = encode("PNR metadata", &PnrMeta::from_pnr(&pnr))?;
        let data_model = encode("PNR payload", &PnrData::from_pnr(&pnr))?;

        let remote_collection = self.remote_collection(&pnr);
        self.put_to_both_collections(&remote_collection, &meta_key, &meta_model)?;
        self.put_to_both_collections(&remote_collection, &data_key, &data_model)
    }

    fn update_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError> {
        // The stored state decides whether a payload row exists to rewrite.
        let old_meta = self.get_pnr_meta(id)?;

        let meta_key = ObjectType::PnrMeta.key(id);
        let meta_model = encode("PNR metadata", &PnrMeta::from_pnr(&pnr))?;

        let remote_collection = self.remote_collection(&pnr);
        self.put_to_both_collections(&remote_collection, &meta_key, &meta_model)?;

        if !old_meta.state.has_payload() {
            return Ok(());
        }

        let data_key = ObjectType::PnrData.key(id);
        let data_model = encode("PNR payload", &PnrData::from_pnr(&pnr))?;
        self.put_to_both_collections(&remote_collection, &data_key, &data_model)
    }

    fn update_local_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError> {
        let old_meta = self.get_pnr_meta(id)?;

        let meta_key = ObjectType::PnrMeta.key(id);
        let meta_model = encode("PNR metadata", &PnrMeta::from_pnr(&pnr))?;
        self.host
            .put_private_data(&self.local_collection, &meta_key, &meta_model)?;

        if !old_meta.state.has_payload() {
            return Ok(());
        }

        let data_key = ObjectType::PnrData.key(id);
        let data_model = encode("PNR payload", &PnrData::from_pnr(&pnr))?;
        self.host
            .put_private_data(&self.local_collection, &data_key, &data_model)
            .map_err(Into::into)
    }

    fn purge_pnr_data(&mut self, id: &str) -> Result<(), RepositoryError> {
        let meta = self.get_pnr_meta(id)?;
        let pnr = meta.into_pnr(PnrData::default());

        let data_key = ObjectType::PnrData.key(id);
        let remote_collection = self.remote_collection(&pnr);

        if let Err(err) = self.host.purge_private_data(&remote_collection, &data_key) {
            error!(id, collection = %remote_collection, error = %err,
                "could not purge PNR data from remote collection");
            return Err(err.into());
        }
        if let Err(err) = self
            .host
            .purge_private_data(&self.local_collection, &data_key)
        {
            error!(id, collection = %self.local_collection, error = %err,
                "could not purge PNR data from local collection");
            return Err(err.into());
        }
        Ok(())
    }

    fn purge_local_pnr_data(&mut self, id: &str) -> Result<(), RepositoryError> {
        if !self.pnr_exists(id)? {
            return Err(RepositoryError::NotFound {
                what: "PNR",
                id: id.to_string(),
            });
        }

        let data_key = ObjectType::PnrData.key(id);
        self.host
            .purge_private_data(&self.local_collection, &data_key)
            .map_err(|err| {
                error!(id, collection = %self.local_collection, error = %err,
                    "could not purge PNR data from local collection");
                err.into()
            })
    }

    fn gc_metadata_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        let key = ObjectType::Gc.key(id);
        Ok(self
            .host
            .get_private_data(&self.local_collection, &key)?
            .is_some())
    }

    fn get_gc_metadata(&self, id: &str) -> Result<GcMetadata, RepositoryError> {
        let key = ObjectType::Gc.key(id);
        let bytes = self
            .host
            .get_private_data(&self.local_collection, &key)?
            .ok_or_else(|| RepositoryError::NotFound {
                what: "GC metadata",
                id: id.to_string(),
            })?;
        decode("GC metadata", &bytes)
    }

    fn get_gc_metadatas(&self) -> Result<Vec<GcMetadata>, RepositoryError> {
        let mut result = Vec::new();
        let rows = self
            .host
            .get_private_data_by_prefix(&self.local_collection, &ObjectType::Gc.prefix())?;
        for (_, bytes) in rows {
            result.push(decode("GC metadata", &bytes)?);
        }
        Ok(result)
    }

    fn insert_gc_metadata(&mut self, pnr: &Pnr, gc: GcMetadata) -> Result<(), RepositoryError> {
        if self.gc_metadata_exists(&pnr.id)? {
            return Err(RepositoryError::AlreadyExists {
                what: "GC metadata",
                id: pnr.id.clone(),
            });
        }
        let key = ObjectType::Gc.key(&pnr.id);
        let model = encode("GC metadata", &gc)?;
        let remote_collection = self.remote_collection(pnr);
        self.put_to_both_collections(&remote_collection, &key, &model)
    }

    fn update_gc_metadata(&mut self, pnr: &Pnr, gc: GcMetadata) -> Result<(), RepositoryError> {
        if !self.gc_metadata_exists(&pnr.id)? {
            return Err(RepositoryError::NotFound {
                what: "GC metadata",
                id: pnr.id.clone(),
            });
        }
        let key = ObjectType::Gc.key(&pnr.id);
        let model = encode("GC metadata", &gc)?;
        let remote_collection = self.remote_collection(pnr);
        self.put_to_both_collections(&remote_collection, &key, &model)
    }

    fn delete_gc_metadata(&mut self, pnr: &Pnr) -> Result<(), RepositoryError> {
        if !self.gc_metadata_exists(&pnr.id)? {
            return Err(RepositoryError::NotFound {
                what: "GC metadata",
                id: pnr.id.clone(),
            });
        }
        let key = ObjectType::Gc.key(&pnr.id);
        let remote_collection = self.remote_collection(pnr);

        if let Err(err) = self.host.delete_private_data(&remote_collection, &key) {
            error!(id = %pnr.id, collection = %remote_collection, error = %err,
                "could not delete GC metadata from remote collection");
            return Err(err.into());
        }
        self.host
            .delete_private_data(&self.local_collection, &key)
            .map_err(|err| {
                error!(id = %pnr.id, collection = %self.local_collection, error = %err,
                    "could not delete GC metadata from local collection");
                err.into()
            })
    }

    fn delete_local_gc_metadata(&mut self, id: &str) -> Result<(), RepositoryError> {
        if !self.gc_metadata_exists(id)? {
            return Err(RepositoryError::NotFound {
                what: "GC metadata",
                id: id.to_string(),
            });
        }
        let key = ObjectType::Gc.key(id);
        self.host
            .delete_private_data(&self.local_collection, &key)
            .map_err(|err| {
                error!(id, collection = %self.local_collection, error = %err,
                    "could not delete GC metadata from local collection");
                err.into()
            })
    }
}
