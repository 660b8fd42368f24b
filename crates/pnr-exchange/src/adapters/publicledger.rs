//! # Public-Ledger Storage Adapter
//!
//! Variant of the storage port that keeps everything in the host's public
//! state, for deployments without private collections. Each PNR is one
//! whole record under a `pnr` composite key; there is no per-party
//! visibility and no hard-delete, so "purge" rewrites the record with
//! emptied payload fields and the `_local` variants alias the shared ones.

use crate::domain::entities::{GcMetadata, Piu, Pnr, PnrFilter};
use crate::domain::errors::RepositoryError;
use crate::domain::keys::ObjectType;
use crate::ports::outbound::{LedgerHost, Repository};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

/// Storage adapter over public ledger state only.
pub struct PublicLedgerRepository<'a, H: LedgerHost> {
    host: &'a mut H,
}

impl<'a, H: LedgerHost> PublicLedgerRepository<'a, H> {
    pub fn new(host: &'a mut H) -> Self {
        PublicLedgerRepository { host }
    }

    fn get_model<T: DeserializeOwned>(
        &self,
        what: &'static str,
        key: &str,
        id: &str,
    ) -> Result<T, RepositoryError> {
        let bytes = self
            .host
            .get_state(key)?
            .ok_or_else(|| RepositoryError::NotFound {
                what,
                id: id.to_string(),
            })?;
        serde_json::from_slice(&bytes).map_err(|err| RepositoryError::Malformed {
            what,
            reason: err.to_string(),
        })
    }

    fn put_model<T: Serialize>(
        &mut self,
        what: &'static str,
        key: &str,
        id: &str,
        value: &T,
    ) -> Result<(), RepositoryError> {
        let model = serde_json::to_vec(value).map_err(|err| RepositoryError::Malformed {
            what,
            reason: err.to_string(),
        })?;
        self.host.put_state(key, &model).map_err(|err| {
            error!(id, error = %err, "could not put model into ledger");
            err.into()
        })
    }
}

impl<H: LedgerHost> Repository for PublicLedgerRepository<'_, H> {
    fn piu_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.host.get_state(&ObjectType::Piu.key(id))?.is_some())
    }

    fn get_piu(&self, id: &str) -> Result<Piu, RepositoryError> {
        self.get_model("PIU", &ObjectType::Piu.key(id), id)
    }

    fn get_pius(&self) -> Result<Vec<Piu>, RepositoryError> {
        let mut result = Vec::new();
        for (_, bytes) in self.host.get_state_by_prefix(&ObjectType::Piu.prefix())? {
            let piu = serde_json::from_slice(&bytes).map_err(|err| RepositoryError::Malformed {
                what: "PIU",
                reason: err.to_string(),
            })?;
            result.push(piu);
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
        self.put_model("PIU", &ObjectType::Piu.key(id), id, &piu)
    }

    fn update_piu(&mut self, id: &str, piu: Piu) -> Result<(), RepositoryError> {
        if !self.piu_exists(id)? {
            return Err(RepositoryError::NotFound {
                what: "PIU",
                id: id.to_string(),
            });
        }
        self.put_model("PIU", &ObjectType::Piu.key(id), id, &piu)
    }

    fn pnr_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.host.get_state(&ObjectType::Pnr.key(id))?.is_some())
    }

    fn get_pnr(&self, id: &str) -> Result<Pnr, RepositoryError> {
        self.get_model("PNR", &ObjectType::Pnr.key(id), id)
    }

    fn get_pnrs(&self, filter: &PnrFilter) -> Result<Vec<Pnr>, RepositoryError> {
        let mut result = Vec::new();
        for (key, bytes) in self.host.get_state_by_prefix(&ObjectType::Pnr.prefix())? {
            let pnr: Pnr = match serde_json::from_slice(&bytes) {
                Ok(pnr) => pnr,
                Err(err) => {
                    warn!(key = %key, error = %err, "skipping malformed PNR row");
                    continue;
                }
            };
            if filter.matches(&pnr) {
                result.push(pnr);
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
        self.put_model("PNR", &ObjectType::Pnr.key(id), id, &pnr)
    }

    fn update_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError> {
        if !self.pnr_exists(id)? {
            return Err(RepositoryError::NotFound {
                what: "PNR",
                id: id.to_string(),
            });
        }
        self.put_model("PNR", &ObjectType::Pnr.key(id), id, &pnr)
    }

    fn update_local_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError> {
        self.update_pnr(id, pnr)
    }

    fn purge_pnr_data(&mut self, id: &str) -> Result<(), RepositoryError> {
        let mut pnr = self.get_pnr(id)?;
        pnr.request_data = String::new();
        pnr.response_data = String::new();
        self.update_pnr(id, pnr)
    }

    fn purge_local_pnr_data(&mut self, id: &str) -> Result<(), RepositoryError> {
        self.purge_pnr_data(id)
    }

    fn gc_metadata_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.host.get_state(&ObjectType::Gc.key(id))?.is_some())
    }

    fn get_gc_metadata(&self, id: &str) -> Result<GcMetadata, RepositoryError> {
        self.get_model("GC metadata", &ObjectType::Gc.key(id), id)
    }

    fn get_gc_metadatas(&self) -> Result<Vec<GcMetadata>, RepositoryError> {
        let mut result = Vec::new();
        for (_, bytes) in self.host.get_state_by_prefix(&ObjectType::Gc.prefix())? {
            let gc = serde_json::from_slice(&bytes).map_err(|err| RepositoryError::Malformed {
                what: "GC metadata",
                reason: err.to_string(),
            })?;
            result.push(gc);
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
        self.put_model("GC metadata", &ObjectType::Gc.key(&pnr.id), &pnr.id, &gc)
    }

    fn update_gc_metadata(&mut self, pnr: &Pnr, gc: GcMetadata) -> Result<(), RepositoryError> {
        if !self.gc_metadata_exists(&pnr.id)? {
            return Err(RepositoryError::NotFound {
                what: "GC metadata",
                id: pnr.id.clone(),
            });
        }
        self.put_model("GC metadata", &ObjectType::Gc.key(&pnr.id), &pnr.id, &gc)
    }

    fn delete_gc_metadata(&mut self, pnr: &Pnr) -> Result<(), RepositoryError> {
        self.delete_local_gc_metadata(&pnr.id)
    }

    fn delete_local_gc_metadata(&mut self, id: &str) -> Result<(), RepositoryError> {
        if !self.gc_metadata_exists(id)? {
            return Err(RepositoryError::NotFound {
                what: "GC metadata",
                id: id.to_string(),
            });
        }
        self.host
            .delete_state(&ObjectType::Gc.key(id))
            .map_err(|err| {
                error!(id, error = %err, "could not delete GC metadata from ledger");
                err.into()
            })
    }
}
