//! # In-Memory Repository
//!
//! Reference implementation of the storage port over plain maps. It mirrors
//! the contract of the ledger-backed adapters so the exchange core can be
//! exercised deterministically; it is a test fixture, not a production
//! storage path.
//!
//! There are no collections here, so the `_local` variants alias the shared
//! ones and purge blanks the payload fields in place.

use crate::domain::entities::{GcMetadata, Piu, Pnr, PnrFilter};
use crate::domain::errors::RepositoryError;
use crate::ports::outbound::Repository;
use std::collections::HashMap;

/// In-memory storage for one logical ledger shared by both parties.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    pius: HashMap<String, Piu>,
    pnrs: HashMap<String, Pnr>,
    gc_metadatas: HashMap<String, GcMetadata>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for InMemoryRepository {
    fn piu_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.pius.contains_key(id))
    }

    fn get_piu(&self, id: &str) -> Result<Piu, RepositoryError> {
        self.pius
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                what: "PIU",
                id: id.to_string(),
            })
    }

    fn get_pius(&self) -> Result<Vec<Piu>, RepositoryError> {
        Ok(self.pius.values().cloned().collect())
    }

    fn insert_piu(&mut self, id: &str, piu: Piu) -> Result<(), RepositoryError> {
        if self.pius.contains_key(id) {
            return Err(RepositoryError::AlreadyExists {
                what: "PIU",
                id: id.to_string(),
            });
        }
        self.pius.insert(id.to_string(), piu);
        Ok(())
    }

    fn update_piu(&mut self, id: &str, piu: Piu) -> Result<(), RepositoryError> {
        if !self.pius.contains_key(id) {
            return Err(RepositoryError::NotFound {
                what: "PIU",
                id: id.to_string(),
            });
        }
        self.pius.insert(id.to_string(), piu);
        Ok(())
    }

    fn pnr_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.pnrs.contains_key(id))
    }

    fn get_pnr(&self, id: &str) -> Result<Pnr, RepositoryError> {
        self.pnrs
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                what: "PNR",
                id: id.to_string(),
            })
    }

    fn get_pnrs(&self, filter: &PnrFilter) -> Result<Vec<Pnr>, RepositoryError> {
        Ok(self
            .pnrs
            .values()
            .filter(|pnr| filter.matches(pnr))
            .cloned()
            .collect())
    }

    fn insert_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError> {
        if self.pnrs.contains_key(id) {
            return Err(RepositoryError::AlreadyExists {
                what: "PNR",
                id: id.to_string(),
            });
        }
        self.pnrs.insert(id.to_string(), pnr);
        Ok(())
    }

    fn update_pnr(&mut self, id: &str, pnr: Pnr) -> Result<(), RepositoryError> {
        if !self.pnrs.contains_key(id) {
            return Err(RepositoryError::NotFound {
                what: "PNR",
                id: id.to_string(),
            });
        }
        self.pnrs.insert(id.to_string(), pnr);
        Ok(())
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
        Ok(self.gc_metadatas.contains_key(id))
    }

    fn get_gc_metadata(&self, id: &str) -> Result<GcMetadata, RepositoryError> {
        self.gc_metadatas
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                what: "GC metadata",
                id: id.to_string(),
            })
    }

    fn get_gc_metadatas(&self) -> Result<Vec<GcMetadata>, RepositoryError> {
        Ok(self.gc_metadatas.values().cloned().collect())
    }

    fn insert_gc_metadata(&mut self, pnr: &Pnr, gc: GcMetadata) -> Result<(), RepositoryError> {
        if self.gc_metadatas.contains_key(&pnr.id) {
            return Err(RepositoryError::AlreadyExists {
                what: "GC metadata",
                id: pnr.id.clone(),
            });
        }
        self.gc_metadatas.insert(pnr.id.clone(), gc);
        Ok(())
    }

    fn update_gc_metadata(&mut self, pnr: &Pnr, gc: GcMetadata) -> Result<(), RepositoryError> {
        if !self.gc_metadatas.contains_key(&pnr.id) {
            return Err(RepositoryError::NotFound {
                what: "GC metadata",
                id: pnr.id.clone(),
            });
        }
        self.gc_metadatas.insert(pnr.id.clone(), gc);
        Ok(())
    }

    fn delete_gc_metadata(&mut self, pnr: &Pnr) -> Result<(), RepositoryError> {
        self.delete_local_gc_metadata(&pnr.id)
    }

    fn delete_local_gc_metadata(&mut self, id: &str) -> Result<(), RepositoryError> {
        if self.gc_metadatas.remove(id).is_none() {
            return Err(RepositoryError::NotFound {
                what: "GC metadata",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
