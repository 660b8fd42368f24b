//! PIU registration and read-side operations.

use super::PnrExchangeService;
use crate::domain::entities::{Piu, PiuInfo, Pnr, PnrFilter};
use crate::domain::errors::ExchangeError;
use crate::ports::outbound::Repository;
use tracing::{debug, error};

impl<R: Repository> PnrExchangeService<R> {
    pub(crate) fn do_set_piu_info(&mut self, info: PiuInfo) -> Result<(), ExchangeError> {
        debug!(?info, "SetPIUInfo called");

        let exists = self.repository.piu_exists(&self.piu_id).map_err(|err| {
            error!(id = %self.piu_id, error = %err, "failed to get PIU from the repository");
            ExchangeError::from(err)
        })?;

        let result = if !exists {
            let entity = Piu::from_info(&self.piu_id, info);
            self.repository.insert_piu(&self.piu_id.clone(), entity)
        } else {
            let entity = self.repository.get_piu(&self.piu_id).map_err(|err| {
                error!(id = %self.piu_id, error = %err, "failed to get PIU from the repository");
                ExchangeError::from(err)
            })?;
            let entity = entity.apply_info(info);
            self.repository.update_piu(&self.piu_id.clone(), entity)
        };

        result.map_err(|err| {
            error!(id = %self.piu_id, error = %err, "failed writing PIU information to repository");
            ExchangeError::from(err)
        })?;

        debug!("SetPIUInfo finished");
        Ok(())
    }

    pub(crate) fn do_get_pius(&self) -> Result<Vec<Piu>, ExchangeError> {
        debug!("GetPIUs called");

        let pius = self.repository.get_pius().map_err(|err| {
            error!(error = %err, "failed to get PIUs from the repository");
            ExchangeError::from(err)
        })?;

        debug!(count = pius.len(), "GetPIUs finished");
        Ok(pius)
    }

    pub(crate) fn do_get_pnrs(&self, filter: PnrFilter) -> Result<Vec<Pnr>, ExchangeError> {
        debug!(?filter, "GetPNRs called");

        let pnrs = self.repository.get_pnrs(&filter).map_err(|err| {
            error!(error = %err, "failed to get PNRs from the repository");
            ExchangeError::from(err)
        })?;

        debug!(count = pnrs.len(), "GetPNRs finished");
        Ok(pnrs)
    }
}
