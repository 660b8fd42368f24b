//! # PNR Exchange Service
//!
//! The exchange core: state machine, authorization and derivation logic
//! behind the `PnrExchangeApi` port.
//!
//! One instance serves exactly one host invocation by one PIU. It writes
//! optimistically in a fixed order and relies on the enclosing host
//! transaction to abandon earlier writes when a later step fails.

mod exchange;
mod piu;

use crate::domain::entities::{
    ConfirmPnrInput, NewPnrRequestInput, NewPnrRequestOutput, Piu, PiuInfo, Pnr, PnrFilter,
    SubmitPnrResponseInput, TerminatePnrRequestInput,
};
use crate::domain::errors::ExchangeError;
use crate::ports::inbound::PnrExchangeApi;
use crate::ports::outbound::Repository;

/// The exchange core, generic over the storage port.
///
/// Production wires `PrivateDataRepository`; tests wire the in-memory
/// repository.
pub struct PnrExchangeService<R: Repository> {
    pub(crate) repository: R,
    pub(crate) piu_id: String,
}

impl<R: Repository> PnrExchangeService<R> {
    /// Create the service for one invocation by `piu_id`.
    pub fn new(piu_id: impl Into<String>, repository: R) -> Self {
        PnrExchangeService {
            repository,
            piu_id: piu_id.into(),
        }
    }

    pub(crate) fn is_this_piu(&self, piu_id: &str) -> bool {
        self.piu_id == piu_id
    }
}

impl<R: Repository> PnrExchangeApi for PnrExchangeService<R> {
    fn set_piu_info(&mut self, info: PiuInfo) -> Result<(), ExchangeError> {
        self.do_set_piu_info(info)
    }

    fn get_pius(&self) -> Result<Vec<Piu>, ExchangeError> {
        self.do_get_pius()
    }

    fn get_pnrs(&self, filter: PnrFilter) -> Result<Vec<Pnr>, ExchangeError> {
        self.do_get_pnrs(filter)
    }

    fn new_pnr_request(
        &mut self,
        input: NewPnrRequestInput,
    ) -> Result<NewPnrRequestOutput, ExchangeError> {
        self.do_new_pnr_request(input)
    }

    fn submit_pnr_response_ack(
        &mut self,
        input: SubmitPnrResponseInput,
    ) -> Result<(), ExchangeError> {
        self.do_submit_pnr_response_ack(input)
    }

    fn submit_pnr_response_nack(
        &mut self,
        input: SubmitPnrResponseInput,
    ) -> Result<(), ExchangeError> {
        self.do_submit_pnr_response_nack(input)
    }

    fn confirm_pnr(&mut self, input: ConfirmPnrInput) -> Result<(), ExchangeError> {
        self.do_confirm_pnr(input)
    }

    fn terminate_pnr_request(
        &mut self,
        input: TerminatePnrRequestInput,
    ) -> Result<(), ExchangeError> {
        self.do_terminate_pnr_request(input)
    }
}
