//! # Inbound Port (Driving Port)
//!
//! The operations the host may invoke on the PNR exchange. The service
//! implements this trait; the contract adapter drives it.

use crate::domain::entities::{
    ConfirmPnrInput, NewPnrRequestInput, NewPnrRequestOutput, Piu, PiuInfo, Pnr, PnrFilter,
    SubmitPnrResponseInput, TerminatePnrRequestInput,
};
use crate::domain::errors::ExchangeError;

/// The eight operations of the PNR exchange, executed as the calling PIU.
pub trait PnrExchangeApi {
    /// Upsert the caller's own PIU row. Empty fields leave existing values
    /// untouched.
    fn set_piu_info(&mut self, info: PiuInfo) -> Result<(), ExchangeError>;

    /// All registered PIUs.
    fn get_pius(&self) -> Result<Vec<Piu>, ExchangeError>;

    /// All PNRs visible to the caller matching `filter`. Collection scoping
    /// is enforced by the storage layer.
    fn get_pnrs(&self, filter: PnrFilter) -> Result<Vec<Pnr>, ExchangeError>;

    /// Open a new exchange towards another PIU.
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument`: empty id, self-request, unknown responding PIU
    /// - `AlreadyExists`: a PNR with this id already exists
    fn new_pnr_request(
        &mut self,
        input: NewPnrRequestInput,
    ) -> Result<NewPnrRequestOutput, ExchangeError>;

    /// Submit a positive response. Responder only, from `PendingConfirmed`.
    fn submit_pnr_response_ack(
        &mut self,
        input: SubmitPnrResponseInput,
    ) -> Result<(), ExchangeError>;

    /// Submit a negative response. Responder only, from `PendingConfirmed`.
    fn submit_pnr_response_nack(
        &mut self,
        input: SubmitPnrResponseInput,
    ) -> Result<(), ExchangeError>;

    /// Confirm the peer's last action. From `Pending` only the responder may
    /// confirm; from `Ack`/`Nack` only the requester, which also purges the
    /// payload from both collections.
    fn confirm_pnr(&mut self, input: ConfirmPnrInput) -> Result<(), ExchangeError>;

    /// Terminate the exchange on the caller's side only: local state becomes
    /// `Terminated`, the local payload is purged and the local GC row
    /// deleted. The peer's collection is untouched.
    fn terminate_pnr_request(
        &mut self,
        input: TerminatePnrRequestInput,
    ) -> Result<(), ExchangeError>;
}
