//! Exchange lifecycle operations: request, respond, confirm, terminate.

use super::PnrExchangeService;
use crate::domain::entities::{
    optional_payload, ConfirmPnrInput, GcMetadata, NewPnrRequestInput, NewPnrRequestOutput, Pnr,
    RequestState, SubmitPnrResponseInput, TerminatePnrRequestInput,
};
use crate::domain::errors::ExchangeError;
use crate::domain::response;
use crate::ports::outbound::Repository;
use tracing::{debug, error};

impl<R: Repository> PnrExchangeService<R> {
    pub(crate) fn do_new_pnr_request(
        &mut self,
        input: NewPnrRequestInput,
    ) -> Result<NewPnrRequestOutput, ExchangeError> {
        debug!(?input, "NewPNRRequest called");

        if input.id.is_empty() {
            error!(client_id = %self.piu_id, "rejecting PNR request without an id");
            return Err(ExchangeError::EmptyId);
        }

        if self.is_this_piu(&input.responding_piu) {
            error!(
                client_id = %self.piu_id,
                responding_piu = %input.responding_piu,
                "cannot request data from itself"
            );
            return Err(ExchangeError::SelfRequest);
        }

        if let Err(err) = self.repository.get_piu(&input.responding_piu) {
            error!(
                responding_piu = %input.responding_piu,
                error = %err,
                "could not get information about responding PIU"
            );
            return Err(ExchangeError::UnknownRespondingPiu {
                id: input.responding_piu,
            });
        }

        let pnr = Pnr {
            id: input.id.clone(),
            requesting_piu: self.piu_id.clone(),
            responding_piu: input.responding_piu,
            request_timestamp: input.request_timestamp,
            response_timestamp: None,
            state: RequestState::Pending,
            request_data: optional_payload(input.request_data.as_deref().map(str::as_bytes)),
            response_data: String::new(),
            pnr_hashes: vec![],
        };

        self.repository.insert_pnr(&input.id, pnr.clone()).map_err(|err| {
            error!(id = %input.id, error = %err, "could not insert new PNR");
            ExchangeError::from(err)
        })?;

        let gc = GcMetadata {
            id: pnr.id.clone(),
            creation_timestamp: pnr.request_timestamp,
        };
        self.repository.insert_gc_metadata(&pnr, gc).map_err(|err| {
            error!(id = %pnr.id, error = %err, "could not insert new PNR GC metadata");
            ExchangeError::from(err)
        })?;

        debug!(id = %pnr.id, "NewPNRRequest finished");
        Ok(NewPnrRequestOutput { id: pnr.id })
    }

    /// Common body of the Ack and Nack submissions.
    fn submit_pnr_response(
        &mut self,
        response: RequestState,
        input: SubmitPnrResponseInput,
    ) -> Result<(), ExchangeError> {
        debug!(?input, state = %response, "SubmitPNRResponse called");

        let mut pnr = self.repository.get_pnr(&input.id).map_err(|err| {
            error!(id = %input.id, error = %err, "could not get PNR request");
            ExchangeError::UnknownPnr {
                id: input.id.clone(),
            }
        })?;

        if !self.is_this_piu(&pnr.responding_piu) {
            error!(
                client_id = %self.piu_id,
                responding_piu = %pnr.responding_piu,
                "not allowed to respond to this request"
            );
            return Err(ExchangeError::NotResponder {
                caller: self.piu_id.clone(),
            });
        }

        if pnr.state != RequestState::PendingConfirmed {
            error!(id = %input.id, state = %pnr.state, "PNR request must be in PendingConfirmed state");
            return Err(ExchangeError::WrongState {
                expected: RequestState::PendingConfirmed,
                found: pnr.state,
            });
        }

        pnr.response_timestamp = Some(input.response_timestamp);
        pnr.state = response;
        pnr.response_data = optional_payload(input.response_data.as_deref().map(str::as_bytes));

        let mut gc = self.repository.get_gc_metadata(&input.id).map_err(|err| {
            error!(id = %input.id, error = %err, "could not get PNR GC metadata");
            ExchangeError::from(err)
        })?;

        let digest = response::digest_response(&pnr.response_data).map_err(|err| {
            error!(id = %input.id, error = %err, "could not digest PNR response records");
            err
        })?;
        pnr.pnr_hashes = digest.hashes;

        if let Some(earliest) = digest.earliest_created_on {
            if earliest < gc.creation_timestamp {
                gc.creation_timestamp = earliest;
            }
        }

        self.repository.update_pnr(&input.id, pnr.clone()).map_err(|err| {
            error!(id = %input.id, error = %err, "could not update PNR request");
            ExchangeError::from(err)
        })?;

        self.repository.update_gc_metadata(&pnr, gc).map_err(|err| {
            error!(id = %input.id, error = %err, "could not update PNR GC metadata");
            ExchangeError::from(err)
        })?;

        debug!(id = %input.id, "SubmitPNRResponse finished");
        Ok(())
    }

    pub(crate) fn do_submit_pnr_response_ack(
        &mut self,
        input: SubmitPnrResponseInput,
    ) -> Result<(), ExchangeError> {
        self.submit_pnr_response(RequestState::Ack, input)
    }

    pub(crate) fn do_submit_pnr_response_nack(
        &mut self,
        input: SubmitPnrResponseInput,
    ) -> Result<(), ExchangeError> {
        self.submit_pnr_response(RequestState::Nack, input)
    }

    pub(crate) fn do_confirm_pnr(&mut self, input: ConfirmPnrInput) -> Result<(), ExchangeError> {
        debug!(?input, "ConfirmPNR called");

        let mut pnr = self.repository.get_pnr(&input.id).map_err(|err| {
            error!(id = %input.id, error = %err, "could not get PNR request");
            ExchangeError::UnknownPnr {
                id: input.id.clone(),
            }
        })?;

        let Some(role) = pnr.role_of(&self.piu_id) else {
            error!(
                client_id = %self.piu_id,
                requesting_piu = %pnr.requesting_piu,
                responding_piu = %pnr.responding_piu,
                "not the requester or responder of this PNR request"
            );
            return Err(ExchangeError::NotParticipant {
                caller: self.piu_id.clone(),
            });
        };

        match pnr.state {
            RequestState::PendingConfirmed
            | RequestState::AckConfirmed
            | RequestState::NackConfirmed => {
                error!(id = %input.id, "PNR request already confirmed");
                return Err(ExchangeError::AlreadyConfirmed { id: input.id });
            }
            RequestState::Terminated => {
                error!(id = %input.id, "cannot confirm PNR request which has been terminated");
                return Err(ExchangeError::ConfirmTerminated { id: input.id });
            }
            _ => {}
        }

        let Some(next) = pnr.state.confirmation(role) else {
            error!(id = %input.id, state = %pnr.state, "cannot confirm request in this state");
            return Err(ExchangeError::ForbiddenConfirmation {
                id: input.id,
                state: pnr.state,
            });
        };
        pnr.state = next;

        self.repository.update_pnr(&input.id, pnr.clone()).map_err(|err| {
            error!(id = %input.id, error = %err, "could not update PNR request");
            ExchangeError::from(err)
        })?;

        // Both sides have now seen the response; the payload may go.
        if !pnr.state.has_payload() {
            self.repository.purge_pnr_data(&input.id).map_err(|err| {
                error!(id = %input.id, error = %err, "could not purge PNR data");
                ExchangeError::from(err)
            })?;
        }

        debug!(id = %input.id, state = %pnr.state, "ConfirmPNR finished");
        Ok(())
    }

    pub(crate) fn do_terminate_pnr_request(
        &mut self,
        input: TerminatePnrRequestInput,
    ) -> Result<(), ExchangeError> {
        debug!(?input, "TerminatePNRRequest called");

        let mut pnr = self.repository.get_pnr(&input.id).map_err(|err| {
            error!(id = %input.id, error = %err, "could not get PNR request");
            ExchangeError::UnknownPnr {
                id: input.id.clone(),
            }
        })?;

        if pnr.role_of(&self.piu_id).is_none() {
            error!(
                client_id = %self.piu_id,
                requesting_piu = %pnr.requesting_piu,
                responding_piu = %pnr.responding_piu,
                "not the requester or responder of this PNR request"
            );
            return Err(ExchangeError::NotParticipant {
                caller: self.piu_id.clone(),
            });
        }

        pnr.state = RequestState::Terminated;

        self.repository.update_local_pnr(&input.id, pnr).map_err(|err| {
            error!(id = %input.id, error = %err, "could not update PNR");
            ExchangeError::from(err)
        })?;

        self.repository.purge_local_pnr_data(&input.id).map_err(|err| {
            error!(id = %input.id, error = %err, "could not purge PNR data");
            ExchangeError::from(err)
        })?;

        self.repository.delete_local_gc_metadata(&input.id).map_err(|err| {
            error!(id = %input.id, error = %err, "could not delete GC metadata");
            ExchangeError::from(err)
        })?;

        debug!(id = %input.id, "TerminatePNRRequest finished");
        Ok(())
    }
}
