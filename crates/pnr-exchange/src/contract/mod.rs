//! # Invocation Adapter
//!
//! The surface the ledger host drives. Each operation resolves the
//! caller's PIU identity, reads transient payload bytes where the
//! operation takes any, demarshals its JSON argument, and dispatches to
//! the exchange core over the private-collection repository.
//!
//! `invoke` mirrors the host's name-keyed method dispatch and returns the
//! serialized result bytes; the typed methods below are the same
//! operations with their natural signatures.


use crate::adapters::privatedata::PrivateDataRepository;
use crate::domain::entities::{
    optional_payload, ConfirmPnrInput, NewPnrRequestInput, NewPnrRequestOutput, Piu, PiuInfo, Pnr,
    PnrFilter, SubmitPnrResponseInput, TerminatePnrRequestInput, REQUEST_DATA_TRANSIENT_KEY,
    RESPONSE_DATA_TRANSIENT_KEY,
};
use crate::domain::errors::ExchangeError;
use crate::ports::inbound::PnrExchangeApi;
use crate::ports::outbound::LedgerHost;
use crate::service::PnrExchangeService;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

/// The PNR exchange contract: one associated function per host operation.
pub struct PnrExchangeContract;

fn parse_argument<T: DeserializeOwned>(
    what: &'static str,
    argument: &str,
) -> Result<T, ExchangeError> {
    serde_json::from_str(argument).map_err(|err| {
        error!(input = argument, error = %err, "failed to unmarshal input");
        ExchangeError::MalformedArgument {
            what,
            reason: err.to_string(),
        }
    })
}

fn client_id<H: LedgerHost>(host: &H) -> Result<String, ExchangeError> {
    host.client_id().map_err(|err| {
        error!(error = %err, "failed getting client identity");
        ExchangeError::Identity {
            reason: err.to_string(),
        }
    })
}

/// Read a transient payload that the operation requires.
fn required_transient<H: LedgerHost>(
    host: &H,
    key: &'static str,
) -> Result<String, ExchangeError> {
    let Some(bytes) = host.transient(key) else {
        error!(key, "missing transient data for key");
        return Err(ExchangeError::MissingTransient { key });
    };
    Ok(optional_payload(Some(&bytes)))
}

fn service<H: LedgerHost>(
    host: &mut H,
    piu_id: String,
) -> PnrExchangeService<PrivateDataRepository<'_, H>> {
    let repository = PrivateDataRepository::new(host, piu_id.clone());
    PnrExchangeService::new(piu_id, repository)
}

impl PnrExchangeContract {
    pub fn set_piu_info<H: LedgerHost>(host: &mut H, info: &str) -> Result<(), ExchangeError> {
        let piu_id = client_id(host)?;
        let input: PiuInfo = parse_argument("PIUInfo", info)?;
        service(host, piu_id).set_piu_info(input)
    }

    pub fn get_pius<H: LedgerHost>(host: &mut H) -> Result<Vec<Piu>, ExchangeError> {
        let piu_id = client_id(host)?;
        service(host, piu_id).get_pius()
    }

    pub fn get_pnrs<H: LedgerHost>(host: &mut H, filter: &str) -> Result<Vec<Pnr>, ExchangeError> {
        let piu_id = client_id(host)?;
        let input: PnrFilter = parse_argument("PNRFilter", filter)?;
        service(host, piu_id).get_pnrs(input)
    }

    pub fn new_pnr_request<H: LedgerHost>(
        host: &mut H,
        request: &str,
    ) -> Result<NewPnrRequestOutput, ExchangeError> {
        let piu_id = client_id(host)?;
        let mut input: NewPnrRequestInput = parse_argument("NewPNRRequestInput", request)?;
        input.request_data = Some(required_transient(host, REQUEST_DATA_TRANSIENT_KEY)?);
        service(host, piu_id).new_pnr_request(input)
    }

    pub fn submit_pnr_response_ack<H: LedgerHost>(
        host: &mut H,
        response: &str,
    ) -> Result<(), ExchangeError> {
        let piu_id = client_id(host)?;
        let mut input: SubmitPnrResponseInput = parse_argument("SubmitPNRResponseInput", response)?;
        input.response_data = Some(required_transient(host, RESPONSE_DATA_TRANSIENT_KEY)?);
        service(host, piu_id).submit_pnr_response_ack(input)
    }

    pub fn submit_pnr_response_nack<H: LedgerHost>(
        host: &mut H,
        response: &str,
    ) -> Result<(), ExchangeError> {
        let piu_id = client_id(host)?;
        let mut input: SubmitPnrResponseInput = parse_argument("SubmitPNRResponseInput", response)?;
        input.response_data = Some(required_transient(host, RESPONSE_DATA_TRANSIENT_KEY)?);
        service(host, piu_id).submit_pnr_response_nack(input)
    }

    pub fn confirm_pnr<H: LedgerHost>(
        host: &mut H,
        confirmation: &str,
    ) -> Result<(), ExchangeError> {
        let piu_id = client_id(host)?;
        let input: ConfirmPnrInput = parse_argument("ConfirmPNRInput", confirmation)?;
        service(host, piu_id).confirm_pnr(input)
    }

    pub fn terminate_pnr_request<H: LedgerHost>(
        host: &mut H,
        purge: &str,
    ) -> Result<(), ExchangeError> {
        let piu_id = client_id(host)?;
        let input: TerminatePnrRequestInput = parse_argument("TerminatePNRRequestInput", purge)?;
        service(host, piu_id).terminate_pnr_request(input)
    }

    /// Name-keyed dispatch, as the host invokes operations. Returns the
    /// serialized result; operations with an empty result return no bytes.
    pub fn invoke<H: LedgerHost>(
        host: &mut H,
        operation: &str,
        argument: &str,
    ) -> Result<Vec<u8>, ExchangeError> {
        match operation {
            "SetPIUInfo" => Self::set_piu_info(host, argument).map(|()| Vec::new()),
            "GetPIUs" => Self::get_pius(host).and_then(encode_result),
            "GetPNRs" => Self::get_pnrs(host, argument).and_then(encode_result),
            "NewPNRRequest" => Self::new_pnr_request(host, argument).and_then(encode_result),
            "SubmitPNRResponseAck" => {
                Self::submit_pnr_response_ack(host, argument).map(|()| Vec::new())
            }
            "SubmitPNRResponseNack" => {
                Self::submit_pnr_response_nack(host, argument).map(|()| Vec::new())
            }
            "ConfirmPNR" => Self::confirm_pnr(host, argument).map(|()| Vec::new()),
            "TerminatePNRRequest" => {
                Self::terminate_pnr_request(host, argument).map(|()| Vec::new())
            }
            _ => {
                error!(operation, "unknown operation");
                Err(ExchangeError::UnknownOperation {
                    name: operation.to_string(),
                })
            }
        }
    }
}

fn encode_result<T: Serialize>(value: T) -> Result<Vec<u8>, ExchangeError> {
    serde_json::to_vec(&value).map_err(|err| {
        error!(error = %err, "failed to marshal result");
        ExchangeError::EncodeResult {
            reason: err.to_string(),
        }
    })
}
