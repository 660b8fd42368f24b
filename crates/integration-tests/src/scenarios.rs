//! Two-party exchange flows, driven invocation by invocation.

use chrono::{DateTime, Utc};
use pnr_exchange::{
    ErrorKind, InMemoryLedger, PnrExchangeContract, PrivateDataRepository, Repository,
    RequestState,
};

const A: &str = "piu1";
const B: &str = "piu2";
const OUTSIDER: &str = "piu3";

const REQUEST_ARG: &str =
    r#"{"id":"someId","respondingPIU":"piu2","requestTimestamp":"2025-11-19T13:00:00Z"}"#;
const RESPONSE_ARG: &str = r#"{"id":"someId","responseTimestamp":"2025-11-19T13:00:00Z"}"#;
const CONFIRM_ARG: &str = r#"{"id":"someId"}"#;

/// Begin an invocation as `piu`: fresh identity, fresh transient channel.
fn as_piu(ledger: &mut InMemoryLedger, piu: &str) {
    ledger.set_client(piu);
    ledger.clear_transient();
}

fn setup_parties() -> InMemoryLedger {
    let mut ledger = InMemoryLedger::new();

    as_piu(&mut ledger, A);
    PnrExchangeContract::set_piu_info(&mut ledger, r#"{"name":"foo","adminEmail":"a@x"}"#)
        .unwrap();
    as_piu(&mut ledger, B);
    PnrExchangeContract::set_piu_info(&mut ledger, r#"{"name":"bar","adminEmail":"b@x"}"#)
        .unwrap();
    as_piu(&mut ledger, OUTSIDER);
    PnrExchangeContract::set_piu_info(&mut ledger, r#"{"name":"baz","adminEmail":"c@x"}"#)
        .unwrap();

    ledger
}

/// Scenario 1 prelude: A has requested data from B.
fn setup_pending(ledger: &mut InMemoryLedger) {
    as_piu(ledger, A);
    ledger.set_transient("requestData", "\"rq\"".as_bytes());
    let output = PnrExchangeContract::new_pnr_request(ledger, REQUEST_ARG).unwrap();
    assert_eq!(output.id, "someId");
}

/// Scenario 2 prelude: B has confirmed and answered with `response_data`.
fn setup_acked(ledger: &mut InMemoryLedger, response_data: &str) {
    setup_pending(ledger);

    as_piu(ledger, B);
    PnrExchangeContract::confirm_pnr(ledger, CONFIRM_ARG).unwrap();

    as_piu(ledger, B);
    ledger.set_transient("responseData", response_data.as_bytes());
    PnrExchangeContract::submit_pnr_response_ack(ledger, RESPONSE_ARG).unwrap();
}

fn pnrs_seen_by(ledger: &mut InMemoryLedger, piu: &str) -> Vec<pnr_exchange::Pnr> {
    as_piu(ledger, piu);
    PnrExchangeContract::get_pnrs(ledger, "{}").unwrap()
}

fn gc_row_seen_by(
    ledger: &mut InMemoryLedger,
    piu: &str,
    id: &str,
) -> Option<pnr_exchange::GcMetadata> {
    let repo = PrivateDataRepository::new(ledger, piu);
    repo.get_gc_metadata(id).ok()
}

#[test]
fn happy_path_creates_a_pending_exchange() {
    let mut ledger = setup_parties();
    setup_pending(&mut ledger);

    let pnrs = pnrs_seen_by(&mut ledger, A);
    assert_eq!(pnrs.len(), 1);
    let pnr = &pnrs[0];
    assert_eq!(pnr.id, "someId");
    assert_eq!(pnr.requesting_piu, A);
    assert_eq!(pnr.responding_piu, B);
    assert_eq!(pnr.state, RequestState::Pending);
    assert_eq!(pnr.request_data, "\"rq\"");
    assert!(pnr.pnr_hashes.is_empty());

    // The shared write made the responder see the same record.
    let pnrs = pnrs_seen_by(&mut ledger, B);
    assert_eq!(pnrs.len(), 1);
    assert_eq!(pnrs[0].request_data, "\"rq\"");

    // A party outside the exchange sees nothing.
    assert!(pnrs_seen_by(&mut ledger, OUTSIDER).is_empty());

    // The GC row starts at the request timestamp.
    let gc = gc_row_seen_by(&mut ledger, A, "someId").unwrap();
    assert_eq!(gc.creation_timestamp, "2025-11-19T13:00:00Z".parse::<DateTime<Utc>>().unwrap());
}

#[test]
fn confirm_then_ack_attaches_the_response() {
    let mut ledger = setup_parties();
    setup_pending(&mut ledger);

    as_piu(&mut ledger, B);
    PnrExchangeContract::confirm_pnr(&mut ledger, CONFIRM_ARG).unwrap();
    assert_eq!(pnrs_seen_by(&mut ledger, A)[0].state, RequestState::PendingConfirmed);

    as_piu(&mut ledger, B);
    ledger.set_transient("responseData", "\"rs\"".as_bytes());
    PnrExchangeContract::submit_pnr_response_ack(&mut ledger, RESPONSE_ARG).unwrap();

    let pnr = &pnrs_seen_by(&mut ledger, A)[0];
    assert_eq!(pnr.state, RequestState::Ack);
    assert_eq!(pnr.response_data, "\"rs\"");
    // No passengerDatasets in the payload, so no hashes.
    assert!(pnr.pnr_hashes.is_empty());
}

fn ten_passenger_response() -> String {
    let mut datasets = Vec::new();
    for i in 1..=10 {
        let mut pnr_obj = serde_json::json!({"record_locator": format!("LOC{i:03}")});
        if i != 7 {
            let created_on = if i == 4 {
                "2025-01-17T12:27:18Z"
            } else {
                "2025-11-19T12:00:00Z"
            };
            pnr_obj["iata_pnrgov_notif_rq_obj"] = serde_json::json!({"created_on": created_on});
        }
        datasets.push(serde_json::json!({
            "passenger_obj": {
                "name": format!("Passenger {i}"),
                "seq": i,
                "pnr_obj": pnr_obj,
            }
        }));
    }
    serde_json::json!({"passengerDatasets": datasets, "version": "1.0"}).to_string()
}

#[test]
fn response_records_are_canonicalized_and_hashed_in_order() {
    let mut ledger = setup_parties();
    setup_acked(&mut ledger, &ten_passenger_response());

    // SHA-256 digests of each canonicalized passenger_obj, computed
    // independently, in document order.
    let expected = [
        "12040cf5fbf480df468fc37e0e598c736f1bc83419d9e39cca19be0532ff0aec",
        "9297b1f1677f4d12bfcc27b01043194071ed831238775755cd15f2d1cc857bae",
        "32bd851796e18aebc19bfcf8c96ebce349f4ab707fc8d246e0d398ae2e12d7ed",
        "df4fcfbb4412dddfe8b59896dfa13bc787eb07ba75c25516a0221f58ee8ffd7c",
        "371aa8b4d3a47405328a064641c1907cd6a02c67a1e26c2e296e01be52ae72a8",
        "b10dc0e66f407be5402e4803e84d0c16dd3de17991e210e2f30eec12eec0144d",
        "d2244318c0f138a1aa73d0d8d61efb30ad724a1de2fcff781df2c30ab2b38011",
        "5ea15668a138f2028429f4494363a059f0d9d3b1dab76eb3620d694f57f48ec6",
        "799361f7efccb3216b4ae2e0bf682d9a0031691bb0254407a74060d253081921",
        "9573f600987cf35d8f211fc99cc90d57bd8f008d6000316ebb47c2cfb46ee8c1",
    ];

    let pnr = &pnrs_seen_by(&mut ledger, A)[0];
    assert_eq!(pnr.state, RequestState::Ack);
    assert_eq!(pnr.pnr_hashes, expected);

    // One record carries a created_on earlier than the request timestamp;
    // the GC row dropped to it.
    let gc = gc_row_seen_by(&mut ledger, B, "someId").unwrap();
    assert_eq!(
        gc.creation_timestamp,
        "2025-01-17T12:27:18Z".parse::<DateTime<Utc>>().unwrap()
    );
}

#[test]
fn requester_confirmation_purges_the_payload_everywhere() {
    let mut ledger = setup_parties();
    setup_acked(&mut ledger, "\"rs\"");

    as_piu(&mut ledger, A);
    PnrExchangeContract::confirm_pnr(&mut ledger, CONFIRM_ARG).unwrap();

    for piu in [A, B] {
        let pnrs = pnrs_seen_by(&mut ledger, piu);
        assert_eq!(pnrs.len(), 1);
        assert_eq!(pnrs[0].state, RequestState::AckConfirmed);
        assert_eq!(pnrs[0].request_data, "");
        assert_eq!(pnrs[0].response_data, "");
    }

    // The payload went through the host's hard-delete in both collections.
    assert_eq!(ledger.purged().len(), 2);
}

#[test]
fn terminate_clears_only_the_callers_side() {
    let mut ledger = setup_parties();
    setup_acked(&mut ledger, "\"rs\"");

    as_piu(&mut ledger, A);
    PnrExchangeContract::terminate_pnr_request(&mut ledger, CONFIRM_ARG).unwrap();

    let pnrs = pnrs_seen_by(&mut ledger, A);
    assert_eq!(pnrs[0].state, RequestState::Terminated);
    assert_eq!(pnrs[0].request_data, "");
    assert_eq!(pnrs[0].response_data, "");
    assert!(gc_row_seen_by(&mut ledger, A, "someId").is_none());

    // The peer still holds the exchange and may terminate on their own.
    let pnrs = pnrs_seen_by(&mut ledger, B);
    assert_eq!(pnrs[0].state, RequestState::Ack);
    assert_eq!(pnrs[0].response_data, "\"rs\"");
    assert!(gc_row_seen_by(&mut ledger, B, "someId").is_some());
}

#[test]
fn illegal_transitions_fail_with_invalid_argument() {
    let mut ledger = setup_parties();
    setup_pending(&mut ledger);

    // The requester may not confirm its own pending request.
    as_piu(&mut ledger, A);
    let err = PnrExchangeContract::confirm_pnr(&mut ledger, CONFIRM_ARG).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    // Requesting data from oneself.
    as_piu(&mut ledger, B);
    ledger.set_transient("requestData", "\"rq\"".as_bytes());
    let err = PnrExchangeContract::new_pnr_request(
        &mut ledger,
        r#"{"id":"otherId","respondingPIU":"piu2","requestTimestamp":"2025-11-19T13:00:00Z"}"#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    // Second confirmation, from either party.
    as_piu(&mut ledger, B);
    PnrExchangeContract::confirm_pnr(&mut ledger, CONFIRM_ARG).unwrap();
    for piu in [A, B] {
        as_piu(&mut ledger, piu);
        let err = PnrExchangeContract::confirm_pnr(&mut ledger, CONFIRM_ARG).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    // The requester may not answer its own request.
    as_piu(&mut ledger, A);
    ledger.set_transient("responseData", "\"rs\"".as_bytes());
    let err = PnrExchangeContract::submit_pnr_response_ack(&mut ledger, RESPONSE_ARG).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    // An unrelated party may not terminate the exchange.
    as_piu(&mut ledger, OUTSIDER);
    let err =
        PnrExchangeContract::terminate_pnr_request(&mut ledger, CONFIRM_ARG).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn nack_follows_the_same_confirmation_path() {
    let mut ledger = setup_parties();
    setup_pending(&mut ledger);

    as_piu(&mut ledger, B);
    PnrExchangeContract::confirm_pnr(&mut ledger, CONFIRM_ARG).unwrap();

    as_piu(&mut ledger, B);
    ledger.set_transient("responseData", "\"rs\"".as_bytes());
    PnrExchangeContract::submit_pnr_response_nack(&mut ledger, RESPONSE_ARG).unwrap();
    assert_eq!(pnrs_seen_by(&mut ledger, A)[0].state, RequestState::Nack);

    as_piu(&mut ledger, A);
    PnrExchangeContract::confirm_pnr(&mut ledger, CONFIRM_ARG).unwrap();

    let pnrs = pnrs_seen_by(&mut ledger, B);
    assert_eq!(pnrs[0].state, RequestState::NackConfirmed);
    assert_eq!(pnrs[0].response_data, "");
}

#[test]
fn filters_constrain_the_shared_view() {
    let mut ledger = setup_parties();
    setup_pending(&mut ledger);

    as_piu(&mut ledger, A);
    let matching: Vec<pnr_exchange::Pnr> = PnrExchangeContract::get_pnrs(
        &mut ledger,
        r#"{"state":"Pending","requestingPIU":"piu1"}"#,
    )
    .unwrap();
    assert_eq!(matching.len(), 1);

    let none: Vec<pnr_exchange::Pnr> =
        PnrExchangeContract::get_pnrs(&mut ledger, r#"{"state":"Ack"}"#).unwrap();
    assert!(none.is_empty());

    let none: Vec<pnr_exchange::Pnr> = PnrExchangeContract::get_pnrs(
        &mut ledger,
        r#"{"start":"2025-11-19T13:30:00Z"}"#,
    )
    .unwrap();
    assert!(none.is_empty());
}
