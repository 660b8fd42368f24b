//! Shared test fixtures: a small roster of PIUs and PNRs in assorted
//! states, pinned to fixed timestamps. Used by the unit tests here and by
//! the integration-tests crate.

use crate::domain::entities::{Piu, Pnr, RequestState};
use chrono::{DateTime, Duration, Utc};

pub fn pius() -> Vec<Piu> {
    vec![
        Piu {
            id: "piu1".into(),
            name: "PIU 1".into(),
            admin_email: "admin@piu1.org".into(),
        },
        Piu {
            id: "piu2".into(),
            name: "PIU 2".into(),
            admin_email: "admin@piu2.org".into(),
        },
        Piu {
            id: "piu3".into(),
            name: "PIU 3".into(),
            admin_email: "admin@piu3.org".into(),
        },
    ]
}

pub fn earliest_timestamp() -> DateTime<Utc> {
    "2025-11-19T12:00:00Z".parse().expect("valid RFC-3339")
}

pub fn middle_timestamp() -> DateTime<Utc> {
    "2025-11-19T13:00:00Z".parse().expect("valid RFC-3339")
}

pub fn latest_timestamp() -> DateTime<Utc> {
    "2025-11-19T14:59:00Z".parse().expect("valid RFC-3339")
}

pub fn pnrs() -> Vec<Pnr> {
    vec![
        Pnr {
            id: "pnr1".into(),
            requesting_piu: "piu1".into(),
            responding_piu: "piu2".into(),
            request_timestamp: earliest_timestamp(),
            response_timestamp: None,
            state: RequestState::Pending,
            request_data: "\"requestData\"".into(),
            response_data: String::new(),
            pnr_hashes: vec![],
        },
        Pnr {
            id: "pnr2".into(),
            requesting_piu: "piu2".into(),
            responding_piu: "piu1".into(),
            request_timestamp: middle_timestamp(),
            response_timestamp: Some(middle_timestamp() + Duration::minutes(1)),
            state: RequestState::Ack,
            request_data: "\"requestData\"".into(),
            response_data: "\"responseData\"".into(),
            pnr_hashes: vec![],
        },
        Pnr {
            id: "pnr3".into(),
            requesting_piu: "piu2".into(),
            responding_piu: "piu1".into(),
            request_timestamp: middle_timestamp(),
            response_timestamp: Some(middle_timestamp() + Duration::minutes(1)),
            state: RequestState::AckConfirmed,
            request_data: String::new(),
            response_data: String::new(),
            pnr_hashes: vec![],
        },
        Pnr {
            id: "pnr4".into(),
            requesting_piu: "piu1".into(),
            responding_piu: "piu2".into(),
            request_timestamp: latest_timestamp(),
            response_timestamp: Some(latest_timestamp() + Duration::minutes(1)),
            state: RequestState::Nack,
            request_data: "\"requestData\"".into(),
            response_data: "\"responseData\"".into(),
            pnr_hashes: vec![],
        },
    ]
}
