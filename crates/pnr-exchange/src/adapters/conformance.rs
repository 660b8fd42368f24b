//! Storage-port conformance battery.
//!
//! Every adapter must behave identically behind the `Repository` trait;
//! each adapter's test module runs these cases against a fresh, empty
//! repository per case.

use crate::domain::entities::{GcMetadata, Piu, Pnr, PnrFilter, RequestState};
use crate::ports::outbound::Repository;
use crate::test_support;
use chrono::Duration;
use std::fmt::Debug;

pub(crate) struct ConformanceCase {
    pub name: &'static str,
    pub run: fn(&mut dyn Repository),
}

pub(crate) const CASES: &[ConformanceCase] = &[
    ConformanceCase { name: "piu_exists_empty", run: piu_exists_empty },
    ConformanceCase { name: "piu_exists_non_matching", run: piu_exists_non_matching },
    ConformanceCase { name: "piu_exists_matching", run: piu_exists_matching },
    ConformanceCase { name: "get_piu_missing", run: get_piu_missing },
    ConformanceCase { name: "get_piu_matching", run: get_piu_matching },
    ConformanceCase { name: "get_pius", run: get_pius },
    ConformanceCase { name: "insert_piu_duplicate", run: insert_piu_duplicate },
    ConformanceCase { name: "update_piu", run: update_piu },
    ConformanceCase { name: "update_piu_missing", run: update_piu_missing },
    ConformanceCase { name: "pnr_exists", run: pnr_exists },
    ConformanceCase { name: "get_pnr", run: get_pnr },
    ConformanceCase { name: "get_pnrs_empty", run: get_pnrs_empty },
    ConformanceCase { name: "get_pnrs_filters", run: get_pnrs_filters },
    ConformanceCase { name: "insert_pnr_duplicate", run: insert_pnr_duplicate },
    ConformanceCase { name: "update_pnr", run: update_pnr },
    ConformanceCase { name: "update_pnr_missing", run: update_pnr_missing },
    ConformanceCase { name: "purge_pnr_data", run: purge_pnr_data },
    ConformanceCase { name: "purge_pnr_data_missing", run: purge_pnr_data_missing },
    ConformanceCase { name: "gc_metadata_lifecycle", run: gc_metadata_lifecycle },
    ConformanceCase { name: "gc_metadata_duplicate", run: gc_metadata_duplicate },
    ConformanceCase { name: "update_gc_metadata_missing", run: update_gc_metadata_missing },
    ConformanceCase { name: "delete_gc_metadata", run: delete_gc_metadata },
];

/// Order-insensitive equality.
fn assert_same_elements<T: PartialEq + Debug>(actual: Vec<T>, expected: Vec<T>) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "expected {expected:?}, got {actual:?}"
    );
    let mut remaining = expected;
    for item in &actual {
        let pos = remaining
            .iter()
            .position(|e| e == item)
            .unwrap_or_else(|| panic!("unexpected element {item:?}"));
        remaining.remove(pos);
    }
}

fn seed_pius(repo: &mut dyn Repository) {
    for piu in test_support::pius() {
        repo.insert_piu(&piu.id.clone(), piu).unwrap();
    }
}

fn seed_pnrs(repo: &mut dyn Repository) {
    for pnr in test_support::pnrs() {
        repo.insert_pnr(&pnr.id.clone(), pnr).unwrap();
    }
}

fn piu_exists_empty(repo: &mut dyn Repository) {
    assert!(!repo.piu_exists("missing").unwrap());
}

fn piu_exists_non_matching(repo: &mut dyn Repository) {
    seed_pius(repo);
    assert!(!repo.piu_exists("missing").unwrap());
}

fn piu_exists_matching(repo: &mut dyn Repository) {
    seed_pius(repo);
    assert!(repo.piu_exists(&test_support::pius()[1].id).unwrap());
}

fn get_piu_missing(repo: &mut dyn Repository) {
    assert!(repo.get_piu("missing").is_err());
    seed_pius(repo);
    assert!(repo.get_piu("missing").is_err());
}

fn get_piu_matching(repo: &mut dyn Repository) {
    seed_pius(repo);
    let expected = test_support::pius()[1].clone();
    assert_eq!(repo.get_piu(&expected.id).unwrap(), expected);
}

fn get_pius(repo: &mut dyn Repository) {
    assert_same_elements(repo.get_pius().unwrap(), vec![]);
    seed_pius(repo);
    assert_same_elements(repo.get_pius().unwrap(), test_support::pius());
}

fn insert_piu_duplicate(repo: &mut dyn Repository) {
    let piu = test_support::pius()[1].clone();
    repo.insert_piu(&piu.id.clone(), piu.clone()).unwrap();
    assert!(repo.insert_piu(&piu.id.clone(), piu.clone()).is_err());
    assert_same_elements(repo.get_pius().unwrap(), vec![piu]);
}

fn update_piu(repo: &mut dyn Repository) {
    seed_pius(repo);
    let updated = Piu {
        id: test_support::pius()[1].id.clone(),
        name: "New PIU 1".into(),
        admin_email: "admin@new.piu1.org".into(),
    };
    repo.update_piu(&updated.id.clone(), updated.clone()).unwrap();

    let mut expected = test_support::pius();
    expected[1] = updated;
    assert_same_elements(repo.get_pius().unwrap(), expected);
}

fn update_piu_missing(repo: &mut dyn Repository) {
    seed_pius(repo);
    assert!(repo.update_piu("missing", Piu::default()).is_err());
}

fn pnr_exists(repo: &mut dyn Repository) {
    assert!(!repo.pnr_exists("missing").unwrap());
    seed_pnrs(repo);
    assert!(!repo.pnr_exists("missing").unwrap());
    assert!(repo.pnr_exists(&test_support::pnrs()[1].id).unwrap());
}

fn get_pnr(repo: &mut dyn Repository) {
    assert!(repo.get_pnr("missing").is_err());
    seed_pnrs(repo);
    assert!(repo.get_pnr("missing").is_err());

    let expected = test_support::pnrs()[1].clone();
    assert_eq!(repo.get_pnr(&expected.id).unwrap(), expected);
}

fn get_pnrs_empty(repo: &mut dyn Repository) {
    assert_same_elements(repo.get_pnrs(&PnrFilter::default()).unwrap(), vec![]);
}

fn get_pnrs_filters(repo: &mut dyn Repository) {
    seed_pnrs(repo);

    let pnrs = test_support::pnrs();
    let offset = Duration::minutes(20);
    let start = test_support::earliest_timestamp() + offset;
    let end = test_support::latest_timestamp() - offset;
    let probe = pnrs[1].clone();

    // (name, filter, independent expectation)
    type Keep = fn(&Pnr, &Pnr) -> bool;
    let cases: Vec<(&str, PnrFilter, Keep)> = vec![
        ("empty", PnrFilter::default(), |_, _| true),
        (
            "start",
            PnrFilter { start: Some(start), ..Default::default() },
            |p, _| p.request_timestamp >= test_support::earliest_timestamp() + Duration::minutes(20),
        ),
        (
            "end",
            PnrFilter { end: Some(end), ..Default::default() },
            |p, _| p.request_timestamp <= test_support::latest_timestamp() - Duration::minutes(20),
        ),
        (
            "start_and_end",
            PnrFilter { start: Some(start), end: Some(end), ..Default::default() },
            |p, _| {
                p.request_timestamp >= test_support::earliest_timestamp() + Duration::minutes(20)
                    && p.request_timestamp
                        <= test_support::latest_timestamp() - Duration::minutes(20)
            },
        ),
        (
            "state",
            PnrFilter { state: Some(RequestState::Ack), ..Default::default() },
            |p, _| p.state == RequestState::Ack,
        ),
        (
            "requesting_piu",
            PnrFilter {
                requesting_piu: Some(probe.requesting_piu.clone()),
                ..Default::default()
            },
            |p, probe| p.requesting_piu == probe.requesting_piu,
        ),
        (
            "responding_piu",
            PnrFilter {
                responding_piu: Some(probe.responding_piu.clone()),
                ..Default::default()
            },
            |p, probe| p.responding_piu == probe.responding_piu,
        ),
        (
            "exact",
            PnrFilter {
                start: Some(probe.request_timestamp - Duration::microseconds(1)),
                end: Some(probe.request_timestamp + Duration::microseconds(1)),
                state: Some(probe.state),
                requesting_piu: Some(probe.requesting_piu.clone()),
                responding_piu: Some(probe.responding_piu.clone()),
            },
            |p, probe| p.id == probe.id,
        ),
        (
            "exact_mismatch",
            PnrFilter {
                start: Some(probe.request_timestamp - Duration::microseconds(1)),
                end: Some(probe.request_timestamp + Duration::microseconds(1)),
                state: Some(RequestState::Terminated),
                requesting_piu: Some(probe.requesting_piu.clone()),
                responding_piu: Some(probe.responding_piu.clone()),
            },
            |_, _| false,
        ),
    ];

    for (name, filter, keep) in cases {
        let expected: Vec<Pnr> = pnrs.iter().filter(|p| keep(p, &probe)).cloned().collect();
        let actual = repo.get_pnrs(&filter).unwrap();
        assert_eq!(actual.len(), expected.len(), "filter case {name}");
        assert_same_elements(actual, expected);
    }
}

fn insert_pnr_duplicate(repo: &mut dyn Repository) {
    let pnr = test_support::pnrs()[1].clone();
    repo.insert_pnr(&pnr.id.clone(), pnr.clone()).unwrap();
    assert!(repo.insert_pnr(&pnr.id.clone(), pnr.clone()).is_err());
    assert_same_elements(repo.get_pnrs(&PnrFilter::default()).unwrap(), vec![pnr]);
}

fn update_pnr(repo: &mut dyn Repository) {
    seed_pnrs(repo);

    let original = &test_support::pnrs()[1];
    let updated = Pnr {
        id: original.id.clone(),
        requesting_piu: "new-piu".into(),
        responding_piu: "other-new-piu".into(),
        request_timestamp: original.request_timestamp + Duration::minutes(1),
        response_timestamp: original.response_timestamp.map(|t| t + Duration::minutes(1)),
        state: RequestState::Nack,
        request_data: "\"new data\"".into(),
        response_data: "\"other new data\"".into(),
        pnr_hashes: vec![],
    };
    repo.update_pnr(&updated.id.clone(), updated.clone()).unwrap();

    let mut expected = test_support::pnrs();
    expected[1] = updated;
    assert_same_elements(repo.get_pnrs(&PnrFilter::default()).unwrap(), expected);
}

fn update_pnr_missing(repo: &mut dyn Repository) {
    seed_pnrs(repo);
    assert!(repo.update_pnr("missing", Pnr::default()).is_err());
}

fn purge_pnr_data(repo: &mut dyn Repository) {
    // A record whose state no longer keeps payload.
    let pnr = test_support::pnrs()[2].clone();
    repo.insert_pnr(&pnr.id.clone(), pnr.clone()).unwrap();

    repo.purge_pnr_data(&pnr.id).unwrap();

    let mut expected = pnr;
    expected.request_data = String::new();
    expected.response_data = String::new();
    assert_eq!(repo.get_pnr(&expected.id).unwrap(), expected);
}

fn purge_pnr_data_missing(repo: &mut dyn Repository) {
    assert!(repo.purge_pnr_data("missing").is_err());
}

fn gc_metadata_lifecycle(repo: &mut dyn Repository) {
    assert_same_elements(repo.get_gc_metadatas().unwrap(), vec![]);

    let pnr = test_support::pnrs()[0].clone();
    let gc = GcMetadata {
        id: pnr.id.clone(),
        creation_timestamp: pnr.request_timestamp,
    };

    assert!(!repo.gc_metadata_exists(&pnr.id).unwrap());
    repo.insert_gc_metadata(&pnr, gc.clone()).unwrap();
    assert!(repo.gc_metadata_exists(&pnr.id).unwrap());
    assert_eq!(repo.get_gc_metadata(&pnr.id).unwrap(), gc);
    assert_same_elements(repo.get_gc_metadatas().unwrap(), vec![gc.clone()]);

    let lowered = GcMetadata {
        id: gc.id.clone(),
        creation_timestamp: gc.creation_timestamp - Duration::days(30),
    };
    repo.update_gc_metadata(&pnr, lowered.clone()).unwrap();
    assert_same_elements(repo.get_gc_metadatas().unwrap(), vec![lowered]);
}

fn gc_metadata_duplicate(repo: &mut dyn Repository) {
    let pnr = test_support::pnrs()[0].clone();
    let gc = GcMetadata {
        id: pnr.id.clone(),
        creation_timestamp: pnr.request_timestamp,
    };
    repo.insert_gc_metadata(&pnr, gc.clone()).unwrap();

    let other = GcMetadata {
        id: pnr.id.clone(),
        creation_timestamp: pnr.request_timestamp + Duration::minutes(1),
    };
    assert!(repo.insert_gc_metadata(&pnr, other).is_err());
    assert_same_elements(repo.get_gc_metadatas().unwrap(), vec![gc]);
}

fn update_gc_metadata_missing(repo: &mut dyn Repository) {
    let pnr = test_support::pnrs()[0].clone();
    let gc = GcMetadata {
        id: pnr.id.clone(),
        creation_timestamp: pnr.request_timestamp,
    };
    assert!(repo.update_gc_metadata(&pnr, gc).is_err());
    assert_same_elements(repo.get_gc_metadatas().unwrap(), vec![]);
}

fn delete_gc_metadata(repo: &mut dyn Repository) {
    let pnrs = test_support::pnrs();
    let mut gcs = Vec::new();
    for pnr in &pnrs {
        let gc = GcMetadata {
            id: pnr.id.clone(),
            creation_timestamp: pnr.request_timestamp,
        };
        repo.insert_gc_metadata(pnr, gc.clone()).unwrap();
        gcs.push(gc);
    }

    repo.delete_gc_metadata(&pnrs[1]).unwrap();
    gcs.remove(1);
    assert_same_elements(repo.get_gc_metadatas().unwrap(), gcs);

    // Deleting what is already gone is an error.
    assert!(repo.delete_gc_metadata(&pnrs[1]).is_err());
    assert!(repo.delete_local_gc_metadata(&pnrs[1].id).is_err());
}
