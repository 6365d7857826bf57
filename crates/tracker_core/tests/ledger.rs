use tracker_core::{InsertOutcome, JobKey, JobRecord, TrackedJobs, TrackedSet, TRACK_CAP};

fn job(title: &str, company: &str) -> JobRecord {
    JobRecord {
        title: title.to_string(),
        company_name: company.to_string(),
        ..JobRecord::unavailable()
    }
}

fn assert_consistent(ledger: &TrackedJobs) {
    assert!(ledger.index().len() <= ledger.records().len());
    for record in ledger.records() {
        assert!(ledger.contains(&record.key()), "missing key for {}", record.key());
        assert_eq!(ledger.index().get(&record.key().storage_key()), Some(&true));
    }
}

#[test]
fn duplicate_key_is_rejected_without_mutation() {
    let mut ledger = TrackedJobs::new();
    assert!(matches!(
        ledger.insert_front(job("T1", "C1")),
        InsertOutcome::Inserted { .. }
    ));
    let before = ledger.clone();

    let mut second = job("T1", "C1");
    second.location = "Elsewhere".to_string();
    assert_eq!(ledger.insert_front(second), InsertOutcome::Duplicate);
    assert_eq!(ledger, before);
    assert_eq!(ledger.len(), 1);
}

#[test]
fn newest_first_and_capped() {
    let mut ledger = TrackedJobs::new();
    for i in 0..15 {
        ledger.insert_front(job(&format!("T{i}"), "C"));
        assert_eq!(ledger.len(), (i + 1).min(TRACK_CAP));
        assert_consistent(&ledger);
    }

    let titles: Vec<_> = ledger.records().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["T14", "T13", "T12", "T11", "T10", "T9", "T8", "T7", "T6", "T5"]
    );
}

#[test]
fn eviction_drops_index_entries_and_allows_retracking() {
    let mut ledger = TrackedJobs::new();
    for i in 0..TRACK_CAP {
        ledger.insert_front(job(&format!("T{i}"), "C"));
    }

    match ledger.insert_front(job("New", "C")) {
        InsertOutcome::Inserted { evicted } => {
            assert_eq!(evicted.len(), 1);
            assert_eq!(evicted[0].title, "T0");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(!ledger.contains(&JobKey::new("T0", "C")));
    assert_consistent(&ledger);

    assert!(matches!(
        ledger.insert_front(job("T0", "C")),
        InsertOutcome::Inserted { .. }
    ));
    assert_eq!(ledger.records()[0].title, "T0");
}

#[test]
fn from_parts_repairs_orphans_and_missing_keys() {
    let mut index = TrackedSet::new();
    index.insert("Gone_C".to_string(), true);
    let records = vec![job("A", "C"), job("B", "C"), job("A", "C")];

    let (ledger, repaired) = TrackedJobs::from_parts(records, index);

    assert!(repaired);
    assert_eq!(ledger.len(), 2);
    assert!(!ledger.contains(&JobKey::new("Gone", "C")));
    assert!(ledger.contains(&JobKey::new("A", "C")));
    assert!(ledger.contains(&JobKey::new("B", "C")));
    assert_consistent(&ledger);
}

#[test]
fn from_parts_accepts_consistent_documents() {
    let mut ledger = TrackedJobs::new();
    ledger.insert_front(job("A", "C"));
    ledger.insert_front(job("B", "D"));
    let (records, index) = ledger.clone().into_parts();

    let (restored, repaired) = TrackedJobs::from_parts(records, index);
    assert!(!repaired);
    assert_eq!(restored, ledger);
}

#[test]
fn storage_key_joins_title_and_company() {
    assert_eq!(JobKey::new("T1", "C1").storage_key(), "T1_C1");
}

#[test]
fn keys_sharing_a_joined_form_stay_distinct() {
    let mut ledger = TrackedJobs::new();
    ledger.insert_front(job("Dev_Ops", "Acme"));

    assert!(!ledger.contains(&JobKey::new("Dev", "Ops_Acme")));
    assert!(matches!(
        ledger.insert_front(job("Dev", "Ops_Acme")),
        InsertOutcome::Inserted { .. }
    ));
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.index().len(), 1);
    assert_consistent(&ledger);

    let (records, index) = ledger.clone().into_parts();
    let (restored, repaired) = TrackedJobs::from_parts(records, index);
    assert!(!repaired);
    assert_eq!(restored, ledger);
}

#[test]
fn evicting_one_of_two_colliding_keys_keeps_the_index_entry() {
    let mut ledger = TrackedJobs::new();
    ledger.insert_front(job("Dev_Ops", "Acme"));
    ledger.insert_front(job("Dev", "Ops_Acme"));
    for i in 0..TRACK_CAP - 1 {
        ledger.insert_front(job(&format!("T{i}"), "C"));
    }

    assert!(!ledger.contains(&JobKey::new("Dev_Ops", "Acme")));
    assert!(ledger.contains(&JobKey::new("Dev", "Ops_Acme")));
    assert_consistent(&ledger);
}
