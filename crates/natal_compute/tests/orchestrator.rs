//! End-to-end orchestrator behaviour against in-memory and file stores.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use natal_compute::{
    ComputeError, ComputeOrchestrator, ComputeOutcome, ComputePolicy, FailureCode,
    InMemoryProfileStore, InputStatus, JsonFileProfileStore, OrchestratorConfig, ProfileRow,
    ProfileStore, StoreError, ValidationStatus,
};
use natal_rs::{Ephemeris, EphemerisConfig};

fn hanover_row(subject: &str) -> ProfileRow {
    ProfileRow {
        birth_date: Some("1980-06-24".into()),
        birth_time: Some("15:20".into()),
        iana_time_zone: Some("Europe/Berlin".into()),
        birth_lat: Some(52.3759),
        birth_lng: Some(9.7320),
        ..ProfileRow::new(subject)
    }
}

fn orchestrator(store: Arc<dyn ProfileStore>) -> ComputeOrchestrator {
    let eph = Arc::new(Ephemeris::new(EphemerisConfig::default()).unwrap());
    ComputeOrchestrator::new(store, eph, OrchestratorConfig::default()).unwrap()
}

const POLICY: ComputePolicy = ComputePolicy {
    strict_mode: true,
    force: false,
};

#[tokio::test]
async fn second_call_is_skipped() {
    let store = Arc::new(InMemoryProfileStore::new());
    store.insert(hanover_row("s1"));
    let orch = orchestrator(store.clone());

    let first = orch.compute("s1", POLICY).await.unwrap();
    let ComputeOutcome::Computed(summary) = &first else {
        panic!("expected computed, got {first:?}");
    };
    assert_eq!(summary.validation_status, Some(ValidationStatus::Valid));
    let anchors = summary.anchors.as_ref().unwrap();
    assert_eq!(anchors.sun_sign.as_deref(), Some("Cancer"));
    assert_eq!(anchors.asc_sign.as_deref(), Some("Libra"));

    let stored = store.get("s1").unwrap();
    assert_eq!(stored.input_status, InputStatus::Computed);
    assert!(stored.result.is_some());

    let second = orch.compute("s1", POLICY).await.unwrap();
    assert!(second.skipped());
    assert_eq!(
        second.summary().unwrap().compute_hash,
        first.summary().unwrap().compute_hash
    );
    assert_eq!(store.get("s1").unwrap(), stored);
}

#[tokio::test]
async fn force_recomputes() {
    let store = Arc::new(InMemoryProfileStore::new());
    store.insert(hanover_row("s2"));
    let orch = orchestrator(store);
    orch.compute("s2", POLICY).await.unwrap();
    let again = orch
        .compute("s2", ComputePolicy { force: true, ..POLICY })
        .await
        .unwrap();
    assert!(matches!(again, ComputeOutcome::Computed(_)));
}

#[tokio::test]
async fn changed_input_recomputes() {
    let store = Arc::new(InMemoryProfileStore::new());
    store.insert(hanover_row("s3"));
    let orch = orchestrator(store.clone());
    let first = orch.compute("s3", POLICY).await.unwrap();

    let mut row = store.get("s3").unwrap();
    row.birth_time = Some("15:21".into());
    store.insert(row);
    let second = orch.compute("s3", POLICY).await.unwrap();
    assert!(!second.skipped());
    assert_ne!(
        first.summary().unwrap().compute_hash,
        second.summary().unwrap().compute_hash
    );
}

#[tokio::test]
async fn missing_profile_is_404() {
    let orch = orchestrator(Arc::new(InMemoryProfileStore::new()));
    let out = orch.compute("nobody", POLICY).await.unwrap();
    assert_eq!(out.http_status(), 404);
    assert!(!out.is_ok());
}

#[tokio::test]
async fn missing_fields_are_listed() {
    let store = Arc::new(InMemoryProfileStore::new());
    let mut row = hanover_row("s4");
    row.iana_time_zone = None;
    row.birth_lat = None;
    store.insert(row);
    let orch = orchestrator(store.clone());

    let ComputeOutcome::Failed(f) = orch.compute("s4", POLICY).await.unwrap() else {
        panic!("expected failure");
    };
    assert_eq!(f.code, FailureCode::MissingFields);
    assert_eq!(f.http_status, 422);
    assert_eq!(f.details["missing"], serde_json::json!(["iana_time_zone", "birth_lat"]));

    let stored = store.get("s4").unwrap();
    assert_eq!(stored.input_status, InputStatus::Error);
    assert_eq!(stored.validation_status, Some(ValidationStatus::MissingFields));
}

#[tokio::test]
async fn ambiguous_time_needs_fold() {
    let store = Arc::new(InMemoryProfileStore::new());
    let mut row = hanover_row("s5");
    row.birth_date = Some("2023-10-29".into());
    row.birth_time = Some("02:30".into());
    store.insert(row);
    let orch = orchestrator(store.clone());

    let ComputeOutcome::Failed(f) = orch.compute("s5", POLICY).await.unwrap() else {
        panic!("expected failure");
    };
    assert_eq!(f.code, FailureCode::AmbiguousLocalTime);
    assert_eq!(f.http_status, 409);
    assert_eq!(f.details["candidates"].as_array().unwrap().len(), 2);

    let mut row = store.get("s5").unwrap();
    row.fold = Some(1);
    store.insert(row);
    let out = orch.compute("s5", POLICY).await.unwrap();
    assert!(matches!(out, ComputeOutcome::Computed(_)));
}

#[tokio::test]
async fn nonexistent_time_is_422() {
    let store = Arc::new(InMemoryProfileStore::new());
    let mut row = hanover_row("s6");
    row.birth_date = Some("2023-03-26".into());
    row.birth_time = Some("02:30".into());
    store.insert(row);
    let orch = orchestrator(store);
    let ComputeOutcome::Failed(f) = orch.compute("s6", POLICY).await.unwrap() else {
        panic!("expected failure");
    };
    assert_eq!(f.code, FailureCode::NonexistentLocalTime);
    assert_eq!(f.http_status, 422);
}

#[tokio::test]
async fn strict_mode_rejects_out_of_window_dates() {
    let store = Arc::new(InMemoryProfileStore::new());
    let mut row = hanover_row("s7");
    row.birth_date = Some("1450-06-24".into());
    store.insert(row);
    let orch = orchestrator(store.clone());

    let ComputeOutcome::Failed(f) = orch.compute("s7", POLICY).await.unwrap() else {
        panic!("expected failure");
    };
    assert_eq!(f.code, FailureCode::PrecisionOutOfRange);
    assert_eq!(f.details["bodies"], serde_json::json!(["moon"]));

    let lenient = ComputePolicy {
        strict_mode: false,
        force: false,
    };
    let out = orch.compute("s7", lenient).await.unwrap();
    assert_eq!(
        out.summary().unwrap().validation_status,
        Some(ValidationStatus::ReducedPrecision)
    );
}

#[tokio::test]
async fn eighteenth_century_birth_computes_under_strict_mode() {
    let store = Arc::new(InMemoryProfileStore::new());
    let mut row = hanover_row("s10");
    row.birth_date = Some("1799-06-24".into());
    store.insert(row);
    let orch = orchestrator(store.clone());

    let out = orch.compute("s10", POLICY).await.unwrap();
    let ComputeOutcome::Computed(summary) = &out else {
        panic!("expected computed, got {out:?}");
    };
    // Pluto's series starts in 1885; it downgrades the status only.
    assert_eq!(summary.validation_status, Some(ValidationStatus::ReducedPrecision));
    let stored = store.get("s10").unwrap();
    let details = stored.validation_details.unwrap();
    assert_eq!(details["reduced_bodies"], serde_json::json!(["pluto"]));
}

#[tokio::test]
async fn reverted_input_recomputes_after_failure() {
    let store = Arc::new(InMemoryProfileStore::new());
    store.insert(hanover_row("s11"));
    let orch = orchestrator(store.clone());
    let first = orch.compute("s11", POLICY).await.unwrap();
    assert!(matches!(first, ComputeOutcome::Computed(_)));

    let mut row = store.get("s11").unwrap();
    row.birth_date = Some("2023-10-29".into());
    row.birth_time = Some("02:30".into());
    store.insert(row);
    let failed = orch.compute("s11", POLICY).await.unwrap();
    assert_eq!(failed.http_status(), 409);
    let stored = store.get("s11").unwrap();
    assert!(stored.compute_hash.is_none());
    assert!(stored.computed_at.is_none());
    assert!(stored.result.is_none());

    store.insert(ProfileRow {
        input_status: stored.input_status,
        validation_status: stored.validation_status,
        ..hanover_row("s11")
    });
    let again = orch.compute("s11", POLICY).await.unwrap();
    let ComputeOutcome::Computed(summary) = &again else {
        panic!("expected computed, got {again:?}");
    };
    assert_eq!(summary.validation_status, Some(ValidationStatus::Valid));
    assert_eq!(summary.compute_hash, first.summary().unwrap().compute_hash);
    assert_eq!(store.get("s11").unwrap().input_status, InputStatus::Computed);
}

#[tokio::test]
async fn subject_locks_are_released() {
    let store = Arc::new(InMemoryProfileStore::new());
    store.insert(hanover_row("s12"));
    let orch = Arc::new(orchestrator(store));

    for k in 0..1000 {
        let out = orch.compute(&format!("missing-{k}"), POLICY).await.unwrap();
        assert_eq!(out.http_status(), 404);
    }
    assert_eq!(orch.active_subjects(), 0);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let orch = orch.clone();
            tokio::spawn(async move { orch.compute("s12", POLICY).await.unwrap() })
        })
        .collect();
    for h in handles {
        assert!(h.await.unwrap().is_ok());
    }
    assert_eq!(orch.active_subjects(), 0);
}

#[tokio::test]
async fn unknown_zone_is_invalid_input() {
    let store = Arc::new(InMemoryProfileStore::new());
    let mut row = hanover_row("s8");
    row.iana_time_zone = Some("Atlantis/Capital".into());
    store.insert(row);
    let orch = orchestrator(store);
    let ComputeOutcome::Failed(f) = orch.compute("s8", POLICY).await.unwrap() else {
        panic!("expected failure");
    };
    assert_eq!(f.code, FailureCode::InvalidInput);
}

#[tokio::test]
async fn concurrent_requests_compute_once() {
    let store = Arc::new(InMemoryProfileStore::new());
    store.insert(hanover_row("s9"));
    let orch = Arc::new(orchestrator(store));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let orch = orch.clone();
            tokio::spawn(async move { orch.compute("s9", POLICY).await.unwrap() })
        })
        .collect();
    let mut computed = 0;
    for h in handles {
        if matches!(h.await.unwrap(), ComputeOutcome::Computed(_)) {
            computed += 1;
        }
    }
    assert_eq!(computed, 1);
}

#[tokio::test]
async fn file_store_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileProfileStore::new(dir.path()));
    store.save(&hanover_row("file-subject")).await.unwrap();
    let orch = orchestrator(store.clone());

    assert!(matches!(
        orch.compute("file-subject", POLICY).await.unwrap(),
        ComputeOutcome::Computed(_)
    ));
    let row = store.load("file-subject").await.unwrap().unwrap();
    assert_eq!(row.input_status, InputStatus::Computed);
    assert!(orch.compute("file-subject", POLICY).await.unwrap().skipped());
}

/// Store whose writes never finish.
struct StalledStore {
    inner: InMemoryProfileStore,
}

#[async_trait]
impl ProfileStore for StalledStore {
    async fn load(&self, subject_id: &str) -> Result<Option<ProfileRow>, StoreError> {
        self.inner.load(subject_id).await
    }

    async fn save(&self, _row: &ProfileRow) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

#[tokio::test]
async fn persistence_timeout_is_fatal() {
    let inner = InMemoryProfileStore::new();
    inner.insert(hanover_row("slow"));
    let store = Arc::new(StalledStore { inner });
    let eph = Arc::new(Ephemeris::new(EphemerisConfig::default()).unwrap());
    let orch = ComputeOrchestrator::new(
        store.clone(),
        eph,
        OrchestratorConfig {
            persistence_timeout: Duration::from_millis(50),
        },
    )
    .unwrap();

    let err = orch.compute("slow", POLICY).await.unwrap_err();
    assert!(matches!(err, ComputeError::PersistenceTimeout(_)));
    // Nothing was written.
    assert!(store.inner.get("slow").unwrap().compute_hash.is_none());
}
