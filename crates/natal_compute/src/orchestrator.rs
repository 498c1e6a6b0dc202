//! Hash-gated, per-subject serialized recomputation of stored profiles.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use natal_core::Body;
use natal_rs::{Ephemeris, EphemerisError};
use natal_time::TimeError;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{ComputeError, ComputeFailure, FailureCode, StoreError};
use crate::hash::compute_hash;
use crate::pipeline::{BirthData, PipelineError, compute_profile};
use crate::record::{InputStatus, ProfileRow, SignAnchors, ValidationStatus};
use crate::store::ProfileStore;

/// Environment variable holding the strict-mode flag ("1"/"0").
pub const STRICT_MODE_ENV: &str = "NATAL_STRICT_MODE";

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    pub persistence_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            persistence_timeout: Duration::from_secs(5),
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> Result<(), ComputeError> {
        if self.persistence_timeout.is_zero() {
            return Err(ComputeError::InvalidConfig(
                "persistence_timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Per-request policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputePolicy {
    /// Reject positions outside their high-accuracy window. Bodies without a
    /// long-term theory (Pluto) only downgrade the status.
    pub strict_mode: bool,
    /// Recompute even when the input hash is unchanged.
    pub force: bool,
}

impl Default for ComputePolicy {
    fn default() -> Self {
        Self {
            strict_mode: true,
            force: false,
        }
    }
}

impl ComputePolicy {
    /// Strict mode from [`STRICT_MODE_ENV`]; unset means strict.
    pub fn from_env(force: bool) -> Self {
        let strict_mode = std::env::var(STRICT_MODE_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(true);
        Self { strict_mode, force }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Successful compute response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputeSummary {
    pub subject_id: String,
    pub compute_hash: String,
    pub computed_at: DateTime<Utc>,
    pub validation_status: Option<ValidationStatus>,
    pub anchors: Option<SignAnchors>,
    pub input_status: InputStatus,
}

/// Result of one orchestrator call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ComputeOutcome {
    Computed(ComputeSummary),
    /// Input hash unchanged; the stored result was left untouched.
    Skipped(ComputeSummary),
    Failed(ComputeFailure),
}

impl ComputeOutcome {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    pub fn skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::Failed(f) => f.http_status,
            _ => 200,
        }
    }

    pub fn summary(&self) -> Option<&ComputeSummary> {
        match self {
            Self::Computed(s) | Self::Skipped(s) => Some(s),
            Self::Failed(_) => None,
        }
    }
}

type SubjectLocks = parking_lot::Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

/// Holds one subject's lock handle; the map entry is dropped with the last
/// handle, so the map only tracks subjects with calls in flight.
struct SubjectLease<'a> {
    locks: &'a SubjectLocks,
    subject_id: &'a str,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Drop for SubjectLease<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock();
        // The map's handle plus ours.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(self.subject_id);
        }
    }
}

/// Computes and persists natal profiles.
pub struct ComputeOrchestrator {
    store: Arc<dyn ProfileStore>,
    ephemeris: Arc<Ephemeris>,
    config: OrchestratorConfig,
    locks: SubjectLocks,
}

impl ComputeOrchestrator {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        ephemeris: Arc<Ephemeris>,
        config: OrchestratorConfig,
    ) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self {
            store,
            ephemeris,
            config,
            locks: parking_lot::Mutex::new(HashMap::new()),
        })
    }

    pub fn ephemeris(&self) -> &Ephemeris {
        &self.ephemeris
    }

    /// Subjects with a compute call running or queued.
    pub fn active_subjects(&self) -> usize {
        self.locks.lock().len()
    }

    fn lease<'a>(&'a self, subject_id: &'a str) -> SubjectLease<'a> {
        let lock = self
            .locks
            .lock()
            .entry(subject_id.to_string())
            .or_default()
            .clone();
        SubjectLease {
            locks: &self.locks,
            subject_id,
            lock,
        }
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, ComputeError> {
        match tokio::time::timeout(self.config.persistence_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ComputeError::PersistenceTimeout(self.config.persistence_timeout)),
        }
    }

    async fn save(&self, row: &ProfileRow) -> Result<(), ComputeError> {
        self.with_timeout(self.store.save(row)).await
    }

    /// Record a failure on the row and return it as the outcome. Any earlier
    /// result is cleared so a later call with the same inputs recomputes.
    async fn fail(
        &self,
        mut row: ProfileRow,
        status: ValidationStatus,
        failure: ComputeFailure,
    ) -> Result<ComputeOutcome, ComputeError> {
        row.input_status = InputStatus::Error;
        row.result = None;
        row.anchors = None;
        row.compute_hash = None;
        row.computed_at = None;
        row.validation_status = Some(status);
        row.validation_details = Some(failure.details.clone());
        self.save(&row).await?;
        info!(
            subject = %row.subject_id,
            code = failure.code.as_str(),
            "compute failed"
        );
        Ok(ComputeOutcome::Failed(failure))
    }

    /// Compute the profile of `subject_id` under `policy`.
    ///
    /// Calls for the same subject are serialized; different subjects run
    /// concurrently.
    pub async fn compute(
        &self,
        subject_id: &str,
        policy: ComputePolicy,
    ) -> Result<ComputeOutcome, ComputeError> {
        let lease = self.lease(subject_id);
        let _guard = lease.lock.lock().await;

        let Some(mut row) = self.with_timeout(self.store.load(subject_id)).await? else {
            return Ok(ComputeOutcome::Failed(ComputeFailure::new(
                FailureCode::ProfileNotFound,
                "profile not found",
                json!({ "subject_id": subject_id }),
            )));
        };

        let missing = row.missing_fields();
        if !missing.is_empty() {
            let failure = ComputeFailure::new(
                FailureCode::MissingFields,
                "missing required fields",
                json!({ "missing": missing }),
            );
            return self.fail(row, ValidationStatus::MissingFields, failure).await;
        }

        let hash = compute_hash(&row, policy.strict_mode)?;
        let unchanged = !policy.force
            && row.input_status == InputStatus::Computed
            && row.compute_hash.as_deref() == Some(hash.as_str());
        if let Some(computed_at) = row.computed_at.filter(|_| unchanged) {
            info!(subject = %subject_id, "inputs unchanged, skipping");
            return Ok(ComputeOutcome::Skipped(ComputeSummary {
                subject_id: row.subject_id.clone(),
                compute_hash: hash,
                computed_at,
                validation_status: row.validation_status,
                anchors: row.anchors.clone(),
                input_status: row.input_status,
            }));
        }

        let birth = match parse_birth(&row) {
            Ok(b) => b,
            Err(failure) => return self.fail(row, ValidationStatus::InvalidInput, failure).await,
        };

        row.input_status = InputStatus::Computing;
        self.save(&row).await?;

        let profile = match compute_profile(&self.ephemeris, &birth).await {
            Ok(p) => p,
            Err(err) => {
                let (status, failure) = pipeline_failure(err);
                return self.fail(row, status, failure).await;
            }
        };

        let out_of_range: Vec<Body> = profile
            .validation
            .reduced_bodies
            .iter()
            .copied()
            .filter(|b| b.has_long_term_theory())
            .collect();
        if policy.strict_mode && !out_of_range.is_empty() {
            let failure = ComputeFailure::new(
                FailureCode::PrecisionOutOfRange,
                "positions outside the high-accuracy window",
                json!({
                    "bodies": out_of_range,
                    "httpStatus": FailureCode::PrecisionOutOfRange.http_status(),
                }),
            );
            return self.fail(row, ValidationStatus::PrecisionOutOfRange, failure).await;
        }

        let computed_at = Utc::now();
        let anchors = profile.anchors();
        let status = profile.validation.status;
        row.result = Some(serde_json::to_value(&profile)?);
        row.validation_details = Some(serde_json::to_value(&profile.validation)?);
        row.compute_hash = Some(hash.clone());
        row.computed_at = Some(computed_at);
        row.validation_status = Some(status);
        row.anchors = Some(anchors.clone());
        row.input_status = InputStatus::Computed;
        self.save(&row).await?;

        info!(subject = %subject_id, ?status, "profile computed");
        Ok(ComputeOutcome::Computed(ComputeSummary {
            subject_id: row.subject_id,
            compute_hash: hash,
            computed_at,
            validation_status: Some(status),
            anchors: Some(anchors),
            input_status: InputStatus::Computed,
        }))
    }
}

fn invalid(message: String) -> ComputeFailure {
    ComputeFailure::new(FailureCode::InvalidInput, message.clone(), json!({ "reason": message }))
}

/// Parse stored string fields. Presence was checked by `missing_fields`.
fn parse_birth(row: &ProfileRow) -> Result<BirthData, ComputeFailure> {
    let date_str = row.birth_date.as_deref().unwrap_or_default();
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| invalid(format!("birth_date {date_str:?}: {e}")))?;

    let time = if row.birth_time_unknown {
        None
    } else {
        let s = row.birth_time.as_deref().unwrap_or_default();
        let parsed = NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map_err(|e| invalid(format!("birth_time {s:?}: {e}")))?;
        Some(parsed)
    };

    Ok(BirthData {
        date,
        time,
        zone: row.iana_time_zone.clone().unwrap_or_default(),
        fold: row.fold,
        latitude_deg: row.birth_lat.unwrap_or_default(),
        longitude_deg: row.birth_lng.unwrap_or_default(),
    })
}

fn pipeline_failure(err: PipelineError) -> (ValidationStatus, ComputeFailure) {
    match err {
        PipelineError::Time(TimeError::AmbiguousLocalTime {
            local,
            zone,
            candidates,
        }) => {
            warn!(%local, %zone, "ambiguous local time without fold");
            let options: Vec<_> = candidates
                .iter()
                .map(|c| {
                    json!({
                        "fold": c.fold,
                        "utc": c.utc.to_rfc3339(),
                        "utc_offset_minutes": c.utc_offset_minutes,
                    })
                })
                .collect();
            (
                ValidationStatus::AmbiguousLocalTime,
                ComputeFailure::new(
                    FailureCode::AmbiguousLocalTime,
                    format!("local time {local} occurs twice in {zone}; supply fold 0 or 1"),
                    json!({ "local": local.to_string(), "zone": zone, "candidates": options }),
                ),
            )
        }
        PipelineError::Time(TimeError::NonexistentLocalTime { local, zone }) => {
            warn!(%local, %zone, "nonexistent local time");
            (
                ValidationStatus::NonexistentLocalTime,
                ComputeFailure::new(
                    FailureCode::NonexistentLocalTime,
                    format!("local time {local} does not exist in {zone}"),
                    json!({ "local": local.to_string(), "zone": zone }),
                ),
            )
        }
        PipelineError::Time(e) => {
            let code = e.code();
            (
                ValidationStatus::InvalidInput,
                ComputeFailure::new(
                    FailureCode::InvalidInput,
                    e.to_string(),
                    json!({ "reason": code }),
                ),
            )
        }
        PipelineError::Ephemeris(EphemerisError::Time(e)) => {
            (ValidationStatus::InvalidInput, invalid(e.to_string()))
        }
        other => (ValidationStatus::InvalidInput, invalid(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(" Off "));
    }

    #[test]
    fn parse_birth_accepts_both_time_forms() {
        let mut row = ProfileRow::new("s");
        row.birth_date = Some("1980-06-24".into());
        row.birth_time = Some("15:20".into());
        row.iana_time_zone = Some("Europe/Berlin".into());
        row.birth_lat = Some(52.0);
        row.birth_lng = Some(9.0);
        let b = parse_birth(&row).unwrap();
        assert_eq!(b.time, NaiveTime::from_hms_opt(15, 20, 0));
        row.birth_time = Some("15:20:30".into());
        assert_eq!(parse_birth(&row).unwrap().time, NaiveTime::from_hms_opt(15, 20, 30));
        row.birth_time = Some("quarter past three".into());
        let f = parse_birth(&row).unwrap_err();
        assert_eq!(f.code, FailureCode::InvalidInput);
        assert_eq!(f.http_status, 422);
    }

    #[test]
    fn failure_codes_map_to_http() {
        assert_eq!(FailureCode::AmbiguousLocalTime.http_status(), 409);
        assert_eq!(FailureCode::NonexistentLocalTime.http_status(), 422);
        assert_eq!(FailureCode::ProfileNotFound.http_status(), 404);
        assert_eq!(
            serde_json::to_string(&FailureCode::PrecisionOutOfRange).unwrap(),
            "\"PRECISION_OUT_OF_RANGE\""
        );
    }
}
