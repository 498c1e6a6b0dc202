//! Idempotent natal profile computation.
//!
//! [`ComputeOrchestrator`] reads a stored [`ProfileRow`], hashes the inputs
//! that determine its result and either returns the stored result
//! unchanged or runs the [`pipeline`] and persists the new result. Domain
//! problems (missing fields, ambiguous or nonexistent local times, precision
//! limits) come back as [`ComputeFailure`] values with an HTTP-style status;
//! only storage problems are fatal [`ComputeError`]s.

pub mod error;
pub mod hash;
pub mod orchestrator;
pub mod pipeline;
pub mod record;
pub mod store;

pub use error::{ComputeError, ComputeFailure, FailureCode, StoreError};
pub use hash::compute_hash;
pub use orchestrator::{
    ComputeOrchestrator, ComputeOutcome, ComputePolicy, ComputeSummary, OrchestratorConfig,
    STRICT_MODE_ENV,
};
pub use pipeline::{BirthData, NatalProfile, PipelineError, compute_profile};
pub use record::{InputStatus, ProfileRow, SignAnchors, ValidationStatus};
pub use store::{InMemoryProfileStore, JsonFileProfileStore, ProfileStore};
