pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Error;
use crate::models::application::{Application, ApplicationStatus, NewApplication};

/// Storage abstraction for the lifecycle engine. The Postgres
/// implementation backs the service; the in-memory one backs the test
/// suite. Both enforce the (job, candidate) uniqueness slot and the
/// atomic status-plus-history write themselves, so no caller can race
/// past them.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Persist a new application with initial status `applied` and a
    /// single history entry. Fails with [`StoreError::Duplicate`] when a
    /// record for the same (job, candidate) pair already exists.
    async fn create(&self, new: NewApplication) -> Result<Application, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Application, StoreError>;

    /// Applications for one job, newest first. `statuses` of `None`
    /// means no status restriction; callers are expected to pass the
    /// role-appropriate default set instead of `None` for employer
    /// queries.
    async fn list_for_job(
        &self,
        job_id: Uuid,
        statuses: Option<&[ApplicationStatus]>,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Application>, i64), StoreError>;

    /// All applications owned by one candidate account, newest first.
    async fn list_for_candidate(&self, account_id: Uuid) -> Result<Vec<Application>, StoreError>;

    /// Conditional write: set `new_status` and append exactly one history
    /// entry, but only if the record is still at `expected_version`.
    /// A concurrent writer that got there first makes this fail with
    /// [`StoreError::Stale`] instead of silently overwriting.
    async fn append_transition(
        &self,
        id: Uuid,
        expected_version: i32,
        new_status: ApplicationStatus,
        actor_id: Uuid,
        note: Option<String>,
    ) -> Result<Application, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("an application for this candidate and job already exists")]
    Duplicate,

    #[error("application not found")]
    NotFound,

    #[error("application was modified concurrently")]
    Stale,

    #[error("storage unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => Error::DuplicateApplication,
            StoreError::NotFound => Error::NotFound("Application not found".to_string()),
            StoreError::Stale => {
                Error::Conflict("Application was modified concurrently, retry".to_string())
            }
            StoreError::Unavailable(err) => Error::Internal(err.to_string()),
        }
    }
}
