use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::application::{
    Application, ApplicationStatus, HistoryEntry, NewApplication,
};
use crate::store::{ApplicationStore, StoreError};

/// Postgres-backed store. Uniqueness of the (job, candidate) slot is a
/// unique index, and transitions are a single conditional UPDATE keyed on
/// the version column, so both invariants hold under concurrent writers
/// without any application-level locking.
#[derive(Clone)]
pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = "id, job_id, candidate_id, candidate_account_id, status, history, \
                       resume_url, version, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: Uuid,
    job_id: Uuid,
    candidate_id: Uuid,
    candidate_account_id: Uuid,
    status: String,
    history: Json<Vec<HistoryEntry>>,
    resume_url: Option<String>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = StoreError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ApplicationStatus>()
            .map_err(|e| StoreError::Unavailable(anyhow::anyhow!(e)))?;
        Ok(Application {
            id: row.id,
            job_id: row.job_id,
            candidate_id: row.candidate_id,
            candidate_account_id: row.candidate_account_id,
            status,
            history: row.history.0,
            resume_url: row.resume_url,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Unavailable(err.into()),
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn create(&self, new: NewApplication) -> Result<Application, StoreError> {
        let entry = HistoryEntry {
            status: ApplicationStatus::Applied,
            actor_id: new.candidate_id,
            note: Some(new.note.unwrap_or_else(|| "submitted".to_string())),
            timestamp: Utc::now(),
        };
        let sql = format!(
            "INSERT INTO applications \
             (job_id, candidate_id, candidate_account_id, status, history, resume_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(new.job_id)
            .bind(new.candidate_id)
            .bind(new.candidate_account_id)
            .bind(ApplicationStatus::Applied.as_str())
            .bind(Json(vec![entry]))
            .bind(new.resume_url)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.try_into()
    }

    async fn get(&self, id: Uuid) -> Result<Application, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn list_for_job(
        &self,
        job_id: Uuid,
        statuses: Option<&[ApplicationStatus]>,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Application>, i64), StoreError> {
        let status_strs: Option<Vec<String>> = statuses
            .map(|set| set.iter().map(|s| s.as_str().to_string()).collect());
        let offset = (page.max(1) - 1) * per_page;

        let (list_sql, count_sql) = if status_strs.is_some() {
            (
                format!(
                    "SELECT {COLUMNS} FROM applications \
                     WHERE job_id = $1 AND status = ANY($2) \
                     ORDER BY created_at DESC LIMIT $3 OFFSET $4"
                ),
                "SELECT COUNT(*) FROM applications WHERE job_id = $1 AND status = ANY($2)"
                    .to_string(),
            )
        } else {
            (
                format!(
                    "SELECT {COLUMNS} FROM applications \
                     WHERE job_id = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                ),
                "SELECT COUNT(*) FROM applications WHERE job_id = $1".to_string(),
            )
        };

        let (rows, total) = if let Some(ref strs) = status_strs {
            let rows = sqlx::query_as::<_, ApplicationRow>(&list_sql)
                .bind(job_id)
                .bind(strs.clone())
                .bind(per_page)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?;
            let total: (i64,) = sqlx::query_as(&count_sql)
                .bind(job_id)
                .bind(strs.clone())
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx)?;
            (rows, total.0)
        } else {
            let rows = sqlx::query_as::<_, ApplicationRow>(&list_sql)
                .bind(job_id)
                .bind(per_page)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?;
            let total: (i64,) = sqlx::query_as(&count_sql)
                .bind(job_id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx)?;
            (rows, total.0)
        };

        let items = rows
            .into_iter()
            .map(Application::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn list_for_candidate(&self, account_id: Uuid) -> Result<Vec<Application>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM applications \
             WHERE candidate_account_id = $1 \
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.into_iter().map(Application::try_from).collect()
    }

    async fn append_transition(
        &self,
        id: Uuid,
        expected_version: i32,
        new_status: ApplicationStatus,
        actor_id: Uuid,
        note: Option<String>,
    ) -> Result<Application, StoreError> {
        let entry = HistoryEntry {
            status: new_status,
            actor_id,
            note,
            timestamp: Utc::now(),
        };
        // `history || $2` appends the entry object to the JSONB array in
        // the same statement that swaps the status, so readers never see
        // one without the other.
        let sql = format!(
            "UPDATE applications \
             SET status = $1, history = history || $2, version = version + 1, updated_at = NOW() \
             WHERE id = $3 AND version = $4 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(new_status.as_str())
            .bind(Json(entry))
            .bind(id)
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        match row {
            Some(row) => row.try_into(),
            None => {
                // Zero rows: either the record is gone or another writer
                // bumped the version first.
                let exists: Option<(i32,)> =
                    sqlx::query_as("SELECT version FROM applications WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(map_sqlx)?;
                match exists {
                    Some(_) => Err(StoreError::Stale),
                    None => Err(StoreError::NotFound),
                }
            }
        }
    }
}
