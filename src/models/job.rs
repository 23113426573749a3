use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The slice of a job posting the lifecycle core needs: enough to check
/// company standing and to address employer-side notifications. The full
/// posting belongs to the jobs collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobSummary {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub contact_account_id: Uuid,
    pub contact_email: String,
    pub published_at: Option<DateTime<Utc>>,
}
