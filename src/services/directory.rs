use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::JobSummary;
use crate::models::profile::CandidateProfile;

/// Profile collaborator. Only completed profiles come back; an account
/// without a usable profile reads as `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn completed_profile(&self, account_id: Uuid) -> Result<Option<CandidateProfile>>;
}

/// Job/company collaborator: resolves postings and answers company
/// membership questions for employer authorization.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobDirectory: Send + Sync {
    async fn find(&self, job_id: Uuid) -> Result<Option<JobSummary>>;
    async fn is_company_member(&self, account_id: Uuid, company_id: Uuid) -> Result<bool>;
}

/// Assignment collaborator: which reviewer screens which job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentDirectory: Send + Sync {
    async fn is_assigned_reviewer(&self, account_id: Uuid, job_id: Uuid) -> Result<bool>;
}

#[derive(Clone)]
pub struct PgProfileDirectory {
    pool: PgPool,
}

impl PgProfileDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileDirectory for PgProfileDirectory {
    async fn completed_profile(&self, account_id: Uuid) -> Result<Option<CandidateProfile>> {
        // Completeness is part of the query: a profile without contact
        // details or an uploaded resume does not count.
        let profile = sqlx::query_as::<_, CandidateProfile>(
            "SELECT id, account_id, full_name, email, resume_url \
             FROM profiles \
             WHERE account_id = $1 \
               AND full_name <> '' \
               AND email <> '' \
               AND resume_url IS NOT NULL",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }
}

#[derive(Clone)]
pub struct PgJobDirectory {
    pool: PgPool,
}

impl PgJobDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobDirectory for PgJobDirectory {
    async fn find(&self, job_id: Uuid) -> Result<Option<JobSummary>> {
        let job = sqlx::query_as::<_, JobSummary>(
            "SELECT id, company_id, title, contact_account_id, contact_email, published_at \
             FROM jobs WHERE id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    async fn is_company_member(&self, account_id: Uuid, company_id: Uuid) -> Result<bool> {
        let (member,): (bool,) = sqlx::query_as(
            "SELECT EXISTS( \
                 SELECT 1 FROM company_members \
                 WHERE account_id = $1 AND company_id = $2 \
             )",
        )
        .bind(account_id)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(member)
    }
}

#[derive(Clone)]
pub struct PgAssignmentDirectory {
    pool: PgPool,
}

impl PgAssignmentDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentDirectory for PgAssignmentDirectory {
    async fn is_assigned_reviewer(&self, account_id: Uuid, job_id: Uuid) -> Result<bool> {
        let (assigned,): (bool,) = sqlx::query_as(
            "SELECT EXISTS( \
                 SELECT 1 FROM job_assignments \
                 WHERE reviewer_account_id = $1 AND job_id = $2 \
             )",
        )
        .bind(account_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(assigned)
    }
}
