use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::{ActorRole, Application, ApplicationStatus};
use crate::models::job::JobSummary;
use crate::models::profile::CandidateProfile;
use crate::services::directory::{AssignmentDirectory, JobDirectory, ProfileDirectory};
use crate::services::transition::{self, TransitionOutcome};

/// Single home for actor-standing decisions. Handlers never check
/// ownership, company membership, or reviewer assignment themselves;
/// they hand the actor and the record to the guard and act on the
/// answer. Guard failures are `Forbidden`, never `InvalidTransition`.
#[derive(Clone)]
pub struct AuthorizationGuard {
    profiles: Arc<dyn ProfileDirectory>,
    jobs: Arc<dyn JobDirectory>,
    assignments: Arc<dyn AssignmentDirectory>,
}

impl AuthorizationGuard {
    pub fn new(
        profiles: Arc<dyn ProfileDirectory>,
        jobs: Arc<dyn JobDirectory>,
        assignments: Arc<dyn AssignmentDirectory>,
    ) -> Self {
        Self {
            profiles,
            jobs,
            assignments,
        }
    }

    /// May this account submit an application for this job? Returns the
    /// resolved profile and job so the caller does not re-fetch either.
    pub async fn can_create(
        &self,
        account_id: Uuid,
        job_id: Uuid,
    ) -> Result<(CandidateProfile, JobSummary)> {
        let job = self
            .jobs
            .find(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        let profile = self
            .profiles
            .completed_profile(account_id)
            .await?
            .ok_or(Error::ProfileIncomplete)?;
        Ok((profile, job))
    }

    /// May this actor read this application at all? Visibility of the
    /// internal status is a separate concern handled by the projection.
    pub async fn can_read(
        &self,
        account_id: Uuid,
        role: ActorRole,
        application: &Application,
    ) -> Result<JobSummary> {
        let job = self.job_for(application).await?;
        let allowed = match role {
            ActorRole::Candidate => application.candidate_account_id == account_id,
            ActorRole::Employer => {
                self.jobs
                    .is_company_member(account_id, job.company_id)
                    .await?
            }
            ActorRole::Reviewer => {
                self.assignments
                    .is_assigned_reviewer(account_id, application.job_id)
                    .await?
            }
        };
        if allowed {
            Ok(job)
        } else {
            Err(Error::Forbidden(
                "No access to this application".to_string(),
            ))
        }
    }

    /// May this actor move this application to `requested`? Standing on
    /// the specific job is checked first; only then is the move itself
    /// checked against the transition table, so an unassigned reviewer
    /// gets `Forbidden` rather than a transition error.
    pub async fn can_transition(
        &self,
        account_id: Uuid,
        role: ActorRole,
        application: &Application,
        requested: ApplicationStatus,
    ) -> Result<(JobSummary, TransitionOutcome)> {
        let job = self.job_for(application).await?;
        let standing = match role {
            // Owners may hit the endpoint, the table then rejects them.
            ActorRole::Candidate => application.candidate_account_id == account_id,
            ActorRole::Employer => {
                self.jobs
                    .is_company_member(account_id, job.company_id)
                    .await?
            }
            ActorRole::Reviewer => {
                self.assignments
                    .is_assigned_reviewer(account_id, application.job_id)
                    .await?
            }
        };
        if !standing {
            return Err(Error::Forbidden(
                "Not authorized to act on this application".to_string(),
            ));
        }
        let outcome = transition::validate(application.status, requested, role)?;
        Ok((job, outcome))
    }

    /// May this actor list applications for this job?
    pub async fn can_list_job(
        &self,
        account_id: Uuid,
        role: ActorRole,
        job_id: Uuid,
    ) -> Result<JobSummary> {
        let job = self
            .jobs
            .find(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        let allowed = match role {
            ActorRole::Candidate => false,
            ActorRole::Employer => {
                self.jobs
                    .is_company_member(account_id, job.company_id)
                    .await?
            }
            ActorRole::Reviewer => {
                self.assignments
                    .is_assigned_reviewer(account_id, job_id)
                    .await?
            }
        };
        if allowed {
            Ok(job)
        } else {
            Err(Error::Forbidden(
                "No access to applications for this job".to_string(),
            ))
        }
    }

    async fn job_for(&self, application: &Application) -> Result<JobSummary> {
        self.jobs
            .find(application.job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }
}
