use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{
    ActorRole, Application, ApplicationStatus, HistoryEntry,
};
use crate::services::visibility;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyPayload {
    pub job_id: Uuid,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// Requested move. `status` deserializes through the closed enum, so an
/// arbitrary string is rejected at the boundary before any lookup runs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransitionPayload {
    pub status: ApplicationStatus,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobApplicationsQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// What the candidate sees of their own application. Internal staging
/// never appears here; `status` is the public label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateApplicationView {
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Application> for CandidateApplicationView {
    fn from(application: &Application) -> Self {
        Self {
            id: application.id,
            job_id: application.job_id,
            status: visibility::candidate_label(application.status).to_string(),
            submitted_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

/// Employer projection. Only constructible for statuses screening has
/// forwarded; everything earlier reads as absent to the employer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerApplicationView {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub status: String,
    pub resume_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployerApplicationView {
    pub fn project(application: &Application) -> Option<Self> {
        let label = visibility::employer_label(application.status)?;
        Some(Self {
            id: application.id,
            job_id: application.job_id,
            candidate_id: application.candidate_id,
            status: label.to_string(),
            resume_url: application.resume_url.clone(),
            submitted_at: application.created_at,
            updated_at: application.updated_at,
        })
    }
}

/// Reviewer projection: the screening team works on internal statuses
/// and sees the full audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerApplicationView {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_account_id: Uuid,
    pub status: ApplicationStatus,
    pub history: Vec<HistoryEntry>,
    pub resume_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Application> for ReviewerApplicationView {
    fn from(application: &Application) -> Self {
        Self {
            id: application.id,
            job_id: application.job_id,
            candidate_id: application.candidate_id,
            candidate_account_id: application.candidate_account_id,
            status: application.status,
            history: application.history.clone(),
            resume_url: application.resume_url.clone(),
            submitted_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

/// Role-scoped view of one application, produced by the visibility
/// projection. `None` means this actor cannot observe the record in its
/// current stage.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApplicationView {
    Candidate(CandidateApplicationView),
    Employer(EmployerApplicationView),
    Reviewer(ReviewerApplicationView),
}

pub fn view_for(application: &Application, role: ActorRole) -> Option<ApplicationView> {
    match role {
        ActorRole::Candidate => Some(ApplicationView::Candidate(application.into())),
        ActorRole::Employer => {
            EmployerApplicationView::project(application).map(ApplicationView::Employer)
        }
        ActorRole::Reviewer => Some(ApplicationView::Reviewer(application.into())),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobApplicationsResponse {
    pub items: Vec<ApplicationView>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateApplicationsResponse {
    pub items: Vec<CandidateApplicationView>,
}
