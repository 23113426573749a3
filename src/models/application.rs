use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Internal review stage of an application. Status never leaves this
/// closed set, and only the transition table in `services::transition`
/// moves a record between variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    PendingHr,
    HrRejected,
    ForwardedToCompany,
    CompanyViewed,
    CompanyAccepted,
    CompanyRejected,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::PendingHr => "pending_hr",
            ApplicationStatus::HrRejected => "hr_rejected",
            ApplicationStatus::ForwardedToCompany => "forwarded_to_company",
            ApplicationStatus::CompanyViewed => "company_viewed",
            ApplicationStatus::CompanyAccepted => "company_accepted",
            ApplicationStatus::CompanyRejected => "company_rejected",
        }
    }

    /// Terminal stages accept no further transitions from any role.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::HrRejected
                | ApplicationStatus::CompanyAccepted
                | ApplicationStatus::CompanyRejected
        )
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "applied" => Ok(ApplicationStatus::Applied),
            "pending_hr" => Ok(ApplicationStatus::PendingHr),
            "hr_rejected" => Ok(ApplicationStatus::HrRejected),
            "forwarded_to_company" => Ok(ApplicationStatus::ForwardedToCompany),
            "company_viewed" => Ok(ApplicationStatus::CompanyViewed),
            "company_accepted" => Ok(ApplicationStatus::CompanyAccepted),
            "company_rejected" => Ok(ApplicationStatus::CompanyRejected),
            other => Err(format!("unknown application status: {}", other)),
        }
    }
}

/// Role an authenticated actor acts under for a given request. Derived
/// from the token claims, then checked against job ownership/assignment
/// by the authorization guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Candidate,
    Reviewer,
    Employer,
}

impl ActorRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            ActorRole::Candidate => "candidate",
            ActorRole::Reviewer => "reviewer",
            ActorRole::Employer => "employer",
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActorRole {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // "hr" is the legacy token role for the screening team.
        match raw.to_ascii_lowercase().as_str() {
            "candidate" => Ok(ActorRole::Candidate),
            "reviewer" | "hr" => Ok(ActorRole::Reviewer),
            "employer" => Ok(ActorRole::Employer),
            other => Err(format!("unknown actor role: {}", other)),
        }
    }
}

/// One entry of the append-only audit trail. Entries are never rewritten;
/// the sequence grows by exactly one per accepted transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub status: ApplicationStatus,
    pub actor_id: Uuid,
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_account_id: Uuid,
    pub status: ApplicationStatus,
    pub history: Vec<HistoryEntry>,
    /// Snapshot of the resume artifact taken at submission time. Later
    /// profile edits do not change what the employer reviewed.
    pub resume_url: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation input assembled by the lifecycle service once the guard has
/// resolved the candidate profile and the job.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_account_id: Uuid,
    pub resume_url: Option<String>,
    pub note: Option<String>,
}
