use crate::models::application::ApplicationStatus::{self, *};

/// Label the candidate sees for an internal status. Candidates never see
/// the staged screening vocabulary; intermediate stages collapse into a
/// small public set.
pub fn candidate_label(status: ApplicationStatus) -> &'static str {
    match status {
        Applied => "Applied",
        PendingHr => "Under Review",
        HrRejected | CompanyRejected => "Not Selected",
        ForwardedToCompany | CompanyViewed => "Shortlisted",
        CompanyAccepted => "Interview",
    }
}

/// Label the employer sees, or `None` while the application has not been
/// forwarded by the screening team.
pub fn employer_label(status: ApplicationStatus) -> Option<&'static str> {
    match status {
        Applied | PendingHr | HrRejected => None,
        ForwardedToCompany | CompanyViewed => Some("Action Required"),
        CompanyAccepted => Some("Shortlisted"),
        CompanyRejected => Some("Rejected"),
    }
}

/// Whether a status appears in employer-facing listings when no explicit
/// filter was given. Privileged callers may override with a filter; the
/// default stays restricted to what screening has forwarded.
pub fn employer_visible(status: ApplicationStatus) -> bool {
    employer_label(status).is_some()
}

/// The statuses a default employer listing query includes.
pub fn employer_default_statuses() -> Vec<ApplicationStatus> {
    [
        Applied,
        PendingHr,
        HrRejected,
        ForwardedToCompany,
        CompanyViewed,
        CompanyAccepted,
        CompanyRejected,
    ]
    .into_iter()
    .filter(|status| employer_visible(*status))
    .collect()
}
