use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Completed candidate profile as resolved by the profile collaborator.
/// The directory only ever returns profiles that pass its completeness
/// check, so holding one of these is proof the candidate may apply.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub resume_url: Option<String>,
}
