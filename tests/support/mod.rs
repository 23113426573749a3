#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use talentbridge_backend::models::job::JobSummary;
use talentbridge_backend::models::notification::NotificationKind;
use talentbridge_backend::models::profile::CandidateProfile;
use talentbridge_backend::services::directory::{
    AssignmentDirectory, JobDirectory, ProfileDirectory,
};
use talentbridge_backend::services::notification_service::{MailSender, NotificationSink};
use talentbridge_backend::store::memory::MemoryApplicationStore;
use talentbridge_backend::AppState;

#[derive(Default)]
pub struct MemoryProfiles {
    profiles: Mutex<HashMap<Uuid, CandidateProfile>>,
}

impl MemoryProfiles {
    pub fn insert(&self, profile: CandidateProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.account_id, profile);
    }
}

#[async_trait]
impl ProfileDirectory for MemoryProfiles {
    async fn completed_profile(&self, account_id: Uuid) -> anyhow::Result<Option<CandidateProfile>> {
        Ok(self.profiles.lock().unwrap().get(&account_id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryJobs {
    jobs: Mutex<HashMap<Uuid, JobSummary>>,
    members: Mutex<HashSet<(Uuid, Uuid)>>,
}

impl MemoryJobs {
    pub fn insert(&self, job: JobSummary) {
        self.jobs.lock().unwrap().insert(job.id, job);
    }

    pub fn add_member(&self, account_id: Uuid, company_id: Uuid) {
        self.members.lock().unwrap().insert((account_id, company_id));
    }
}

#[async_trait]
impl JobDirectory for MemoryJobs {
    async fn find(&self, job_id: Uuid) -> anyhow::Result<Option<JobSummary>> {
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }

    async fn is_company_member(&self, account_id: Uuid, company_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .contains(&(account_id, company_id)))
    }
}

#[derive(Default)]
pub struct MemoryAssignments {
    assignments: Mutex<HashSet<(Uuid, Uuid)>>,
}

impl MemoryAssignments {
    pub fn assign(&self, reviewer_account_id: Uuid, job_id: Uuid) {
        self.assignments
            .lock()
            .unwrap()
            .insert((reviewer_account_id, job_id));
    }
}

#[async_trait]
impl AssignmentDirectory for MemoryAssignments {
    async fn is_assigned_reviewer(&self, account_id: Uuid, job_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .assignments
            .lock()
            .unwrap()
            .contains(&(account_id, job_id)))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<(Uuid, NotificationKind, JsonValue)>>,
}

impl RecordingSink {
    pub fn for_account(&self, account_id: Uuid) -> Vec<(NotificationKind, JsonValue)> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(target, _, _)| *target == account_id)
            .map(|(_, kind, data)| (*kind, data.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn create(
        &self,
        target_account_id: Uuid,
        kind: NotificationKind,
        data: JsonValue,
    ) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap()
            .push((target_account_id, kind, data));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub messages: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    pub fn to_address(&self, address: &str) -> Vec<(String, String)> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _, _)| to == address)
            .map(|(_, subject, body)| (subject.clone(), body.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        self.messages
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Fully wired in-memory deployment of the lifecycle engine plus handles
/// to every fake, so tests can seed collaborators and observe side
/// effects.
pub struct TestWorld {
    pub state: AppState,
    pub store: Arc<MemoryApplicationStore>,
    pub profiles: Arc<MemoryProfiles>,
    pub jobs: Arc<MemoryJobs>,
    pub assignments: Arc<MemoryAssignments>,
    pub sink: Arc<RecordingSink>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestWorld {
    pub fn new() -> Self {
        let store = Arc::new(MemoryApplicationStore::new());
        let profiles = Arc::new(MemoryProfiles::default());
        let jobs = Arc::new(MemoryJobs::default());
        let assignments = Arc::new(MemoryAssignments::default());
        let sink = Arc::new(RecordingSink::default());
        let mailer = Arc::new(RecordingMailer::default());

        let state = AppState::with_components(
            store.clone(),
            profiles.clone(),
            jobs.clone(),
            assignments.clone(),
            sink.clone(),
            mailer.clone(),
            Duration::from_secs(1),
        );

        Self {
            state,
            store,
            profiles,
            jobs,
            assignments,
            sink,
            mailer,
        }
    }

    pub fn seed_candidate(&self, name: &str, email: &str) -> (Uuid, CandidateProfile) {
        let account_id = Uuid::new_v4();
        let profile = CandidateProfile {
            id: Uuid::new_v4(),
            account_id,
            full_name: name.to_string(),
            email: email.to_string(),
            resume_url: Some(format!("resumes/{}.pdf", name.to_lowercase())),
        };
        self.profiles.insert(profile.clone());
        (account_id, profile)
    }

    pub fn seed_job(&self, title: &str, contact_email: &str) -> JobSummary {
        let job = JobSummary {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: title.to_string(),
            contact_account_id: Uuid::new_v4(),
            contact_email: contact_email.to_string(),
            published_at: Some(Utc::now()),
        };
        self.jobs.insert(job.clone());
        job
    }
}

/// The dispatcher runs on spawned tasks; poll until the expected side
/// effects landed instead of sleeping a fixed amount.
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within one second");
}
