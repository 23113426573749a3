use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::application::{
    Application, ApplicationStatus, HistoryEntry, NewApplication,
};
use crate::store::{ApplicationStore, StoreError};

/// In-memory store used by the test suite and local runs without
/// Postgres. One mutex guards both the record map and the uniqueness
/// index, so create and transition are atomic exactly like their SQL
/// counterparts; no await happens while the lock is held.
#[derive(Default)]
pub struct MemoryApplicationStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<Uuid, Application>,
    pairs: HashSet<(Uuid, Uuid)>,
}

impl MemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStore for MemoryApplicationStore {
    async fn create(&self, new: NewApplication) -> Result<Application, StoreError> {
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        let slot = (new.job_id, new.candidate_id);
        if !inner.pairs.insert(slot) {
            return Err(StoreError::Duplicate);
        }
        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            job_id: new.job_id,
            candidate_id: new.candidate_id,
            candidate_account_id: new.candidate_account_id,
            status: ApplicationStatus::Applied,
            history: vec![HistoryEntry {
                status: ApplicationStatus::Applied,
                actor_id: new.candidate_id,
                note: Some(new.note.unwrap_or_else(|| "submitted".to_string())),
                timestamp: now,
            }],
            resume_url: new.resume_url,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        inner.by_id.insert(application.id, application.clone());
        Ok(application)
    }

    async fn get(&self, id: Uuid) -> Result<Application, StoreError> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        inner.by_id.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list_for_job(
        &self,
        job_id: Uuid,
        statuses: Option<&[ApplicationStatus]>,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Application>, i64), StoreError> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let mut matching: Vec<Application> = inner
            .by_id
            .values()
            .filter(|app| app.job_id == job_id)
            .filter(|app| statuses.map_or(true, |set| set.contains(&app.status)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let offset = ((page.max(1) - 1) * per_page) as usize;
        let items = matching
            .into_iter()
            .skip(offset)
            .take(per_page.max(0) as usize)
            .collect();
        Ok((items, total))
    }

    async fn list_for_candidate(&self, account_id: Uuid) -> Result<Vec<Application>, StoreError> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let mut matching: Vec<Application> = inner
            .by_id
            .values()
            .filter(|app| app.candidate_account_id == account_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn append_transition(
        &self,
        id: Uuid,
        expected_version: i32,
        new_status: ApplicationStatus,
        actor_id: Uuid,
        note: Option<String>,
    ) -> Result<Application, StoreError> {
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        let application = inner.by_id.get_mut(&id).ok_or(StoreError::NotFound)?;
        if application.version != expected_version {
            return Err(StoreError::Stale);
        }
        let now = Utc::now();
        application.status = new_status;
        application.history.push(HistoryEntry {
            status: new_status,
            actor_id,
            note,
            timestamp: now,
        });
        application.version += 1;
        application.updated_at = now;
        Ok(application.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_application(job_id: Uuid, candidate_id: Uuid) -> NewApplication {
        NewApplication {
            job_id,
            candidate_id,
            candidate_account_id: Uuid::new_v4(),
            resume_url: Some("resumes/alice.pdf".to_string()),
            note: None,
        }
    }

    #[tokio::test]
    async fn create_sets_initial_status_and_single_history_entry() {
        let store = MemoryApplicationStore::new();
        let candidate = Uuid::new_v4();
        let app = store
            .create(new_application(Uuid::new_v4(), candidate))
            .await
            .unwrap();

        assert_eq!(app.status, ApplicationStatus::Applied);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].status, ApplicationStatus::Applied);
        assert_eq!(app.history[0].actor_id, candidate);
        assert_eq!(app.history[0].note.as_deref(), Some("submitted"));
        assert_eq!(app.version, 1);
    }

    #[tokio::test]
    async fn second_create_for_same_pair_is_rejected() {
        let store = MemoryApplicationStore::new();
        let job = Uuid::new_v4();
        let candidate = Uuid::new_v4();

        let original = store.create(new_application(job, candidate)).await.unwrap();
        let second = store.create(new_application(job, candidate)).await;
        assert!(matches!(second, Err(StoreError::Duplicate)));

        // Loser must not have touched the winner's record.
        let stored = store.get(original.id).await.unwrap();
        assert_eq!(stored.status, ApplicationStatus::Applied);
        assert_eq!(stored.history.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_creates_produce_exactly_one_record() {
        let store = Arc::new(MemoryApplicationStore::new());
        let job = Uuid::new_v4();
        let candidate = Uuid::new_v4();

        let a = tokio::spawn({
            let store = store.clone();
            let new = new_application(job, candidate);
            async move { store.create(new).await }
        });
        let b = tokio::spawn({
            let store = store.clone();
            let new = new_application(job, candidate);
            async move { store.create(new).await }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        let loser = [a, b].into_iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(loser, Err(StoreError::Duplicate)));
    }

    #[tokio::test]
    async fn append_transition_grows_history_by_one() {
        let store = MemoryApplicationStore::new();
        let app = store
            .create(new_application(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();
        let reviewer = Uuid::new_v4();

        let updated = store
            .append_transition(
                app.id,
                app.version,
                ApplicationStatus::ForwardedToCompany,
                reviewer,
                Some("solid background".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, ApplicationStatus::ForwardedToCompany);
        assert_eq!(updated.history.len(), 2);
        assert_eq!(updated.version, 2);
        // Past entries are untouched.
        assert_eq!(updated.history[0].status, ApplicationStatus::Applied);
        assert_eq!(updated.history[1].actor_id, reviewer);
    }

    #[tokio::test]
    async fn stale_version_loses_the_race() {
        let store = MemoryApplicationStore::new();
        let app = store
            .create(new_application(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();
        let reviewer = Uuid::new_v4();

        store
            .append_transition(
                app.id,
                app.version,
                ApplicationStatus::PendingHr,
                reviewer,
                None,
            )
            .await
            .unwrap();

        // Second writer still holds version 1.
        let stale = store
            .append_transition(
                app.id,
                app.version,
                ApplicationStatus::HrRejected,
                reviewer,
                None,
            )
            .await;
        assert!(matches!(stale, Err(StoreError::Stale)));

        let stored = store.get(app.id).await.unwrap();
        assert_eq!(stored.status, ApplicationStatus::PendingHr);
        assert_eq!(stored.history.len(), 2);
    }

    #[tokio::test]
    async fn list_for_job_filters_and_paginates() {
        let store = MemoryApplicationStore::new();
        let job = Uuid::new_v4();
        for _ in 0..3 {
            store
                .create(new_application(job, Uuid::new_v4()))
                .await
                .unwrap();
        }
        store
            .create(new_application(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();

        let (all, total) = store.list_for_job(job, None, 1, 10).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(total, 3);

        let (page, total) = store.list_for_job(job, None, 2, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(total, 3);

        let (forwarded, total) = store
            .list_for_job(job, Some(&[ApplicationStatus::ForwardedToCompany]), 1, 10)
            .await
            .unwrap();
        assert!(forwarded.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn missing_application_is_not_found() {
        let store = MemoryApplicationStore::new();
        assert!(matches!(
            store.get(Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store
                .append_transition(
                    Uuid::new_v4(),
                    1,
                    ApplicationStatus::PendingHr,
                    Uuid::new_v4(),
                    None
                )
                .await,
            Err(StoreError::NotFound)
        ));
    }
}
