use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::{ActorRole, Application, ApplicationStatus};
use crate::services::authorization::AuthorizationGuard;
use crate::services::directory::ProfileDirectory;
use crate::services::notification_service::NotificationDispatcher;
use crate::services::transition::TransitionOutcome;
use crate::services::visibility;
use crate::store::ApplicationStore;

/// The lifecycle engine. One path in: guard checks standing, the
/// transition table checks legality, the store writes atomically, and
/// the dispatcher fires afterwards. Handlers call nothing else.
#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn ApplicationStore>,
    guard: AuthorizationGuard,
    profiles: Arc<dyn ProfileDirectory>,
    dispatcher: NotificationDispatcher,
}

impl ApplicationService {
    pub fn new(
        store: Arc<dyn ApplicationStore>,
        guard: AuthorizationGuard,
        profiles: Arc<dyn ProfileDirectory>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            store,
            guard,
            profiles,
            dispatcher,
        }
    }

    /// Candidate submits an application. The resume pointer is copied
    /// from the profile here, so later profile edits never change what
    /// the employer reviews.
    pub async fn apply(
        &self,
        account_id: Uuid,
        job_id: Uuid,
        note: Option<String>,
    ) -> Result<Application> {
        let (profile, job) = self.guard.can_create(account_id, job_id).await?;
        let application = self
            .store
            .create(crate::models::application::NewApplication {
                job_id,
                candidate_id: profile.id,
                candidate_account_id: account_id,
                resume_url: profile.resume_url.clone(),
                note,
            })
            .await?;
        self.dispatcher.on_created(&application, &job, &profile);
        Ok(application)
    }

    /// Reviewer or employer moves an application. The loser of a
    /// concurrent race gets a retryable conflict, never a silent
    /// overwrite; a request for the current status is a no-op success.
    pub async fn transition(
        &self,
        account_id: Uuid,
        role: ActorRole,
        application_id: Uuid,
        requested: ApplicationStatus,
        note: Option<String>,
    ) -> Result<Application> {
        let application = self.store.get(application_id).await?;
        let (job, outcome) = self
            .guard
            .can_transition(account_id, role, &application, requested)
            .await?;
        if outcome == TransitionOutcome::NoOp {
            return Ok(application);
        }

        let previous = application.status;
        let updated = self
            .store
            .append_transition(
                application.id,
                application.version,
                requested,
                account_id,
                note,
            )
            .await?;

        // The transition is already durable; a failed profile lookup
        // only costs the email address, never the response.
        let candidate = match self
            .profiles
            .completed_profile(updated.candidate_account_id)
            .await
        {
            Ok(profile) => profile,
            Err(err) => {
                warn!(
                    application_id = %updated.id,
                    error = %err,
                    "could not resolve candidate profile for notification"
                );
                None
            }
        };
        self.dispatcher
            .on_transition(&updated, previous, &job, candidate.as_ref());
        Ok(updated)
    }

    /// Read one application as a given actor. Employers cannot observe
    /// records screening has not forwarded; those read as absent.
    pub async fn get_for_actor(
        &self,
        account_id: Uuid,
        role: ActorRole,
        application_id: Uuid,
    ) -> Result<Application> {
        let application = self.store.get(application_id).await?;
        self.guard.can_read(account_id, role, &application).await?;
        if role == ActorRole::Employer && !visibility::employer_visible(application.status) {
            return Err(Error::NotFound("Application not found".to_string()));
        }
        Ok(application)
    }

    /// Applications for a job. With no explicit filter the employer
    /// default excludes everything screening has not forwarded. An
    /// explicit filter from a reviewer may reach into any status; an
    /// employer filter is clamped to employer-visible statuses.
    pub async fn list_for_job(
        &self,
        account_id: Uuid,
        role: ActorRole,
        job_id: Uuid,
        status_filter: Option<ApplicationStatus>,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Application>, i64)> {
        self.guard.can_list_job(account_id, role, job_id).await?;

        let statuses: Option<Vec<ApplicationStatus>> = match (role, status_filter) {
            (ActorRole::Employer, Some(status)) => {
                if visibility::employer_visible(status) {
                    Some(vec![status])
                } else {
                    // Explicitly asking for a hidden stage yields an
                    // empty page, not a peek behind the screen.
                    return Ok((Vec::new(), 0));
                }
            }
            (ActorRole::Employer, None) => Some(visibility::employer_default_statuses()),
            (_, Some(status)) => Some(vec![status]),
            (_, None) => None,
        };

        let (items, total) = self
            .store
            .list_for_job(job_id, statuses.as_deref(), page, per_page)
            .await?;
        Ok((items, total))
    }

    /// All applications belonging to the calling candidate account.
    pub async fn list_for_candidate(&self, account_id: Uuid) -> Result<Vec<Application>> {
        Ok(self.store.list_for_candidate(account_id).await?)
    }
}
