use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::JobSummary;
use crate::models::notification::NotificationKind;
use crate::models::profile::CandidateProfile;
use crate::services::visibility;

/// Persistence of in-app notification records, owned externally.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn create(
        &self,
        target_account_id: Uuid,
        kind: NotificationKind,
        data: JsonValue,
    ) -> anyhow::Result<()>;
}

/// External mail delivery, best-effort.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgNotificationSink {
    pool: PgPool,
}

impl PgNotificationSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for PgNotificationSink {
    async fn create(
        &self,
        target_account_id: Uuid,
        kind: NotificationKind,
        data: JsonValue,
    ) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO notifications (account_id, kind, data) VALUES ($1, $2, $3)")
            .bind(target_account_id)
            .bind(kind.as_str())
            .bind(data)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Mail relay client: posts the message to the delivery webhook, which
/// owns templating and actual SMTP.
#[derive(Clone)]
pub struct WebhookMailer {
    client: Client,
    target_url: String,
}

impl WebhookMailer {
    pub fn new(target_url: String) -> Self {
        Self {
            client: Client::new(),
            target_url,
        }
    }
}

#[async_trait]
impl MailSender for WebhookMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(&self.target_url)
            .json(&json!({ "to": to, "subject": subject, "body": body }))
            .send()
            .await?;
        resp.error_for_status()?;
        Ok(())
    }
}

/// Fires the in-app record and the email for a lifecycle event. Runs on a
/// spawned task after the store write; every side effect is bounded by a
/// timeout and any failure is logged and swallowed, so delivery trouble
/// can never fail or delay a transition.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    mailer: Arc<dyn MailSender>,
    timeout: Duration,
}

struct Delivery {
    target_account_id: Uuid,
    email: Option<String>,
    kind: NotificationKind,
    data: JsonValue,
    subject: String,
    body: String,
}

impl NotificationDispatcher {
    pub fn new(
        sink: Arc<dyn NotificationSink>,
        mailer: Arc<dyn MailSender>,
        timeout: Duration,
    ) -> Self {
        Self {
            sink,
            mailer,
            timeout,
        }
    }

    /// A new application landed: tell the job's company contact.
    pub fn on_created(
        &self,
        application: &Application,
        job: &JobSummary,
        candidate: &CandidateProfile,
    ) {
        let delivery = Delivery {
            target_account_id: job.contact_account_id,
            email: Some(job.contact_email.clone()),
            kind: NotificationKind::ApplicationReceived,
            data: json!({
                "application_id": application.id,
                "job_id": job.id,
                "job_title": job.title,
            }),
            subject: format!("New application for {}", job.title),
            body: format!(
                "{} applied for {}. The application is queued for screening.",
                candidate.full_name, job.title
            ),
        };
        self.spawn(delivery);
    }

    /// A transition landed: route to whichever side of the table the new
    /// status concerns. `company_viewed` is bookkeeping and stays silent.
    pub fn on_transition(
        &self,
        application: &Application,
        previous: ApplicationStatus,
        job: &JobSummary,
        candidate: Option<&CandidateProfile>,
    ) {
        let delivery = match application.status {
            ApplicationStatus::ForwardedToCompany => Delivery {
                target_account_id: job.contact_account_id,
                email: Some(job.contact_email.clone()),
                kind: NotificationKind::ApplicationForwarded,
                data: json!({
                    "application_id": application.id,
                    "job_id": job.id,
                    "job_title": job.title,
                    "status": visibility::employer_label(application.status),
                }),
                subject: format!("Application ready for review: {}", job.title),
                body: format!(
                    "A screened application for {} is waiting for your decision.",
                    job.title
                ),
            },
            ApplicationStatus::HrRejected
            | ApplicationStatus::CompanyAccepted
            | ApplicationStatus::CompanyRejected => Delivery {
                target_account_id: application.candidate_account_id,
                email: candidate.map(|profile| profile.email.clone()),
                kind: NotificationKind::ApplicationDecision,
                data: json!({
                    "application_id": application.id,
                    "job_id": job.id,
                    "job_title": job.title,
                    "status": visibility::candidate_label(application.status),
                }),
                subject: format!("Update on your application for {}", job.title),
                body: format!(
                    "Your application for {} is now: {}.",
                    job.title,
                    visibility::candidate_label(application.status)
                ),
            },
            _ => {
                tracing::debug!(
                    application_id = %application.id,
                    from = %previous,
                    to = %application.status,
                    "transition carries no notification"
                );
                return;
            }
        };
        self.spawn(delivery);
    }

    fn spawn(&self, delivery: Delivery) {
        let sink = self.sink.clone();
        let mailer = self.mailer.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            let record = sink.create(
                delivery.target_account_id,
                delivery.kind,
                delivery.data.clone(),
            );
            match tokio::time::timeout(timeout, record).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    target_account_id = %delivery.target_account_id,
                    kind = delivery.kind.as_str(),
                    error = %err,
                    "failed to persist notification"
                ),
                Err(_) => warn!(
                    target_account_id = %delivery.target_account_id,
                    kind = delivery.kind.as_str(),
                    "notification persistence timed out"
                ),
            }

            let Some(email) = delivery.email else { return };
            let send = mailer.send(&email, &delivery.subject, &delivery.body);
            match tokio::time::timeout(timeout, send).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    kind = delivery.kind.as_str(),
                    error = %err,
                    "failed to send notification email"
                ),
                Err(_) => warn!(
                    kind = delivery.kind.as_str(),
                    "notification email timed out"
                ),
            }
        });
    }
}
