pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::services::application_service::ApplicationService;
use crate::services::authorization::AuthorizationGuard;
use crate::services::directory::{
    AssignmentDirectory, JobDirectory, PgAssignmentDirectory, PgJobDirectory,
    PgProfileDirectory, ProfileDirectory,
};
use crate::services::notification_service::{
    MailSender, NotificationDispatcher, NotificationSink, PgNotificationSink, WebhookMailer,
};
use crate::store::postgres::PgApplicationStore;
use crate::store::ApplicationStore;

#[derive(Clone)]
pub struct AppState {
    pub applications: ApplicationService,
}

impl AppState {
    /// Production wiring: Postgres store, Postgres collaborators, mail
    /// relay webhook.
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let store: Arc<dyn ApplicationStore> = Arc::new(PgApplicationStore::new(pool.clone()));
        let profiles: Arc<dyn ProfileDirectory> = Arc::new(PgProfileDirectory::new(pool.clone()));
        let jobs: Arc<dyn JobDirectory> = Arc::new(PgJobDirectory::new(pool.clone()));
        let assignments: Arc<dyn AssignmentDirectory> =
            Arc::new(PgAssignmentDirectory::new(pool.clone()));
        let sink: Arc<dyn NotificationSink> = Arc::new(PgNotificationSink::new(pool));
        let mailer: Arc<dyn MailSender> =
            Arc::new(WebhookMailer::new(config.mail_webhook_url.clone()));

        Self::with_components(
            store,
            profiles,
            jobs,
            assignments,
            sink,
            mailer,
            Duration::from_secs(config.notify_timeout_secs),
        )
    }

    /// Explicit wiring for tests and alternative deployments: any store
    /// and collaborators that satisfy the traits.
    #[allow(clippy::too_many_arguments)]
    pub fn with_components(
        store: Arc<dyn ApplicationStore>,
        profiles: Arc<dyn ProfileDirectory>,
        jobs: Arc<dyn JobDirectory>,
        assignments: Arc<dyn AssignmentDirectory>,
        sink: Arc<dyn NotificationSink>,
        mailer: Arc<dyn MailSender>,
        notify_timeout: Duration,
    ) -> Self {
        let guard = AuthorizationGuard::new(profiles.clone(), jobs, assignments);
        let dispatcher = NotificationDispatcher::new(sink, mailer, notify_timeout);
        let applications = ApplicationService::new(store, guard, profiles, dispatcher);
        Self { applications }
    }
}
