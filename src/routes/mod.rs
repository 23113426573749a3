pub mod application_routes;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{middleware, AppState};

/// The full route tree. Lifecycle routes sit behind bearer auth; all
/// authorization beyond authentication happens in the guard.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/applications", post(application_routes::apply))
        .route(
            "/api/applications/:id",
            get(application_routes::get_application),
        )
        .route(
            "/api/applications/:id/status",
            post(application_routes::update_status),
        )
        .route(
            "/api/jobs/:job_id/applications",
            get(application_routes::list_job_applications),
        )
        .route(
            "/api/my/applications",
            get(application_routes::list_my_applications),
        )
        .layer(axum::middleware::from_fn(
            middleware::auth::require_bearer_auth,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .with_state(state)
}
