use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        self, ApplicationView, ApplyPayload, CandidateApplicationView,
        CandidateApplicationsResponse, JobApplicationsQuery, JobApplicationsResponse,
        TransitionPayload,
    },
    error::{Error, Result},
    middleware::auth::Claims,
    models::application::{ActorRole, ApplicationStatus},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted"),
        (status = 409, description = "Already applied to this job"),
        (status = 422, description = "Candidate profile incomplete")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let account_id = claims.account_id()?;
    if claims.actor_role()? != ActorRole::Candidate {
        return Err(Error::Forbidden("Only candidates may apply".to_string()));
    }
    let application = state
        .applications
        .apply(account_id, payload.job_id, payload.note)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CandidateApplicationView::from(&application)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Role-scoped application view"),
        (status = 403, description = "No access to this application"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let account_id = claims.account_id()?;
    let role = claims.actor_role()?;
    let application = state
        .applications
        .get_for_actor(account_id, role, id)
        .await?;
    let view = application_dto::view_for(&application, role)
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = TransitionPayload,
    responses(
        (status = 200, description = "Application moved"),
        (status = 403, description = "Actor lacks standing on this job"),
        (status = 409, description = "Concurrent update, retry"),
        (status = 422, description = "Move not in the transition table")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let account_id = claims.account_id()?;
    let role = claims.actor_role()?;
    let application = state
        .applications
        .transition(account_id, role, id, payload.status, payload.note)
        .await?;
    let view = application_dto::view_for(&application, role)
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{job_id}/applications",
    params(
        ("job_id" = Uuid, Path, description = "Job ID"),
        ("status" = Option<String>, Query, description = "Explicit status filter"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Role-projected applications for the job"),
        (status = 403, description = "No access to this job's applications")
    )
)]
#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<JobApplicationsQuery>,
) -> Result<impl IntoResponse> {
    let account_id = claims.account_id()?;
    let role = claims.actor_role()?;

    let status_filter = query
        .status
        .as_deref()
        .map(|raw| {
            raw.parse::<ApplicationStatus>()
                .map_err(Error::BadRequest)
        })
        .transpose()?;
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let (items, total) = state
        .applications
        .list_for_job(account_id, role, job_id, status_filter, page, per_page)
        .await?;
    let items: Vec<ApplicationView> = items
        .iter()
        .filter_map(|application| application_dto::view_for(application, role))
        .collect();
    let total_pages = (total + per_page - 1) / per_page;

    Ok(Json(JobApplicationsResponse {
        items,
        total,
        page,
        per_page,
        total_pages,
    }))
}

#[utoipa::path(
    get,
    path = "/api/my/applications",
    responses(
        (status = 200, description = "Candidate's own applications, public labels only")
    )
)]
#[axum::debug_handler]
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let account_id = claims.account_id()?;
    let applications = state.applications.list_for_candidate(account_id).await?;
    let items = applications.iter().map(CandidateApplicationView::from).collect();
    Ok(Json(CandidateApplicationsResponse { items }))
}
