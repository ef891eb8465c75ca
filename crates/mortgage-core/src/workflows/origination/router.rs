use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ApplicationId, ApplicationStatus, CreditCheck, MortgageApplication};
use super::intake::ApplicationRequest;
use super::repository::{ApplicationRepository, EventSink, RepositoryError};
use super::service::{ApplicationServiceError, MortgageApplicationService};

/// Router builder exposing the origination endpoints.
pub fn application_router<R, E>(service: Arc<MortgageApplicationService<R, E>>) -> Router
where
    R: ApplicationRepository + 'static,
    E: EventSink + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(create_handler::<R, E>))
        .route(
            "/api/v1/applications/:application_id",
            get(show_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            patch(status_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id/evaluate",
            get(evaluate_handler::<R, E>),
        )
        .route(
            "/api/v1/applications/:application_id/process-decision",
            post(decision_handler::<R, E>),
        )
        .with_state(service)
}

/// Body for the manual status endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for reads: the application plus its newest credit snapshot.
#[derive(Debug, Serialize)]
struct ApplicationDetailView {
    #[serde(flatten)]
    application: MortgageApplication,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_credit_check: Option<CreditCheck>,
}

pub(crate) async fn create_handler<R, E>(
    State(service): State<Arc<MortgageApplicationService<R, E>>>,
    axum::Json(request): axum::Json<ApplicationRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EventSink + 'static,
{
    match service.create_application(request) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn show_handler<R, E>(
    State(service): State<Arc<MortgageApplicationService<R, E>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EventSink + 'static,
{
    let id = ApplicationId(application_id);
    let detail = service.get(&id).and_then(|application| {
        let latest_credit_check = service.latest_credit_check(&id)?;
        Ok(ApplicationDetailView {
            application,
            latest_credit_check,
        })
    });

    match detail {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, E>(
    State(service): State<Arc<MortgageApplicationService<R, E>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EventSink + 'static,
{
    let id = ApplicationId(application_id);
    match service.transition_status(&id, request.status, request.notes) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<R, E>(
    State(service): State<Arc<MortgageApplicationService<R, E>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EventSink + 'static,
{
    let id = ApplicationId(application_id);
    match service.evaluate(&id) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<R, E>(
    State(service): State<Arc<MortgageApplicationService<R, E>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    E: EventSink + 'static,
{
    let id = ApplicationId(application_id);
    match service.process_automated_decision(&id) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ApplicationServiceError) -> Response {
    let status = match &error {
        ApplicationServiceError::Validation(_)
        | ApplicationServiceError::IneligibleLender { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationServiceError::Transition(_) => StatusCode::BAD_REQUEST,
        ApplicationServiceError::UnknownApplicant(_)
        | ApplicationServiceError::UnknownLender(_)
        | ApplicationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ApplicationServiceError::Repository(RepositoryError::Unavailable(_))
        | ApplicationServiceError::Events(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
