use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use mortgage_core::workflows::origination::{
    application_router, ApplicationRepository, EventSink, MortgageApplicationService,
};

pub(crate) fn with_application_routes<R, E>(
    service: Arc<MortgageApplicationService<R, E>>,
) -> axum::Router
where
    R: ApplicationRepository + 'static,
    E: EventSink + 'static,
{
    application_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{default_underwriting_config, seed_reference_data};
    use crate::infra::{InMemoryApplicationRepository, InMemoryEventSink};
    use mortgage_core::workflows::origination::{
        ApplicantId, ApplicationRequest, ApplicationStatus, LenderId, PropertyType, PurchaseType,
    };

    fn build_service(
    ) -> Arc<MortgageApplicationService<InMemoryApplicationRepository, InMemoryEventSink>> {
        let repository = Arc::new(InMemoryApplicationRepository::default());
        seed_reference_data(&repository);
        Arc::new(MortgageApplicationService::new(
            repository,
            Arc::new(InMemoryEventSink::default()),
            default_underwriting_config(),
        ))
    }

    fn submitted_request() -> ApplicationRequest {
        ApplicationRequest {
            applicant_id: ApplicantId("apl-0001".to_string()),
            lender_id: LenderId("lnd-0001".to_string()),
            property_value: 300_000.0,
            loan_amount: 270_000.0,
            deposit_amount: 30_000.0,
            loan_term_years: 25,
            interest_rate: 4.5,
            property_address: "456 Property Lane, London".to_string(),
            property_type: PropertyType::SemiDetached,
            purchase_type: PurchaseType::Purchase,
            status: Some(ApplicationStatus::Submitted),
        }
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(payload) = healthcheck().await;
        assert_eq!(payload, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn seeded_service_accepts_the_sample_submission() {
        let service = build_service();

        let application = service
            .create_application(submitted_request())
            .expect("seed records support creation");

        assert_eq!(application.loan_to_value_ratio, Some(90.0));
        assert_eq!(application.status, ApplicationStatus::CreditCheck);
    }
}
