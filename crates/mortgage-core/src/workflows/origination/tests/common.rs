use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::clock::FixedClock;
use crate::workflows::origination::domain::{
    Applicant, ApplicantId, ApplicationEvent, ApplicationId, CreditCheck, EmploymentStatus,
    Lender, LenderId, MortgageApplication, PropertyType, PurchaseType,
};
use crate::workflows::origination::intake::ApplicationRequest;
use crate::workflows::origination::repository::{
    ApplicationRepository, EventSink, EventSinkError, RepositoryError,
};
use crate::workflows::origination::{
    application_router, ApplicationStatus, MortgageApplicationService, UnderwritingConfig,
};

/// Every fixture evaluates at noon on 2025-06-15 so employment durations
/// and lifecycle timestamps stay deterministic.
pub(super) fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn today() -> NaiveDate {
    fixed_instant().date_naive()
}

pub(super) fn underwriting_config() -> UnderwritingConfig {
    UnderwritingConfig {
        min_credit_score: 700,
        max_loan_to_value: 80.0,
        max_affordability_ratio: 35.0,
        min_employment_months: 12,
        min_risk_score: 60,
    }
}

pub(super) fn applicant() -> Applicant {
    Applicant {
        applicant_id: ApplicantId("apl-0001".to_string()),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        phone: "07700900000".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date"),
        employment_status: EmploymentStatus::Employed,
        employer_name: Some("Test Company".to_string()),
        job_title: Some("Software Developer".to_string()),
        employment_start_date: Some(NaiveDate::from_ymd_opt(2020, 6, 1).expect("valid date")),
        annual_income: 60_000.0,
        other_income: 0.0,
        monthly_expenses: 1_500.0,
        existing_debt: 5_000.0,
        credit_score: Some(750),
    }
}

pub(super) fn lender() -> Lender {
    Lender {
        lender_id: LenderId("lnd-0001".to_string()),
        name: "Test Lender".to_string(),
        code: "TEST001".to_string(),
        active: true,
        min_credit_score: 600,
        max_ltv_ratio: 95.0,
        min_loan_amount: 50_000.0,
        max_loan_amount: 1_000_000.0,
        base_interest_rate: 4.5,
    }
}

/// A 90% LTV request submitted straight into the workflow. With the
/// standard thresholds it passes every gate except loan-to-value.
pub(super) fn submitted_request() -> ApplicationRequest {
    ApplicationRequest {
        applicant_id: applicant().applicant_id,
        lender_id: lender().lender_id,
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

/// Same applicant and lender at 66.67% LTV; passes every gate.
pub(super) fn approvable_request() -> ApplicationRequest {
    let mut request = submitted_request();
    request.loan_amount = 200_000.0;
    request.deposit_amount = 100_000.0;
    request
}

pub(super) fn draft_request() -> ApplicationRequest {
    let mut request = submitted_request();
    request.status = None;
    request
}

pub(super) fn build_service() -> (
    MortgageApplicationService<MemoryRepository, MemoryEvents>,
    Arc<MemoryRepository>,
    Arc<MemoryEvents>,
) {
    let repository = Arc::new(MemoryRepository::default());
    repository.seed_applicant(applicant());
    repository.seed_lender(lender());
    let events = Arc::new(MemoryEvents::default());
    let service = MortgageApplicationService::with_clock(
        repository.clone(),
        events.clone(),
        underwriting_config(),
        Arc::new(FixedClock(fixed_instant())),
    );
    (service, repository, events)
}

pub(super) fn application_router_with_service(
    service: MortgageApplicationService<MemoryRepository, MemoryEvents>,
) -> axum::Router {
    application_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    applications: Arc<Mutex<HashMap<ApplicationId, MortgageApplication>>>,
    applicants: Arc<Mutex<HashMap<ApplicantId, Applicant>>>,
    lenders: Arc<Mutex<HashMap<LenderId, Lender>>>,
    credit_checks: Arc<Mutex<Vec<CreditCheck>>>,
}

impl MemoryRepository {
    pub(super) fn seed_applicant(&self, applicant: Applicant) {
        self.applicants
            .lock()
            .expect("applicant mutex poisoned")
            .insert(applicant.applicant_id.clone(), applicant);
    }

    pub(super) fn seed_lender(&self, lender: Lender) {
        self.lenders
            .lock()
            .expect("lender mutex poisoned")
            .insert(lender.lender_id.clone(), lender);
    }

    pub(super) fn application_count(&self) -> usize {
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .len()
    }

    pub(super) fn credit_check_count(&self) -> usize {
        self.credit_checks
            .lock()
            .expect("credit check mutex poisoned")
            .len()
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(
        &self,
        application: MortgageApplication,
    ) -> Result<MortgageApplication, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.application_id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: MortgageApplication) -> Result<(), RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        guard.insert(application.application_id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<MortgageApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn applicant(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = self.applicants.lock().expect("applicant mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn lender(&self, id: &LenderId) -> Result<Option<Lender>, RepositoryError> {
        let guard = self.lenders.lock().expect("lender mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert_credit_check(&self, check: CreditCheck) -> Result<(), RepositoryError> {
        self.credit_checks
            .lock()
            .expect("credit check mutex poisoned")
            .push(check);
        Ok(())
    }

    fn latest_credit_check(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<CreditCheck>, RepositoryError> {
        let guard = self.credit_checks.lock().expect("credit check mutex poisoned");
        Ok(guard
            .iter()
            .filter(|check| &check.application_id == id)
            .max_by_key(|check| check.checked_at)
            .cloned())
    }

    fn review_queue(&self, limit: usize) -> Result<Vec<MortgageApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        let mut queue: Vec<MortgageApplication> = guard
            .values()
            .filter(|application| application.status == ApplicationStatus::UnderReview)
            .cloned()
            .collect();
        queue.sort_by_key(|application| application.submitted_at);
        queue.truncate(limit);
        Ok(queue)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEvents {
    events: Arc<Mutex<Vec<ApplicationEvent>>>,
}

impl MemoryEvents {
    pub(super) fn recorded(&self) -> Vec<ApplicationEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

impl EventSink for MemoryEvents {
    fn record(&self, event: ApplicationEvent) -> Result<(), EventSinkError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event);
        Ok(())
    }
}

/// Repository that resolves lookups but refuses the insert.
pub(super) struct ConflictRepository;

impl ApplicationRepository for ConflictRepository {
    fn insert(
        &self,
        _application: MortgageApplication,
    ) -> Result<MortgageApplication, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _application: MortgageApplication) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<MortgageApplication>, RepositoryError> {
        Ok(None)
    }

    fn applicant(&self, _id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        Ok(Some(applicant()))
    }

    fn lender(&self, _id: &LenderId) -> Result<Option<Lender>, RepositoryError> {
        Ok(Some(lender()))
    }

    fn insert_credit_check(&self, _check: CreditCheck) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn latest_credit_check(
        &self,
        _id: &ApplicationId,
    ) -> Result<Option<CreditCheck>, RepositoryError> {
        Ok(None)
    }

    fn review_queue(&self, _limit: usize) -> Result<Vec<MortgageApplication>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Repository where every call fails, for surfacing transport errors.
pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(
        &self,
        _application: MortgageApplication,
    ) -> Result<MortgageApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _application: MortgageApplication) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<MortgageApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn applicant(&self, _id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn lender(&self, _id: &LenderId) -> Result<Option<Lender>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_credit_check(&self, _check: CreditCheck) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_credit_check(
        &self,
        _id: &ApplicationId,
    ) -> Result<Option<CreditCheck>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn review_queue(&self, _limit: usize) -> Result<Vec<MortgageApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
