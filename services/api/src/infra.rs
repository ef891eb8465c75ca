use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use mortgage_core::workflows::origination::{
    Applicant, ApplicantId, ApplicationEvent, ApplicationId, ApplicationRepository,
    ApplicationStatus, CreditCheck, EmploymentStatus, EventSink, EventSinkError, Lender, LenderId,
    MortgageApplication, RepositoryError, UnderwritingConfig,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    applications: Arc<Mutex<HashMap<ApplicationId, MortgageApplication>>>,
    applicants: Arc<Mutex<HashMap<ApplicantId, Applicant>>>,
    lenders: Arc<Mutex<HashMap<LenderId, Lender>>>,
    credit_checks: Arc<Mutex<Vec<CreditCheck>>>,
}

impl InMemoryApplicationRepository {
    pub(crate) fn seed_applicant(&self, applicant: Applicant) {
        self.applicants
            .lock()
            .expect("applicant mutex poisoned")
            .insert(applicant.applicant_id.clone(), applicant);
    }

    pub(crate) fn seed_lender(&self, lender: Lender) {
        self.lenders
            .lock()
            .expect("lender mutex poisoned")
            .insert(lender.lender_id.clone(), lender);
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(
        &self,
        application: MortgageApplication,
    ) -> Result<MortgageApplication, RepositoryError> {
        let mut guard = self.applications.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.application_id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: MortgageApplication) -> Result<(), RepositoryError> {
        let mut guard = self.applications.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.application_id) {
            guard.insert(application.application_id.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<MortgageApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
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
        let guard = self
            .credit_checks
            .lock()
            .expect("credit check mutex poisoned");
        Ok(guard
            .iter()
            .filter(|check| &check.application_id == id)
            .max_by_key(|check| check.checked_at)
            .cloned())
    }

    fn review_queue(&self, limit: usize) -> Result<Vec<MortgageApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
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
pub(crate) struct InMemoryEventSink {
    events: Arc<Mutex<Vec<ApplicationEvent>>>,
}

impl InMemoryEventSink {
    pub(crate) fn recorded(&self) -> Vec<ApplicationEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&self, event: ApplicationEvent) -> Result<(), EventSinkError> {
        let mut guard = self.events.lock().expect("event mutex poisoned");
        guard.push(event);
        Ok(())
    }
}

pub(crate) fn default_underwriting_config() -> UnderwritingConfig {
    UnderwritingConfig::default()
}

/// Sample applicant and lender so the service answers requests out of the
/// box. Until applicant intake has its own endpoint these records stand in
/// for the CRM read side.
pub(crate) fn seed_reference_data(repository: &InMemoryApplicationRepository) {
    repository.seed_applicant(Applicant {
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
    });

    repository.seed_lender(Lender {
        lender_id: LenderId("lnd-0001".to_string()),
        name: "Test Lender".to_string(),
        code: "TEST001".to_string(),
        active: true,
        min_credit_score: 600,
        max_ltv_ratio: 95.0,
        min_loan_amount: 50_000.0,
        max_loan_amount: 1_000_000.0,
        base_interest_rate: 4.5,
    });
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
