use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};

use super::credit::{CreditCheckDispatch, CreditCheckService};
use super::domain::{
    Applicant, ApplicantId, ApplicationId, ApplicationStatus, CreditCheck, LenderId,
    MortgageApplication,
};
use super::evaluation::{DecisionEngine, DecisionOutcome, RiskProfile, UnderwritingConfig};
use super::finance;
use super::intake::{ApplicationRequest, ValidationError};
use super::lifecycle::{self, TransitionError};
use super::repository::{ApplicationRepository, EventSink, EventSinkError, RepositoryError};

/// Service composing intake validation, metric derivation, decisioning,
/// and lifecycle bookkeeping over the persistence and audit contracts.
pub struct MortgageApplicationService<R, E> {
    repository: Arc<R>,
    events: Arc<E>,
    engine: Arc<DecisionEngine>,
    credit: CreditCheckService<R>,
    clock: Arc<dyn Clock>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R, E> MortgageApplicationService<R, E>
where
    R: ApplicationRepository + 'static,
    E: EventSink + 'static,
{
    pub fn new(repository: Arc<R>, events: Arc<E>, config: UnderwritingConfig) -> Self {
        Self::with_clock(repository, events, config, Arc::new(SystemClock))
    }

    /// Build with an explicit time source so tests and replays can pin the
    /// evaluation date.
    pub fn with_clock(
        repository: Arc<R>,
        events: Arc<E>,
        config: UnderwritingConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let credit = CreditCheckService::new(repository.clone(), clock.clone());
        Self {
            repository,
            events,
            engine: Arc::new(DecisionEngine::new(config)),
            credit,
            clock,
        }
    }

    /// Open a new application with every derived metric computed up front.
    ///
    /// Validation, applicant and lender resolution, and metric derivation
    /// all happen before the single insert, so a failure at any step leaves
    /// no partial record behind. A request created directly in `submitted`
    /// records the submission event and then runs the credit-check
    /// dispatch, landing in `credit_check`.
    pub fn create_application(
        &self,
        request: ApplicationRequest,
    ) -> Result<MortgageApplication, ApplicationServiceError> {
        request.validate()?;

        let applicant = self.fetch_applicant(&request.applicant_id)?;
        let lender = self
            .repository
            .lender(&request.lender_id)?
            .ok_or_else(|| ApplicationServiceError::UnknownLender(request.lender_id.clone()))?;

        let now = self.clock.now();
        let application = self.assemble(request, &applicant, now);

        if !lender.can_accept(&application, &applicant) {
            return Err(ApplicationServiceError::IneligibleLender {
                lender: lender.code,
            });
        }

        let stored = self.repository.insert(application)?;
        if stored.status != ApplicationStatus::Submitted {
            return Ok(stored);
        }

        let application_id = stored.application_id.clone();
        self.events
            .record(lifecycle::submission_event(&stored, now))?;
        self.run_credit_check(stored, &applicant)?;

        self.fetch_application(&application_id)
    }

    /// Fetch an application for API responses.
    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<MortgageApplication, ApplicationServiceError> {
        self.fetch_application(application_id)
    }

    /// Run the approval gates without touching any state.
    pub fn evaluate(
        &self,
        application_id: &ApplicationId,
    ) -> Result<DecisionOutcome, ApplicationServiceError> {
        let application = self.fetch_application(application_id)?;
        let applicant = self.fetch_applicant(&application.applicant_id)?;

        Ok(self
            .engine
            .evaluate(&application, &applicant, self.clock.today()))
    }

    /// Apply the automated decision: approve outright, or park the
    /// application for manual review with every failing criterion noted.
    pub fn process_automated_decision(
        &self,
        application_id: &ApplicationId,
    ) -> Result<MortgageApplication, ApplicationServiceError> {
        let application = self.fetch_application(application_id)?;
        let applicant = self.fetch_applicant(&application.applicant_id)?;
        let outcome = self
            .engine
            .evaluate(&application, &applicant, self.clock.today());

        let (status, notes) = if outcome.approved {
            (
                ApplicationStatus::Approved,
                "Approved via automated system".to_string(),
            )
        } else {
            (
                ApplicationStatus::UnderReview,
                format!("Requires manual review: {}", outcome.reasons.join(", ")),
            )
        };

        self.apply_transition(application, &applicant.applicant_id, status, Some(notes))
    }

    /// Move an application to `new_status`, recording the audit event.
    pub fn transition_status(
        &self,
        application_id: &ApplicationId,
        new_status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<MortgageApplication, ApplicationServiceError> {
        let application = self.fetch_application(application_id)?;
        let applicant_id = application.applicant_id.clone();
        self.apply_transition(application, &applicant_id, new_status, notes)
    }

    /// Idempotent credit-check entry point, safe for a deferred worker to
    /// re-run after the submission event is already on file.
    pub fn dispatch_credit_check(
        &self,
        application_id: &ApplicationId,
    ) -> Result<CreditCheckDispatch, ApplicationServiceError> {
        let application = self.fetch_application(application_id)?;
        let applicant = self.fetch_applicant(&application.applicant_id)?;
        self.run_credit_check(application, &applicant)
    }

    /// Latest credit snapshot on file, if any.
    pub fn latest_credit_check(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<CreditCheck>, ApplicationServiceError> {
        Ok(self.repository.latest_credit_check(application_id)?)
    }

    /// Applications queued for manual review, oldest submissions first.
    pub fn review_queue(
        &self,
        limit: usize,
    ) -> Result<Vec<MortgageApplication>, ApplicationServiceError> {
        Ok(self.repository.review_queue(limit)?)
    }

    fn assemble(
        &self,
        request: ApplicationRequest,
        applicant: &Applicant,
        now: DateTime<Utc>,
    ) -> MortgageApplication {
        let status = request.initial_status();
        let ltv = finance::loan_to_value(request.loan_amount, request.property_value);
        let monthly_payment = finance::monthly_payment(
            request.loan_amount,
            request.interest_rate,
            request.loan_term_years,
        );
        let affordability =
            finance::affordability_ratio(monthly_payment, applicant.monthly_income());
        let risk_score = self.engine.risk_score(&RiskProfile {
            credit_score: applicant.credit_score,
            debt_to_income: applicant.debt_to_income_ratio(),
            loan_to_value: ltv,
            employment_months: applicant.employment_duration_months(now.date_naive()),
        });

        MortgageApplication {
            application_id: next_application_id(),
            applicant_id: request.applicant_id,
            lender_id: request.lender_id,
            property_value: request.property_value,
            loan_amount: request.loan_amount,
            deposit_amount: request.deposit_amount,
            loan_term_years: request.loan_term_years,
            interest_rate: request.interest_rate,
            property_address: request.property_address,
            property_type: request.property_type,
            purchase_type: request.purchase_type,
            status,
            monthly_payment: Some(monthly_payment),
            loan_to_value_ratio: Some(ltv),
            affordability_ratio: Some(affordability),
            risk_score: Some(risk_score),
            submitted_at: (status == ApplicationStatus::Submitted).then_some(now),
            reviewed_at: None,
            decision_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn run_credit_check(
        &self,
        mut application: MortgageApplication,
        applicant: &Applicant,
    ) -> Result<CreditCheckDispatch, ApplicationServiceError> {
        let dispatch = self.credit.dispatch(&application, applicant)?;

        if dispatch.is_fresh() {
            let change = lifecycle::transition(
                &mut application,
                ApplicationStatus::CreditCheck,
                Some("Credit check initiated".to_string()),
                self.clock.now(),
            )?;
            self.repository.update(application)?;
            self.events
                .record(change.audit_event(&applicant.applicant_id))?;
        }

        Ok(dispatch)
    }

    fn apply_transition(
        &self,
        mut application: MortgageApplication,
        applicant_id: &ApplicantId,
        new_status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<MortgageApplication, ApplicationServiceError> {
        let change = lifecycle::transition(&mut application, new_status, notes, self.clock.now())?;
        self.repository.update(application.clone())?;
        self.events.record(change.audit_event(applicant_id))?;
        Ok(application)
    }

    fn fetch_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<MortgageApplication, ApplicationServiceError> {
        let application = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    fn fetch_applicant(&self, id: &ApplicantId) -> Result<Applicant, ApplicationServiceError> {
        let applicant = self
            .repository
            .applicant(id)?
            .ok_or_else(|| ApplicationServiceError::UnknownApplicant(id.clone()))?;
        Ok(applicant)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Events(#[from] EventSinkError),
    #[error("applicant {0} not found")]
    UnknownApplicant(ApplicantId),
    #[error("lender {0} not found")]
    UnknownLender(LenderId),
    #[error("lender {lender} cannot accept this application")]
    IneligibleLender { lender: String },
}
