use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::Clock;

use super::domain::{
    Applicant, CreditCheck, CreditCheckStatus, CreditReport, MortgageApplication,
};
use super::repository::{ApplicationRepository, RepositoryError};

const BUREAUS: [&str; 3] = ["Experian", "Equifax", "TransUnion"];

/// Outcome of a credit-check dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum CreditCheckDispatch {
    /// A fresh snapshot was recorded for this application.
    Performed(CreditCheck),
    /// A snapshot was already on file; nothing was written.
    AlreadyOnFile(CreditCheck),
}

impl CreditCheckDispatch {
    pub fn snapshot(&self) -> &CreditCheck {
        match self {
            CreditCheckDispatch::Performed(check)
            | CreditCheckDispatch::AlreadyOnFile(check) => check,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, CreditCheckDispatch::Performed(_))
    }
}

/// Stubbed bureau collaborator.
///
/// A production integration would call out to the bureaus; the stub echoes
/// the applicant's known score with a canned report. Dispatch is
/// idempotent per application, so a re-queued job cannot record duplicate
/// snapshots.
pub(crate) struct CreditCheckService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ApplicationRepository> CreditCheckService<R> {
    pub(crate) fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Record a snapshot for the application, or return the existing one.
    pub(crate) fn dispatch(
        &self,
        application: &MortgageApplication,
        applicant: &Applicant,
    ) -> Result<CreditCheckDispatch, RepositoryError> {
        if let Some(existing) = self
            .repository
            .latest_credit_check(&application.application_id)?
        {
            return Ok(CreditCheckDispatch::AlreadyOnFile(existing));
        }

        let check = snapshot(application, applicant, self.clock.now());
        self.repository.insert_credit_check(check.clone())?;
        Ok(CreditCheckDispatch::Performed(check))
    }
}

/// The echoed snapshot the stub stores.
pub(crate) fn snapshot(
    application: &MortgageApplication,
    applicant: &Applicant,
    checked_at: DateTime<Utc>,
) -> CreditCheck {
    CreditCheck {
        application_id: application.application_id.clone(),
        credit_score: applicant.credit_score,
        report: CreditReport {
            bureaus_checked: BUREAUS.iter().map(|bureau| bureau.to_string()).collect(),
            debt_to_income_ratio: applicant.debt_to_income_ratio(),
            payment_history: "Good".to_string(),
            credit_utilization: 35,
            credit_history_years: 10,
        },
        status: CreditCheckStatus::Completed,
        checked_at,
    }
}
