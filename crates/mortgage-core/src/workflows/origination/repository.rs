use super::domain::{
    Applicant, ApplicantId, ApplicationEvent, ApplicationId, CreditCheck, Lender, LenderId,
    MortgageApplication,
};

/// Persistence contract for the origination workflow.
///
/// `insert` must land the application with every derived field populated
/// as a single atomic write: after a failure no partial record may be
/// observable. Applicant and lender records are read-only from this side.
pub trait ApplicationRepository: Send + Sync {
    fn insert(
        &self,
        application: MortgageApplication,
    ) -> Result<MortgageApplication, RepositoryError>;
    fn update(&self, application: MortgageApplication) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<MortgageApplication>, RepositoryError>;
    fn applicant(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError>;
    fn lender(&self, id: &LenderId) -> Result<Option<Lender>, RepositoryError>;
    fn insert_credit_check(&self, check: CreditCheck) -> Result<(), RepositoryError>;
    fn latest_credit_check(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<CreditCheck>, RepositoryError>;
    /// Applications parked for manual review, oldest submissions first.
    fn review_queue(&self, limit: usize) -> Result<Vec<MortgageApplication>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Append-only audit trail consumed by downstream reporting.
pub trait EventSink: Send + Sync {
    fn record(&self, event: ApplicationEvent) -> Result<(), EventSinkError>;
}

/// Audit dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum EventSinkError {
    #[error("event sink unavailable: {0}")]
    Transport(String),
}
