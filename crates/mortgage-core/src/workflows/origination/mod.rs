//! Mortgage application intake, underwriting, and lifecycle decisioning.
//!
//! Intake validates raw figures before anything is stored, the finance
//! module derives the metrics underwriting reads, and the evaluation engine
//! applies the risk formula and approval gates. The service composes these
//! with the repository and audit sink so every status move lands exactly
//! one audit event.

pub(crate) mod credit;
pub mod domain;
pub(crate) mod evaluation;
pub mod finance;
pub mod intake;
pub(crate) mod lifecycle;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use credit::CreditCheckDispatch;
pub use domain::{
    Applicant, ApplicantId, ApplicationEvent, ApplicationEventKind, ApplicationId,
    ApplicationStatus, CreditCheck, CreditCheckStatus, CreditReport, EmploymentStatus, Lender,
    LenderId, MortgageApplication, PropertyType, PurchaseType,
};
pub use evaluation::{
    DecisionOutcome, Recommendation, RiskComponent, RiskFactor, RiskProfile, UnderwritingConfig,
};
pub use intake::{ApplicationRequest, ValidationError};
pub use lifecycle::{StatusChange, TransitionError};
pub use repository::{ApplicationRepository, EventSink, EventSinkError, RepositoryError};
pub use router::{application_router, StatusUpdateRequest};
pub use service::{ApplicationServiceError, MortgageApplicationService};
