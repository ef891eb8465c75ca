use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::finance;

/// Identifier wrapper for mortgage applications minted by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for applicant records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for lender records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LenderId(pub String);

impl fmt::Display for LenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employment situation declared by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Retired,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "employed",
            EmploymentStatus::SelfEmployed => "self_employed",
            EmploymentStatus::Unemployed => "unemployed",
            EmploymentStatus::Retired => "retired",
        }
    }
}

/// Applicant with the financial profile underwriting reads.
///
/// Income figures are annual amounts; `existing_debt` is the declared
/// annual repayment obligation on other credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub applicant_id: ApplicantId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub employment_status: EmploymentStatus,
    pub employer_name: Option<String>,
    pub job_title: Option<String>,
    pub employment_start_date: Option<NaiveDate>,
    pub annual_income: f64,
    pub other_income: f64,
    pub monthly_expenses: f64,
    pub existing_debt: f64,
    pub credit_score: Option<u16>,
}

impl Applicant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Total monthly income across declared sources.
    pub fn monthly_income(&self) -> f64 {
        (self.annual_income + self.other_income) / 12.0
    }

    /// Existing debt burden as a monthly percentage of income.
    pub fn debt_to_income_ratio(&self) -> f64 {
        finance::debt_to_income_ratio(self.existing_debt, self.monthly_income())
    }

    /// Whole months in the current role as of `today`.
    pub fn employment_duration_months(&self, today: NaiveDate) -> u32 {
        finance::employment_duration_months(self.employment_start_date, today)
    }

    pub fn is_employed(&self) -> bool {
        matches!(
            self.employment_status,
            EmploymentStatus::Employed | EmploymentStatus::SelfEmployed
        )
    }
}

/// Lender acceptance criteria gating which applications it takes on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lender {
    pub lender_id: LenderId,
    pub name: String,
    pub code: String,
    pub active: bool,
    pub min_credit_score: u16,
    pub max_ltv_ratio: f64,
    pub min_loan_amount: f64,
    pub max_loan_amount: f64,
    pub base_interest_rate: f64,
}

impl Lender {
    /// Whether this lender will process the application at all.
    ///
    /// An applicant with no credit score on file is never accepted.
    pub fn can_accept(&self, application: &MortgageApplication, applicant: &Applicant) -> bool {
        let credit_ok = applicant
            .credit_score
            .map(|score| score >= self.min_credit_score)
            .unwrap_or(false);
        let ltv_ok = application.loan_to_value_ratio.unwrap_or(0.0) <= self.max_ltv_ratio;

        self.active
            && credit_ok
            && ltv_ok
            && application.loan_amount >= self.min_loan_amount
            && application.loan_amount <= self.max_loan_amount
    }

    /// Rate this lender would quote after credit and LTV adjustments.
    pub fn quoted_rate(&self, application: &MortgageApplication, applicant: &Applicant) -> f64 {
        let mut rate = self.base_interest_rate;
        if applicant.credit_score.unwrap_or(0) < 700 {
            rate += 0.5;
        }
        if application.loan_to_value_ratio.unwrap_or(0.0) > 80.0 {
            rate += 0.25;
        }
        finance::round2(rate)
    }
}

/// Property category declared on the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Detached,
    SemiDetached,
    Terraced,
    Flat,
    Bungalow,
}

impl PropertyType {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyType::Detached => "detached",
            PropertyType::SemiDetached => "semi_detached",
            PropertyType::Terraced => "terraced",
            PropertyType::Flat => "flat",
            PropertyType::Bungalow => "bungalow",
        }
    }
}

/// Nature of the purchase being financed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseType {
    Purchase,
    Remortgage,
    FirstTimeBuyer,
}

impl PurchaseType {
    pub const fn label(self) -> &'static str {
        match self {
            PurchaseType::Purchase => "purchase",
            PurchaseType::Remortgage => "remortgage",
            PurchaseType::FirstTimeBuyer => "first_time_buyer",
        }
    }
}

/// High level status tracked throughout the application workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    CreditCheck,
    Approved,
    Rejected,
    Completed,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::CreditCheck => "credit_check",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Completed => "completed",
        }
    }

    /// Terminal statuses; the only move out of them is into `Completed`.
    pub const fn is_finalized(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected | ApplicationStatus::Completed
        )
    }

    /// Statuses still waiting on a decision.
    pub const fn is_pending(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Submitted
                | ApplicationStatus::UnderReview
                | ApplicationStatus::CreditCheck
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A mortgage application owned by the origination workflow.
///
/// The derived metric fields (`monthly_payment`, `loan_to_value_ratio`,
/// `affordability_ratio`, `risk_score`) are populated once at creation and
/// never recomputed on read paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageApplication {
    pub application_id: ApplicationId,
    pub applicant_id: ApplicantId,
    pub lender_id: LenderId,
    pub property_value: f64,
    pub loan_amount: f64,
    pub deposit_amount: f64,
    pub loan_term_years: u32,
    pub interest_rate: f64,
    pub property_address: String,
    pub property_type: PropertyType,
    pub purchase_type: PurchaseType,
    pub status: ApplicationStatus,
    pub monthly_payment: Option<f64>,
    pub loan_to_value_ratio: Option<f64>,
    pub affordability_ratio: Option<f64>,
    pub risk_score: Option<u8>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub decision_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MortgageApplication {
    pub fn is_finalized(&self) -> bool {
        self.status.is_finalized()
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}

/// Kind discriminator for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationEventKind {
    Submitted,
    StatusChange,
}

impl ApplicationEventKind {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationEventKind::Submitted => "submitted",
            ApplicationEventKind::StatusChange => "status_change",
        }
    }
}

/// Immutable audit record appended for every lifecycle move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    pub application_id: ApplicationId,
    pub kind: ApplicationEventKind,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub description: String,
    pub metadata: BTreeMap<String, String>,
    pub recorded_at: DateTime<Utc>,
}

/// Progress marker for a bureau inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditCheckStatus {
    Pending,
    Completed,
    Failed,
}

impl CreditCheckStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CreditCheckStatus::Pending => "pending",
            CreditCheckStatus::Completed => "completed",
            CreditCheckStatus::Failed => "failed",
        }
    }
}

/// Report payload returned by the bureau collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditReport {
    pub bureaus_checked: Vec<String>,
    pub debt_to_income_ratio: f64,
    pub payment_history: String,
    pub credit_utilization: u8,
    pub credit_history_years: u8,
}

/// Point-in-time credit snapshot stored per application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCheck {
    pub application_id: ApplicationId,
    pub credit_score: Option<u16>,
    pub report: CreditReport,
    pub status: CreditCheckStatus,
    pub checked_at: DateTime<Utc>,
}
