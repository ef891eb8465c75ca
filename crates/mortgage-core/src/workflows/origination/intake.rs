use serde::{Deserialize, Serialize};

use super::domain::{ApplicantId, ApplicationStatus, LenderId, PropertyType, PurchaseType};

const MIN_TERM_YEARS: u32 = 1;
const MAX_TERM_YEARS: u32 = 40;
const MAX_ADDRESS_LEN: usize = 500;

/// Inbound request to open a mortgage application.
///
/// Every field is validated explicitly before any metric is computed or
/// stored. `status` defaults to draft so only deliberate submissions
/// trigger the credit-check side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRequest {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
}

impl ApplicationRequest {
    /// Reject malformed or out-of-range figures.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Self::check_amount("property_value", self.property_value)?;
        Self::check_amount("loan_amount", self.loan_amount)?;
        Self::check_amount("deposit_amount", self.deposit_amount)?;
        Self::check_amount("interest_rate", self.interest_rate)?;

        if !(MIN_TERM_YEARS..=MAX_TERM_YEARS).contains(&self.loan_term_years) {
            return Err(ValidationError::TermOutOfRange {
                years: self.loan_term_years,
            });
        }

        if self.property_address.trim().is_empty()
            || self.property_address.len() > MAX_ADDRESS_LEN
        {
            return Err(ValidationError::InvalidAddress);
        }

        Ok(())
    }

    pub fn initial_status(&self) -> ApplicationStatus {
        self.status.unwrap_or(ApplicationStatus::Draft)
    }

    fn check_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidAmount { field, value });
        }
        Ok(())
    }
}

/// Rejections raised before an application is materialized.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a non-negative finite amount, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("loan term must be between {MIN_TERM_YEARS} and {MAX_TERM_YEARS} years, got {years}")]
    TermOutOfRange { years: u32 },
    #[error("property address must be non-empty and at most {MAX_ADDRESS_LEN} characters")]
    InvalidAddress,
}
