use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{Applicant, MortgageApplication};
use super::config::UnderwritingConfig;

/// Aggregate recommendation derived from the approval gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Approve")]
    Approve,
    #[serde(rename = "Manual review required")]
    ManualReview,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::Approve => "Approve",
            Recommendation::ManualReview => "Manual review required",
        }
    }
}

/// Run every approval gate and collect the reasons that failed, in gate
/// order. Missing credit or risk scores fail their gates; missing ratio
/// metrics pass theirs.
pub(crate) fn run_gates(
    application: &MortgageApplication,
    applicant: &Applicant,
    config: &UnderwritingConfig,
    today: NaiveDate,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if applicant.credit_score.unwrap_or(0) < config.min_credit_score {
        reasons.push("Credit score below threshold".to_string());
    }

    if application.loan_to_value_ratio.unwrap_or(0.0) > config.max_loan_to_value {
        reasons.push(format!("LTV ratio exceeds {}%", config.max_loan_to_value));
    }

    if application.affordability_ratio.unwrap_or(0.0) > config.max_affordability_ratio {
        reasons.push(format!(
            "Monthly payment exceeds {}% of income",
            config.max_affordability_ratio
        ));
    }

    if applicant.employment_duration_months(today) < config.min_employment_months {
        reasons.push(format!(
            "Employment duration less than {} months",
            config.min_employment_months
        ));
    }

    if application.risk_score.unwrap_or(0) < config.min_risk_score {
        reasons.push("Risk score below acceptable threshold".to_string());
    }

    reasons
}
