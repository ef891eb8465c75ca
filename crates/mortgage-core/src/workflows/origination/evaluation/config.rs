use serde::{Deserialize, Serialize};

/// Thresholds gating automated approval.
///
/// Ratios are percentages on the same scale the finance calculators
/// produce. The defaults carry the standard underwriting policy; tests
/// and deployments can tighten or relax individual dials without touching
/// the gates themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingConfig {
    pub min_credit_score: u16,
    pub max_loan_to_value: f64,
    pub max_affordability_ratio: f64,
    pub min_employment_months: u32,
    pub min_risk_score: u8,
}

impl Default for UnderwritingConfig {
    fn default() -> Self {
        Self {
            min_credit_score: 700,
            max_loan_to_value: 80.0,
            max_affordability_ratio: 35.0,
            min_employment_months: 12,
            min_risk_score: 60,
        }
    }
}
