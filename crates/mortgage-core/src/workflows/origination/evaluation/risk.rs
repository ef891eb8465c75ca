use serde::{Deserialize, Serialize};

/// Inputs to the composite risk formula.
///
/// Ratios are percentages as produced by the finance calculators; a
/// missing credit score contributes zero points rather than failing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskProfile {
    pub credit_score: Option<u16>,
    pub debt_to_income: f64,
    pub loan_to_value: f64,
    pub employment_months: u32,
}

/// Factors contributing to the composite risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    CreditScore,
    DebtToIncome,
    LoanToValue,
    EmploymentStability,
}

impl RiskFactor {
    pub const fn label(self) -> &'static str {
        match self {
            RiskFactor::CreditScore => "credit_score",
            RiskFactor::DebtToIncome => "debt_to_income",
            RiskFactor::LoanToValue => "loan_to_value",
            RiskFactor::EmploymentStability => "employment_stability",
        }
    }
}

/// One factor's unrounded contribution, kept so decisions can be audited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskComponent {
    pub factor: RiskFactor,
    pub points: f64,
}

/// Per-factor contributions before rounding.
///
/// Weights: credit 40, debt-to-income 30, loan-to-value 20, employment 10.
/// Each component is floored at zero or capped at its weight where the
/// formula says so; the caps keep the rounded total inside 0..=100 for
/// inputs in their natural domains.
pub(crate) fn components(profile: &RiskProfile) -> [RiskComponent; 4] {
    let credit = f64::from(profile.credit_score.unwrap_or(0));

    [
        RiskComponent {
            factor: RiskFactor::CreditScore,
            points: (credit / 850.0 * 40.0).min(40.0),
        },
        RiskComponent {
            factor: RiskFactor::DebtToIncome,
            points: (30.0 - profile.debt_to_income / 2.0).max(0.0),
        },
        RiskComponent {
            factor: RiskFactor::LoanToValue,
            points: (20.0 - profile.loan_to_value / 5.0).max(0.0),
        },
        RiskComponent {
            factor: RiskFactor::EmploymentStability,
            points: (f64::from(profile.employment_months) / 6.0).min(10.0),
        },
    ]
}

/// Composite creditworthiness score, rounded to the nearest whole point.
/// Higher is safer.
pub(crate) fn score(profile: &RiskProfile) -> u8 {
    let total: f64 = components(profile)
        .iter()
        .map(|component| component.points)
        .sum();
    total.round() as u8
}
