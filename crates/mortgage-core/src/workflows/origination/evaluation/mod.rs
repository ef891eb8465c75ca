mod config;
mod policy;
mod risk;

pub use config::UnderwritingConfig;
pub use policy::Recommendation;
pub use risk::{RiskComponent, RiskFactor, RiskProfile};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Applicant, ApplicationId, MortgageApplication};

/// Stateless evaluator applying the risk formula and approval gates to an
/// application's stored metrics.
pub struct DecisionEngine {
    config: UnderwritingConfig,
}

impl DecisionEngine {
    pub fn new(config: UnderwritingConfig) -> Self {
        Self { config }
    }

    /// Composite risk score for a profile (0 to 100, higher is safer).
    pub fn risk_score(&self, profile: &RiskProfile) -> u8 {
        risk::score(profile)
    }

    /// Per-factor contributions behind [`DecisionEngine::risk_score`].
    pub fn risk_breakdown(&self, profile: &RiskProfile) -> [RiskComponent; 4] {
        risk::components(profile)
    }

    /// Apply the approval gates. Pure over the already-computed metric
    /// fields; nothing is recalculated or persisted here.
    pub fn evaluate(
        &self,
        application: &MortgageApplication,
        applicant: &Applicant,
        today: NaiveDate,
    ) -> DecisionOutcome {
        let reasons = policy::run_gates(application, applicant, &self.config, today);
        let approved = reasons.is_empty();

        DecisionOutcome {
            application_id: application.application_id.clone(),
            approved,
            reasons,
            recommendation: if approved {
                Recommendation::Approve
            } else {
                Recommendation::ManualReview
            },
        }
    }
}

/// Gate outcome consumed by the decision driver and the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub application_id: ApplicationId,
    pub approved: bool,
    pub reasons: Vec<String>,
    pub recommendation: Recommendation,
}
