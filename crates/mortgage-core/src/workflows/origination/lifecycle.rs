use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicantId, ApplicationEvent, ApplicationEventKind, ApplicationId, ApplicationStatus,
    MortgageApplication,
};

/// Status move recorded for every successful transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub application_id: ApplicationId,
    pub old_status: ApplicationStatus,
    pub new_status: ApplicationStatus,
    pub at: DateTime<Utc>,
}

impl StatusChange {
    /// Audit record for this move, in the shape the event sink stores.
    pub fn audit_event(&self, applicant_id: &ApplicantId) -> ApplicationEvent {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "application_id".to_string(),
            self.application_id.0.clone(),
        );
        metadata.insert("applicant_id".to_string(), applicant_id.0.clone());
        metadata.insert("timestamp".to_string(), self.at.to_rfc3339());

        ApplicationEvent {
            application_id: self.application_id.clone(),
            kind: ApplicationEventKind::StatusChange,
            old_value: Some(self.old_status.label().to_string()),
            new_value: Some(self.new_status.label().to_string()),
            description: format!(
                "Status changed from {} to {}",
                self.old_status.label(),
                self.new_status.label()
            ),
            metadata,
            recorded_at: self.at,
        }
    }
}

/// Audit record announcing entry into the workflow.
pub(crate) fn submission_event(
    application: &MortgageApplication,
    at: DateTime<Utc>,
) -> ApplicationEvent {
    let mut metadata = BTreeMap::new();
    metadata.insert(
        "applicant_id".to_string(),
        application.applicant_id.0.clone(),
    );
    metadata.insert("lender_id".to_string(), application.lender_id.0.clone());
    metadata.insert(
        "loan_amount".to_string(),
        format!("{:.2}", application.loan_amount),
    );

    ApplicationEvent {
        application_id: application.application_id.clone(),
        kind: ApplicationEventKind::Submitted,
        old_value: None,
        new_value: Some(application.status.label().to_string()),
        description: "Application submitted".to_string(),
        metadata,
        recorded_at: at,
    }
}

/// Move `application` into `new_status`, stamping lifecycle timestamps.
///
/// Finalized applications accept only a move into `Completed`; any other
/// target is rejected without touching the record. `submitted_at` is
/// stamped once on first entry; `reviewed_at` and `decision_at` track the
/// most recent entry into their statuses. Existing notes survive unless
/// the caller supplies a replacement.
pub(crate) fn transition(
    application: &mut MortgageApplication,
    new_status: ApplicationStatus,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<StatusChange, TransitionError> {
    let old_status = application.status;
    if old_status.is_finalized() && new_status != ApplicationStatus::Completed {
        return Err(TransitionError::Finalized {
            from: old_status,
            to: new_status,
        });
    }

    application.status = new_status;
    if let Some(notes) = notes {
        application.notes = Some(notes);
    }

    match new_status {
        ApplicationStatus::Submitted => {
            application.submitted_at.get_or_insert(now);
        }
        ApplicationStatus::UnderReview => {
            application.reviewed_at = Some(now);
        }
        ApplicationStatus::Approved | ApplicationStatus::Rejected => {
            application.decision_at = Some(now);
        }
        _ => {}
    }
    application.updated_at = now;

    Ok(StatusChange {
        application_id: application.application_id.clone(),
        old_status,
        new_status,
        at: now,
    })
}

/// Rejected status moves.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot change status of finalized application ({from} to {to})")]
    Finalized {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
}
