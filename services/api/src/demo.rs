use crate::infra::{
    default_underwriting_config, seed_reference_data, InMemoryApplicationRepository,
    InMemoryEventSink,
};
use chrono::NaiveDate;
use clap::Args;
use std::sync::Arc;

use mortgage_core::clock::{Clock, FixedClock, SystemClock};
use mortgage_core::error::AppError;
use mortgage_core::workflows::origination::{
    ApplicantId, ApplicationRepository, ApplicationRequest, ApplicationServiceError,
    ApplicationStatus, LenderId, MortgageApplication, MortgageApplicationService, PropertyType,
    PurchaseType,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pin the evaluation date (YYYY-MM-DD). Defaults to the wall clock.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Loan amount for the walkthrough submission.
    #[arg(long, default_value_t = 270_000.0)]
    pub(crate) loan_amount: f64,
    /// Property value for the walkthrough submission.
    #[arg(long, default_value_t = 300_000.0)]
    pub(crate) property_value: f64,
    /// Skip the second, approvable scenario.
    #[arg(long)]
    pub(crate) skip_approval_scenario: bool,
}

type DemoService = MortgageApplicationService<InMemoryApplicationRepository, InMemoryEventSink>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        loan_amount,
        property_value,
        skip_approval_scenario,
    } = args;

    let clock: Arc<dyn Clock> = match today {
        Some(date) => {
            let noon = date
                .and_hms_opt(12, 0, 0)
                .expect("noon is a valid time")
                .and_utc();
            Arc::new(FixedClock(noon))
        }
        None => Arc::new(SystemClock),
    };

    let repository = Arc::new(InMemoryApplicationRepository::default());
    seed_reference_data(&repository);
    let events = Arc::new(InMemoryEventSink::default());
    let service = MortgageApplicationService::with_clock(
        repository.clone(),
        events.clone(),
        default_underwriting_config(),
        clock.clone(),
    );

    println!("Mortgage origination demo (evaluated {})", clock.today());
    println!("Seeded applicant apl-0001 and lender lnd-0001\n");

    println!(
        "Scenario 1: {:.0} against a {:.0} property",
        loan_amount, property_value
    );
    let application = service.create_application(demo_request(loan_amount, property_value))?;
    render_application(&application);
    render_quote(&repository, &application)?;
    render_credit_check(&service, &application)?;
    render_decision(&service, &application)?;

    if !skip_approval_scenario {
        let approvable_loan = property_value * 2.0 / 3.0;
        println!(
            "\nScenario 2: the same purchase at {:.0} ({} deposit)",
            approvable_loan,
            property_value - approvable_loan
        );
        let application =
            service.create_application(demo_request(approvable_loan, property_value))?;
        render_application(&application);
        render_decision(&service, &application)?;

        let decided = service.get(&application.application_id)?;
        if decided.status == ApplicationStatus::Approved {
            let completed = service.transition_status(
                &decided.application_id,
                ApplicationStatus::Completed,
                Some("Funds released".to_string()),
            )?;
            println!(
                "  Post-approval closing -> status {}",
                completed.status.label()
            );
        }
    }

    println!("\nAudit trail");
    for event in events.recorded() {
        println!(
            "- [{}] {} {}: {}",
            event.recorded_at,
            event.application_id,
            event.kind.label(),
            event.description
        );
    }

    Ok(())
}

fn demo_request(loan_amount: f64, property_value: f64) -> ApplicationRequest {
    ApplicationRequest {
        applicant_id: ApplicantId("apl-0001".to_string()),
        lender_id: LenderId("lnd-0001".to_string()),
        property_value,
        loan_amount,
        deposit_amount: (property_value - loan_amount).max(0.0),
        loan_term_years: 25,
        interest_rate: 4.5,
        property_address: "456 Property Lane, London".to_string(),
        property_type: PropertyType::SemiDetached,
        purchase_type: PurchaseType::Purchase,
        status: Some(ApplicationStatus::Submitted),
    }
}

fn render_application(application: &MortgageApplication) {
    println!(
        "- Created application {} -> status {}",
        application.application_id,
        application.status.label()
    );
    if let Some(ltv) = application.loan_to_value_ratio {
        println!("  LTV ratio: {ltv}%");
    }
    if let Some(payment) = application.monthly_payment {
        println!("  Monthly payment: {payment:.2}");
    }
    if let Some(affordability) = application.affordability_ratio {
        println!("  Affordability ratio: {affordability}% of income");
    }
    if let Some(risk) = application.risk_score {
        println!("  Risk score: {risk}/100");
    }
}

fn render_quote(
    repository: &InMemoryApplicationRepository,
    application: &MortgageApplication,
) -> Result<(), AppError> {
    let applicant = repository
        .applicant(&application.applicant_id)
        .map_err(ApplicationServiceError::from)?;
    let lender = repository
        .lender(&application.lender_id)
        .map_err(ApplicationServiceError::from)?;
    if let (Some(applicant), Some(lender)) = (applicant, lender) {
        println!(
            "  {} quotes {} a rate of {:.2}%",
            lender.name,
            applicant.full_name(),
            lender.quoted_rate(application, &applicant)
        );
    }
    Ok(())
}

fn render_credit_check(
    service: &DemoService,
    application: &MortgageApplication,
) -> Result<(), AppError> {
    match service.latest_credit_check(&application.application_id)? {
        Some(check) => {
            println!(
                "  Credit check ({}) -> score {}",
                check.report.bureaus_checked.join(", "),
                check
                    .credit_score
                    .map(|score| score.to_string())
                    .unwrap_or_else(|| "unavailable".to_string())
            );
        }
        None => println!("  Credit check: none on file"),
    }
    Ok(())
}

fn render_decision(
    service: &DemoService,
    application: &MortgageApplication,
) -> Result<(), AppError> {
    let outcome = service.evaluate(&application.application_id)?;
    println!("  Recommendation: {}", outcome.recommendation.label());
    for reason in &outcome.reasons {
        println!("    - {reason}");
    }

    let decided = service.process_automated_decision(&application.application_id)?;
    println!(
        "  Automated decision -> status {}{}",
        decided.status.label(),
        decided
            .notes
            .as_deref()
            .map(|notes| format!(" ({notes})"))
            .unwrap_or_default()
    );
    Ok(())
}
