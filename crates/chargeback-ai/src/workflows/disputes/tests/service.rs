use super::common::*;
use crate::workflows::disputes::assessment::Recommendation;
use crate::workflows::disputes::domain::{CustomerId, CustomerProfile, DisputeCategory, DisputeId};
use crate::workflows::disputes::repository::RepositoryError;
use crate::workflows::disputes::{DisputeAnalysisService, DisputeServiceError};
use std::sync::Arc;

fn id(value: &str) -> DisputeId {
    DisputeId(value.to_string())
}

#[test]
fn analyze_records_the_decision() {
    let (service, repository) = build_service();
    repository.insert_case(fraud_case("D-1"));

    let decision = service.analyze(&id("D-1")).expect("analysis succeeds");
    assert_eq!(decision.recommendation(), Recommendation::Review);
    assert_eq!(repository.analysis_count(&id("D-1")), 1);

    let record = service
        .latest_analysis(&id("D-1"))
        .expect("lookup succeeds")
        .expect("analysis recorded");
    assert_eq!(record.decision, decision);

    let view = record.summary_view();
    assert_eq!(view.risk_score, 35);
    assert_eq!(view.recommendation, Recommendation::Review);
    assert!(!view.escalation_needed);
}

#[test]
fn analyze_reports_missing_case() {
    let (service, _) = build_service();

    match service.analyze(&id("D-missing")) {
        Err(err @ DisputeServiceError::CaseNotFound(_)) => assert!(err.is_not_found()),
        other => panic!("expected missing case, got {other:?}"),
    }
}

#[test]
fn analyze_reports_missing_customer() {
    let (service, repository) = build_service();
    let mut case = fraud_case("D-2");
    case.customer_id = CustomerId("cus-unknown".to_string());
    repository.insert_case(case);

    match service.analyze(&id("D-2")) {
        Err(DisputeServiceError::CustomerNotFound(customer)) => {
            assert_eq!(customer.0, "cus-unknown")
        }
        other => panic!("expected missing customer, got {other:?}"),
    }
    assert_eq!(repository.analysis_count(&id("D-2")), 0);
}

#[test]
fn analyze_surfaces_invalid_profiles() {
    let (service, repository) = build_service();
    repository.insert_customer(CustomerProfile {
        previous_disputes: 0,
        disputes_won: 4,
        ..repeat_disputer()
    });
    repository.insert_case(fraud_case("D-3"));

    let err = service.analyze(&id("D-3")).expect_err("profile is invalid");
    assert!(matches!(err, DisputeServiceError::InvalidInput(_)));
    assert!(!err.is_not_found());
}

#[test]
fn batch_skips_failures_and_keeps_input_order() {
    let (service, repository) = build_service();
    repository.insert_case(fraud_case("D-10"));
    repository.insert_case(processing_case("D-12"));

    let decisions = service.analyze_batch(&[id("D-10"), id("D-11"), id("D-12")]);

    let ids: Vec<&str> = decisions
        .iter()
        .map(|decision| decision.dispute_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["D-10", "D-12"]);
}

#[test]
fn large_batch_preserves_order() {
    let (service, repository) = build_service();
    let ids: Vec<DisputeId> = (0..40)
        .rev()
        .map(|n| {
            let case = if n % 2 == 0 {
                fraud_case(&format!("D-{n:03}"))
            } else {
                processing_case(&format!("D-{n:03}"))
            };
            repository.insert_case(case);
            id(&format!("D-{n:03}"))
        })
        .collect();

    let decisions = service.analyze_batch(&ids);

    let analysed: Vec<DisputeId> = decisions
        .into_iter()
        .map(|decision| decision.dispute_id)
        .collect();
    assert_eq!(analysed, ids);
}

#[test]
fn category_batch_only_touches_that_category() {
    let (service, repository) = build_service();
    repository.insert_case(fraud_case("D-20"));
    repository.insert_case(ring_case("D-21"));
    repository.insert_case(fraud_case("D-22"));
    repository.insert_case(processing_case("D-23"));

    let decisions = service
        .analyze_category(DisputeCategory::FraudUnauthorized, 2)
        .expect("category batch succeeds");

    assert_eq!(decisions.len(), 2);
    assert!(decisions
        .iter()
        .all(|decision| decision.category == DisputeCategory::FraudUnauthorized));
    assert_eq!(decisions[0].dispute_id, id("D-20"));
    assert_eq!(decisions[1].recommendation(), Recommendation::Reject);
    assert_eq!(repository.analysis_count(&id("D-23")), 0);
}

#[test]
fn latest_analysis_distinguishes_unanalysed_from_unknown() {
    let (service, repository) = build_service();
    repository.insert_case(processing_case("D-30"));

    assert!(service
        .latest_analysis(&id("D-30"))
        .expect("case exists")
        .is_none());
    assert!(matches!(
        service.latest_analysis(&id("D-31")),
        Err(DisputeServiceError::CaseNotFound(_))
    ));
}

#[test]
fn reanalysis_replaces_the_latest_record() {
    let (service, repository) = build_service();
    repository.insert_case(fraud_case("D-40"));
    service.analyze(&id("D-40")).expect("first run");

    repository.insert_customer(CustomerProfile::new(CustomerId("cus-repeat".to_string())));
    service.analyze(&id("D-40")).expect("second run");

    let latest = service
        .latest_analysis(&id("D-40"))
        .expect("lookup succeeds")
        .expect("recorded");
    assert_eq!(repository.analysis_count(&id("D-40")), 2);
    assert_eq!(latest.decision.recommendation(), Recommendation::Approve);
}

#[test]
fn repository_outage_is_not_a_missing_record() {
    let service = DisputeAnalysisService::with_engine(Arc::new(UnavailableRepository), engine());

    let err = service.analyze(&id("D-50")).expect_err("repository offline");
    assert!(matches!(
        err,
        DisputeServiceError::Repository(RepositoryError::Unavailable(_))
    ));
    assert!(!err.is_not_found());

    assert!(service.analyze_batch(&[id("D-50"), id("D-51")]).is_empty());
    assert!(service
        .analyze_category(DisputeCategory::ProcessingIssues, 10)
        .is_err());
}
