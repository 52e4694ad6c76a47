//! End-to-end dispute analysis through the public service facade and HTTP router.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chargeback_ai::workflows::disputes::{
        AnalysisRecord, AssessmentConfig, CustomerId, CustomerProfile, DisputeAnalysisService,
        DisputeCase, DisputeCategory, DisputeId, DisputeRepository, RepositoryError, RiskEngine,
        SeededConfidence,
    };

    pub(super) const SEED: u64 = 20_240_611;

    pub(super) fn case(id: &str, customer: &str, category: DisputeCategory) -> DisputeCase {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "customer_id": customer,
            "case_number": format!("CB-{id}"),
            "category": category,
            "amount": 640.0,
            "merchant_name": "Harbour Outfitters",
            "merchant_category": "Electronics",
            "dispute_reason": "Item not received",
            "evidence_count": 1,
            "linkage": { "same_card_orders": 7, "same_address_orders": 5 },
            "fulfillment": { "item_shipped": "Y", "item_delivered": "N" }
        }))
        .expect("case fixture is valid")
    }

    pub(super) fn customer(id: &str) -> CustomerProfile {
        CustomerProfile {
            credit_score: 720,
            previous_disputes: 1,
            disputes_won: 1,
            dispute_percentage: 1.5,
            total_purchase_amount: 8_400.0,
            ..CustomerProfile::new(CustomerId(id.to_string()))
        }
    }

    pub(super) fn service(
        repository: Arc<Repository>,
        seed: u64,
    ) -> DisputeAnalysisService<Repository> {
        let engine = RiskEngine::with_confidence_source(
            AssessmentConfig::default(),
            Arc::new(SeededConfidence::new(seed)),
        )
        .expect("default config is valid");
        DisputeAnalysisService::with_engine(repository, engine)
    }

    #[derive(Default)]
    pub(super) struct Repository {
        cases: Mutex<HashMap<DisputeId, DisputeCase>>,
        customers: Mutex<HashMap<CustomerId, CustomerProfile>>,
        analyses: Mutex<Vec<AnalysisRecord>>,
    }

    impl Repository {
        pub(super) fn with(cases: Vec<DisputeCase>, customers: Vec<CustomerProfile>) -> Self {
            let repository = Self::default();
            {
                let mut guard = repository.cases.lock().expect("case mutex poisoned");
                for case in cases {
                    guard.insert(case.id.clone(), case);
                }
            }
            {
                let mut guard = repository
                    .customers
                    .lock()
                    .expect("customer mutex poisoned");
                for customer in customers {
                    guard.insert(customer.id.clone(), customer);
                }
            }
            repository
        }
    }

    impl DisputeRepository for Repository {
        fn fetch_case(&self, id: &DisputeId) -> Result<Option<DisputeCase>, RepositoryError> {
            Ok(self.cases.lock().expect("case mutex poisoned").get(id).cloned())
        }

        fn fetch_customer(
            &self,
            id: &CustomerId,
        ) -> Result<Option<CustomerProfile>, RepositoryError> {
            Ok(self
                .customers
                .lock()
                .expect("customer mutex poisoned")
                .get(id)
                .cloned())
        }

        fn cases_in_category(
            &self,
            category: DisputeCategory,
            limit: usize,
        ) -> Result<Vec<DisputeCase>, RepositoryError> {
            let guard = self.cases.lock().expect("case mutex poisoned");
            let mut cases: Vec<DisputeCase> = guard
                .values()
                .filter(|case| case.category == category)
                .cloned()
                .collect();
            cases.sort_by(|a, b| a.id.0.cmp(&b.id.0));
            cases.truncate(limit);
            Ok(cases)
        }

        fn record_analysis(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
            self.analyses
                .lock()
                .expect("analysis mutex poisoned")
                .push(record);
            Ok(())
        }

        fn latest_analysis(
            &self,
            id: &DisputeId,
        ) -> Result<Option<AnalysisRecord>, RepositoryError> {
            Ok(self
                .analyses
                .lock()
                .expect("analysis mutex poisoned")
                .iter()
                .rev()
                .find(|record| &record.decision.dispute_id == id)
                .cloned())
        }
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chargeback_ai::workflows::disputes::{
    dispute_router, CategoryAssessment, DisputeCategory, DisputeId, Recommendation,
};
use common::*;
use tower::ServiceExt;

#[test]
fn merchant_dispute_with_shipping_gap_goes_to_review() {
    let repository = Arc::new(Repository::with(
        vec![case("M-1", "cus-7", DisputeCategory::MerchantMerchandise)],
        vec![customer("cus-7")],
    ));
    let service = service(repository, SEED);

    let decision = service
        .analyze(&DisputeId("M-1".to_string()))
        .expect("analysis succeeds");

    // amount 5, history 4, merchant 1.75, reason 1.5, evidence 5, legitimacy 26, abuse 3.6
    assert_eq!(decision.risk_score(), 47);
    assert_eq!(decision.recommendation(), Recommendation::Review);
    assert!((70..=85).contains(&decision.assessment.confidence));

    match &decision.category_assessment {
        CategoryAssessment::Merchant(findings) => {
            assert_eq!(findings.policy_compliance_score, 65);
            assert!(findings.policy_compliant);
            assert_eq!(
                findings.evidence_requirements,
                vec!["delivery_confirmation", "tracking_number", "shipping_receipt"]
            );
            assert!(!findings.escalation_needed);
        }
        other => panic!("expected merchant findings, got {other:?}"),
    }
}

#[test]
fn same_seed_reproduces_confidence() {
    let build = || {
        Arc::new(Repository::with(
            vec![
                case("F-1", "cus-1", DisputeCategory::FraudUnauthorized),
                case("F-2", "cus-1", DisputeCategory::FraudUnauthorized),
            ],
            vec![customer("cus-1")],
        ))
    };

    let ids = [DisputeId("F-1".to_string()), DisputeId("F-2".to_string())];
    let first: Vec<u8> = ids
        .iter()
        .map(|id| {
            service(build(), SEED)
                .analyze(id)
                .expect("analysis succeeds")
                .assessment
                .confidence
        })
        .collect();
    let second: Vec<u8> = ids
        .iter()
        .map(|id| {
            service(build(), SEED)
                .analyze(id)
                .expect("analysis succeeds")
                .assessment
                .confidence
        })
        .collect();

    assert_eq!(first, second);
}

#[test]
fn batch_keeps_relative_order_of_successful_cases() {
    let repository = Arc::new(Repository::with(
        vec![
            case("B-1", "cus-1", DisputeCategory::ProcessingIssues),
            case("B-3", "cus-1", DisputeCategory::MerchantMerchandise),
        ],
        vec![customer("cus-1")],
    ));
    let service = service(repository, SEED);

    let decisions = service.analyze_batch(&[
        DisputeId("B-1".to_string()),
        DisputeId("B-2".to_string()),
        DisputeId("B-3".to_string()),
    ]);

    let ids: Vec<&str> = decisions.iter().map(|d| d.dispute_id.0.as_str()).collect();
    assert_eq!(ids, ["B-1", "B-3"]);
}

#[tokio::test]
async fn router_serves_analysis_then_lookup() {
    let repository = Arc::new(Repository::with(
        vec![case("R-1", "cus-1", DisputeCategory::Unknown)],
        vec![customer("cus-1")],
    ));
    let router = dispute_router(Arc::new(service(repository, SEED)));

    let analyzed = router
        .clone()
        .oneshot(
            Request::post("/api/v1/disputes/R-1/analyze")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(analyzed.status(), StatusCode::OK);

    let lookup = router
        .oneshot(
            Request::get("/api/v1/disputes/R-1/analysis")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(lookup.status(), StatusCode::OK);

    let body = axum::body::to_bytes(lookup.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["category"], serde_json::json!("UNKNOWN"));
    assert_eq!(payload["escalation_needed"], serde_json::json!(false));
}
