use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::disputes::assessment::{
    AssessmentConfig, ConfidenceSource, RiskEngine,
};
use crate::workflows::disputes::domain::{
    AccountLinks, CustomerId, CustomerProfile, DisputeCase, DisputeCategory, DisputeId,
    FulfillmentFlag, FulfillmentStatus, LinkageCounts,
};
use crate::workflows::disputes::repository::{
    AnalysisRecord, DisputeRepository, RepositoryError,
};
use crate::workflows::disputes::{dispute_router, DisputeAnalysisService};

/// Always answers with the same jitter, clamped into the requested range.
pub(super) struct FixedConfidence(pub(super) u8);

impl ConfidenceSource for FixedConfidence {
    fn next(&self, lo: u8, hi: u8) -> u8 {
        self.0.clamp(lo, hi)
    }
}

pub(super) fn engine() -> RiskEngine {
    engine_with(AssessmentConfig::default())
}

pub(super) fn engine_with(config: AssessmentConfig) -> RiskEngine {
    RiskEngine::with_confidence_source(config, Arc::new(FixedConfidence(0)))
        .expect("test config is valid")
}

/// Unlinked fraud claim on a mid-sized electronics purchase.
pub(super) fn fraud_case(id: &str) -> DisputeCase {
    DisputeCase {
        id: DisputeId(id.to_string()),
        customer_id: CustomerId("cus-repeat".to_string()),
        case_number: format!("CB-{id}"),
        category: DisputeCategory::FraudUnauthorized,
        amount: 1250.0,
        merchant_name: "Shenzhen Digital Mall".to_string(),
        merchant_category: "电子产品".to_string(),
        dispute_reason: "未成授权交易".to_string(),
        description: String::new(),
        reason_code: None,
        card_network: Some("Visa".to_string()),
        evidence_count: 0,
        linkage: LinkageCounts::default(),
        fulfillment: FulfillmentStatus::default(),
    }
}

/// Customer who has won every dispute filed so far.
pub(super) fn repeat_disputer() -> CustomerProfile {
    CustomerProfile {
        credit_score: 580,
        previous_disputes: 3,
        disputes_won: 3,
        dispute_percentage: 6.0,
        ..CustomerProfile::new(CustomerId("cus-repeat".to_string()))
    }
}

/// Duplicate-charge complaint from a customer with a long order history.
pub(super) fn processing_case(id: &str) -> DisputeCase {
    DisputeCase {
        id: DisputeId(id.to_string()),
        customer_id: CustomerId("cus-loyal".to_string()),
        case_number: format!("CB-{id}"),
        category: DisputeCategory::ProcessingIssues,
        amount: 80.0,
        merchant_name: "StreamBox".to_string(),
        merchant_category: "Online Services".to_string(),
        dispute_reason: "Duplicate Charge".to_string(),
        description: "Charged twice for the same renewal".to_string(),
        reason_code: Some("12.6".to_string()),
        card_network: Some("Visa".to_string()),
        evidence_count: 2,
        linkage: LinkageCounts {
            same_card_orders: 20,
            same_address_orders: 10,
            same_ip_orders: 5,
            same_device_orders: 0,
        },
        fulfillment: FulfillmentStatus {
            item_shipped: FulfillmentFlag::Unknown,
            item_delivered: FulfillmentFlag::Yes,
            digital_goods: FulfillmentFlag::No,
        },
    }
}

pub(super) fn loyal_customer() -> CustomerProfile {
    CustomerProfile::new(CustomerId("cus-loyal".to_string()))
}

/// Large luxury-goods fraud claim on credentials with plenty of prior orders.
pub(super) fn ring_case(id: &str) -> DisputeCase {
    DisputeCase {
        id: DisputeId(id.to_string()),
        customer_id: CustomerId("cus-ring".to_string()),
        case_number: format!("CB-{id}"),
        category: DisputeCategory::FraudUnauthorized,
        amount: 5000.0,
        merchant_name: "Maison Lumiere".to_string(),
        merchant_category: "Luxury Goods".to_string(),
        dispute_reason: "Identity Theft".to_string(),
        description: "Customer denies placing the order".to_string(),
        reason_code: Some("10.4".to_string()),
        card_network: Some("Mastercard".to_string()),
        evidence_count: 0,
        linkage: LinkageCounts {
            same_card_orders: 12,
            same_address_orders: 6,
            same_ip_orders: 4,
            same_device_orders: 0,
        },
        fulfillment: FulfillmentStatus {
            item_shipped: FulfillmentFlag::Yes,
            item_delivered: FulfillmentFlag::Yes,
            digital_goods: FulfillmentFlag::Yes,
        },
    }
}

pub(super) fn ring_customer() -> CustomerProfile {
    CustomerProfile {
        credit_score: 500,
        previous_disputes: 8,
        disputes_won: 8,
        dispute_percentage: 12.0,
        total_purchase_amount: 1_000_000.0,
        linked_customer_count: 4,
        linked_customer_dispute_rate: 9.0,
        linked_accounts: AccountLinks {
            by_device: 1,
            by_ip: 2,
            by_card: 1,
            by_address: 3,
        },
        ..CustomerProfile::new(CustomerId("cus-ring".to_string()))
    }
}

pub(super) fn build_service() -> (
    DisputeAnalysisService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    repository.insert_customer(repeat_disputer());
    repository.insert_customer(loyal_customer());
    repository.insert_customer(ring_customer());
    let service = DisputeAnalysisService::with_engine(repository.clone(), engine());
    (service, repository)
}

pub(super) fn dispute_router_with_service(
    service: DisputeAnalysisService<MemoryRepository>,
) -> axum::Router {
    dispute_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    cases: Arc<Mutex<HashMap<DisputeId, DisputeCase>>>,
    customers: Arc<Mutex<HashMap<CustomerId, CustomerProfile>>>,
    analyses: Arc<Mutex<HashMap<DisputeId, Vec<AnalysisRecord>>>>,
}

impl MemoryRepository {
    pub(super) fn insert_case(&self, case: DisputeCase) {
        self.cases
            .lock()
            .expect("case mutex poisoned")
            .insert(case.id.clone(), case);
    }

    pub(super) fn insert_customer(&self, customer: CustomerProfile) {
        self.customers
            .lock()
            .expect("customer mutex poisoned")
            .insert(customer.id.clone(), customer);
    }

    pub(super) fn analysis_count(&self, id: &DisputeId) -> usize {
        self.analyses
            .lock()
            .expect("analysis mutex poisoned")
            .get(id)
            .map(Vec::len)
            .unwrap_or_default()
    }
}

impl DisputeRepository for MemoryRepository {
    fn fetch_case(&self, id: &DisputeId) -> Result<Option<DisputeCase>, RepositoryError> {
        let guard = self.cases.lock().expect("case mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn fetch_customer(&self, id: &CustomerId) -> Result<Option<CustomerProfile>, RepositoryError> {
        let guard = self.customers.lock().expect("customer mutex poisoned");
        Ok(guard.get(id).cloned())
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
        let mut guard = self.analyses.lock().expect("analysis mutex poisoned");
        guard
            .entry(record.decision.dispute_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    fn latest_analysis(&self, id: &DisputeId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let guard = self.analyses.lock().expect("analysis mutex poisoned");
        Ok(guard.get(id).and_then(|records| records.last().cloned()))
    }
}

pub(super) struct UnavailableRepository;

impl DisputeRepository for UnavailableRepository {
    fn fetch_case(&self, _id: &DisputeId) -> Result<Option<DisputeCase>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_customer(
        &self,
        _id: &CustomerId,
    ) -> Result<Option<CustomerProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn cases_in_category(
        &self,
        _category: DisputeCategory,
        _limit: usize,
    ) -> Result<Vec<DisputeCase>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_analysis(&self, _record: AnalysisRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_analysis(
        &self,
        _id: &DisputeId,
    ) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
