use chargeback_ai::error::AppError;
use chargeback_ai::workflows::disputes::{
    AnalysisRecord, CustomerId, CustomerProfile, DisputeCase, DisputeCategory, DisputeId,
    DisputeRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// JSON document holding cases and the customer profiles they reference.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CaseFile {
    #[serde(default)]
    pub(crate) cases: Vec<DisputeCase>,
    #[serde(default)]
    pub(crate) customers: Vec<CustomerProfile>,
}

impl CaseFile {
    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub(crate) fn dispute_ids(&self) -> Vec<DisputeId> {
        self.cases.iter().map(|case| case.id.clone()).collect()
    }
}

/// Process-local repository. Cases keep their load order so category batches are stable.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDisputeRepository {
    cases: Arc<Mutex<Vec<DisputeCase>>>,
    customers: Arc<Mutex<HashMap<CustomerId, CustomerProfile>>>,
    analyses: Arc<Mutex<HashMap<DisputeId, AnalysisRecord>>>,
}

impl InMemoryDisputeRepository {
    pub(crate) fn from_case_file(file: CaseFile) -> Self {
        let customers = file
            .customers
            .into_iter()
            .map(|customer| (customer.id.clone(), customer))
            .collect();

        Self {
            cases: Arc::new(Mutex::new(file.cases)),
            customers: Arc::new(Mutex::new(customers)),
            analyses: Arc::default(),
        }
    }

    pub(crate) fn case_count(&self) -> usize {
        lock(&self.cases).map(|cases| cases.len()).unwrap_or_default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

impl DisputeRepository for InMemoryDisputeRepository {
    fn fetch_case(&self, id: &DisputeId) -> Result<Option<DisputeCase>, RepositoryError> {
        let guard = lock(&self.cases)?;
        Ok(guard.iter().find(|case| &case.id == id).cloned())
    }

    fn fetch_customer(&self, id: &CustomerId) -> Result<Option<CustomerProfile>, RepositoryError> {
        let guard = lock(&self.customers)?;
        Ok(guard.get(id).cloned())
    }

    fn cases_in_category(
        &self,
        category: DisputeCategory,
        limit: usize,
    ) -> Result<Vec<DisputeCase>, RepositoryError> {
        let guard = lock(&self.cases)?;
        Ok(guard
            .iter()
            .filter(|case| case.category == category)
            .take(limit)
            .cloned()
            .collect())
    }

    fn record_analysis(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.analyses)?;
        guard.insert(record.decision.dispute_id.clone(), record);
        Ok(())
    }

    fn latest_analysis(&self, id: &DisputeId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let guard = lock(&self.analyses)?;
        Ok(guard.get(id).cloned())
    }
}
