use std::sync::Arc;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::assessment::{AgentDecision, AssessmentConfig, AssessmentConfigError, RiskEngine};
use super::domain::{CustomerId, DisputeCase, DisputeCategory, DisputeId};
use super::repository::{AnalysisRecord, DisputeRepository, RepositoryError};
use super::validation::ValidationError;

/// Service resolving cases through the repository and running them through the engine.
pub struct DisputeAnalysisService<R> {
    repository: Arc<R>,
    engine: Arc<RiskEngine>,
}

impl<R> DisputeAnalysisService<R>
where
    R: DisputeRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        config: AssessmentConfig,
    ) -> Result<Self, AssessmentConfigError> {
        let engine = RiskEngine::new(config)?;
        Ok(Self::with_engine(repository, engine))
    }

    pub fn with_engine(repository: Arc<R>, engine: RiskEngine) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    /// Analyse one dispute and record the outcome.
    pub fn analyze(&self, dispute_id: &DisputeId) -> Result<AgentDecision, DisputeServiceError> {
        info!(dispute_id = %dispute_id, "starting dispute analysis");

        let case = self
            .repository
            .fetch_case(dispute_id)?
            .ok_or_else(|| DisputeServiceError::CaseNotFound(dispute_id.clone()))?;

        self.analyze_case(&case)
    }

    /// Analyse many disputes in parallel. Failed cases are logged and left out; the output keeps
    /// the relative order of the inputs that succeeded.
    pub fn analyze_batch(&self, dispute_ids: &[DisputeId]) -> Vec<AgentDecision> {
        let decisions: Vec<AgentDecision> = dispute_ids
            .par_iter()
            .filter_map(|dispute_id| match self.analyze(dispute_id) {
                Ok(decision) => Some(decision),
                Err(err) => {
                    warn!(dispute_id = %dispute_id, error = %err, "skipping dispute in batch");
                    None
                }
            })
            .collect();

        info!(
            requested = dispute_ids.len(),
            analysed = decisions.len(),
            "batch analysis complete"
        );
        decisions
    }

    /// Batch over the repository's open cases in one category.
    pub fn analyze_category(
        &self,
        category: DisputeCategory,
        limit: usize,
    ) -> Result<Vec<AgentDecision>, DisputeServiceError> {
        let cases = self.repository.cases_in_category(category, limit)?;
        debug!(%category, count = cases.len(), "loaded cases for category batch");

        let decisions = cases
            .par_iter()
            .filter_map(|case| match self.analyze_case(case) {
                Ok(decision) => Some(decision),
                Err(err) => {
                    warn!(dispute_id = %case.id, error = %err, "skipping dispute in batch");
                    None
                }
            })
            .collect();
        Ok(decisions)
    }

    /// Most recent recorded analysis, `None` when the case exists but was never analysed.
    pub fn latest_analysis(
        &self,
        dispute_id: &DisputeId,
    ) -> Result<Option<AnalysisRecord>, DisputeServiceError> {
        if let Some(record) = self.repository.latest_analysis(dispute_id)? {
            return Ok(Some(record));
        }

        match self.repository.fetch_case(dispute_id)? {
            Some(_) => Ok(None),
            None => Err(DisputeServiceError::CaseNotFound(dispute_id.clone())),
        }
    }

    fn analyze_case(&self, case: &DisputeCase) -> Result<AgentDecision, DisputeServiceError> {
        let customer = self
            .repository
            .fetch_customer(&case.customer_id)?
            .ok_or_else(|| DisputeServiceError::CustomerNotFound(case.customer_id.clone()))?;

        let decision = self.engine.analyze(case, &customer)?;

        self.repository.record_analysis(AnalysisRecord {
            decision: decision.clone(),
            analyzed_at: Utc::now(),
        })?;

        info!(
            dispute_id = %decision.dispute_id,
            score = decision.risk_score(),
            recommendation = %decision.recommendation(),
            "dispute analysis complete"
        );
        Ok(decision)
    }
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum DisputeServiceError {
    #[error("dispute {0} not found")]
    CaseNotFound(DisputeId),
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DisputeServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DisputeServiceError::CaseNotFound(_)
                | DisputeServiceError::CustomerNotFound(_)
                | DisputeServiceError::Repository(RepositoryError::NotFound)
        )
    }
}
