use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assessment::{AgentDecision, Recommendation};
use super::domain::{CustomerId, CustomerProfile, DisputeCase, DisputeCategory, DisputeId};

/// Persisted outcome of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub decision: AgentDecision,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn summary_view(&self) -> AnalysisSummaryView {
        let decision = &self.decision;
        AnalysisSummaryView {
            dispute_id: decision.dispute_id.clone(),
            category: decision.category,
            recommendation: decision.recommendation(),
            risk_score: decision.risk_score(),
            confidence: decision.assessment.confidence,
            estimated_resolution_hours: decision.estimated_resolution_hours,
            escalation_needed: decision.category_assessment.escalation_needed(),
            reasoning: decision.reasoning.clone(),
            analyzed_at: self.analyzed_at,
        }
    }
}

/// Data repository contract. The engine never reaches past it.
pub trait DisputeRepository: Send + Sync {
    fn fetch_case(&self, id: &DisputeId) -> Result<Option<DisputeCase>, RepositoryError>;
    fn fetch_customer(&self, id: &CustomerId) -> Result<Option<CustomerProfile>, RepositoryError>;
    fn cases_in_category(
        &self,
        category: DisputeCategory,
        limit: usize,
    ) -> Result<Vec<DisputeCase>, RepositoryError>;
    fn record_analysis(&self, record: AnalysisRecord) -> Result<(), RepositoryError>;
    fn latest_analysis(&self, id: &DisputeId) -> Result<Option<AnalysisRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Compact view of the latest analysis for queue listings.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummaryView {
    pub dispute_id: DisputeId,
    pub category: DisputeCategory,
    pub recommendation: Recommendation,
    pub risk_score: u8,
    pub confidence: u8,
    pub estimated_resolution_hours: u32,
    pub escalation_needed: bool,
    pub reasoning: String,
    pub analyzed_at: DateTime<Utc>,
}
