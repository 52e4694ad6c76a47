//! Chargeback dispute triage: scoring, recommendation, and decision synthesis.
//!
//! Cases and customer profiles come in through a [`DisputeRepository`]; the [`RiskEngine`]
//! turns each pair into an [`AgentDecision`] without touching any other state.

pub mod assessment;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use assessment::{
    AgentDecision, AssessmentConfig, AssessmentConfigError, CategoryAssessment, ConfidenceSource,
    Recommendation, RiskAssessment, RiskEngine, SeededConfidence, SubScores, ThreadRngConfidence,
};
pub use domain::{
    AccountLinks, CustomerId, CustomerProfile, DisputeCase, DisputeCategory, DisputeId,
    FulfillmentFlag, FulfillmentStatus, LinkageCounts,
};
pub use repository::{AnalysisRecord, AnalysisSummaryView, DisputeRepository, RepositoryError};
pub use router::{dispute_router, BatchRequest};
pub use service::{DisputeAnalysisService, DisputeServiceError};
pub use validation::ValidationError;
