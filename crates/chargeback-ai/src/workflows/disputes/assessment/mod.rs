//! Risk assessment and decision engine.
//!
//! A decision is a pure function of the case, the customer profile, and the injected
//! [`AssessmentConfig`]. The only nondeterministic input is the confidence jitter, which is
//! drawn from the engine's [`ConfidenceSource`] after every other field has been fixed.

mod abuse;
mod classifier;
mod config;
pub mod factors;
mod legitimacy;
mod processing;
mod synthesis;

pub use abuse::{abuse_score, AbuseSignals};
pub use classifier::{
    classify, confidence_for, ConfidenceSource, Recommendation, SeededConfidence,
    ThreadRngConfidence,
};
pub use config::{
    AssessmentConfig, AssessmentConfigError, CategoryThresholds, ConfidenceBand, ConfidenceBands,
    EscalationPolicy, FactorWeights, RecommendationThresholds, ResolutionHours,
};
pub use legitimacy::legitimacy_score;
pub use processing::{technical_assessment, ProcessingErrorKind, TechnicalAssessment};
pub use synthesis::{
    policy_compliance, required_actions, CategoryAssessment, DecisionSynthesizer, FraudFindings,
    GeneralFindings, InvestigationPriority, MerchantFindings, PolicyIssue, ProcessingFindings,
};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{CustomerProfile, DisputeCase, DisputeCategory, DisputeId};
use super::validation::{CaseValidator, ValidationError};

/// Weighted inputs to the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Amount,
    CustomerHistory,
    Merchant,
    Reason,
    Evidence,
    Legitimacy,
    AbusePatterns,
}

/// One weighted contribution, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: RiskFactor,
    pub score: u8,
    pub weight: f64,
    pub notes: String,
}

/// Raw 0-100 sub-scores feeding the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorScores {
    pub amount: u8,
    pub customer_history: u8,
    pub merchant: u8,
    pub reason: u8,
    pub evidence: u8,
    pub legitimacy: u8,
    pub abuse: u8,
}

impl FactorScores {
    pub fn collect(case: &DisputeCase, customer: &CustomerProfile, abuse: &AbuseSignals) -> Self {
        Self {
            amount: factors::amount_risk(case.amount),
            customer_history: factors::customer_history_risk(
                customer.credit_score,
                customer.previous_disputes,
            ),
            merchant: factors::merchant_risk(&case.merchant_category),
            reason: factors::reason_risk(&case.dispute_reason),
            evidence: factors::evidence_risk(case.evidence_count),
            legitimacy: legitimacy_score(case.category, &case.linkage, &case.fulfillment),
            abuse: abuse.score(),
        }
    }

    fn weighted(&self, weights: &FactorWeights) -> [(RiskFactor, u8, f64); 7] {
        [
            (RiskFactor::Amount, self.amount, weights.amount),
            (
                RiskFactor::CustomerHistory,
                self.customer_history,
                weights.customer_history,
            ),
            (RiskFactor::Merchant, self.merchant, weights.merchant),
            (RiskFactor::Reason, self.reason, weights.reason),
            (RiskFactor::Evidence, self.evidence, weights.evidence),
            (RiskFactor::Legitimacy, self.legitimacy, weights.legitimacy),
            (RiskFactor::AbusePatterns, self.abuse, weights.abuse),
        ]
    }
}

/// `round(sum(weight * score))`, clamped to 0..=100.
pub fn composite_score(scores: &FactorScores, weights: &FactorWeights) -> u8 {
    let total: f64 = scores
        .weighted(weights)
        .iter()
        .map(|(_, score, weight)| f64::from(*score) * weight)
        .sum();
    total.round().clamp(0.0, 100.0) as u8
}

/// Category dimension scores. The dimension matching the case category is blended with the
/// legitimacy score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub fraud: u8,
    pub processing: u8,
    pub merchant: u8,
}

impl SubScores {
    pub fn derive(
        category: DisputeCategory,
        scores: &FactorScores,
        technical: &TechnicalAssessment,
    ) -> Self {
        let fraud = mean(scores.reason, scores.abuse);
        let processing = technical.technical_score;
        let merchant = scores.merchant;

        let blend = |signal: u8| mean(signal, scores.legitimacy);
        match category {
            DisputeCategory::FraudUnauthorized => Self {
                fraud: blend(fraud),
                processing,
                merchant,
            },
            DisputeCategory::ProcessingIssues => Self {
                fraud,
                processing: blend(processing),
                merchant,
            },
            DisputeCategory::MerchantMerchandise => Self {
                fraud,
                processing,
                merchant: blend(merchant),
            },
            DisputeCategory::Unknown => Self {
                fraud,
                processing,
                merchant,
            },
        }
    }
}

fn mean(a: u8, b: u8) -> u8 {
    ((f64::from(a) + f64::from(b)) / 2.0).round().clamp(0.0, 100.0) as u8
}

/// Scored view of a dispute before the decision layer adds actions and narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub confidence: u8,
    pub recommendation: Recommendation,
    pub sub_scores: SubScores,
    pub factors: Vec<String>,
    pub warnings: Vec<String>,
    pub components: Vec<ScoreComponent>,
}

/// Final object handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDecision {
    pub dispute_id: DisputeId,
    pub category: DisputeCategory,
    pub assessment: RiskAssessment,
    pub required_actions: Vec<String>,
    pub estimated_resolution_hours: u32,
    pub reasoning: String,
    pub category_assessment: CategoryAssessment,
}

impl AgentDecision {
    pub fn recommendation(&self) -> Recommendation {
        self.assessment.recommendation
    }

    pub fn risk_score(&self) -> u8 {
        self.assessment.score
    }
}

/// Stateless engine applying an [`AssessmentConfig`] to case/customer snapshots.
pub struct RiskEngine {
    config: AssessmentConfig,
    validator: CaseValidator,
    confidence: Arc<dyn ConfidenceSource>,
}

impl RiskEngine {
    pub fn new(config: AssessmentConfig) -> Result<Self, AssessmentConfigError> {
        Self::with_confidence_source(config, Arc::new(ThreadRngConfidence))
    }

    pub fn with_confidence_source(
        config: AssessmentConfig,
        confidence: Arc<dyn ConfidenceSource>,
    ) -> Result<Self, AssessmentConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            validator: CaseValidator,
            confidence,
        })
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    pub fn assess(
        &self,
        case: &DisputeCase,
        customer: &CustomerProfile,
    ) -> Result<RiskAssessment, ValidationError> {
        self.validator.check(case, customer)?;
        let technical = technical_assessment(case.reason_code.as_deref(), &case.description);
        Ok(self.assess_validated(case, customer, &technical))
    }

    pub fn analyze(
        &self,
        case: &DisputeCase,
        customer: &CustomerProfile,
    ) -> Result<AgentDecision, ValidationError> {
        self.validator.check(case, customer)?;
        let technical = technical_assessment(case.reason_code.as_deref(), &case.description);
        let assessment = self.assess_validated(case, customer, &technical);

        let synthesis =
            DecisionSynthesizer::new(&self.config).synthesize(case, &assessment, &technical);

        Ok(AgentDecision {
            dispute_id: case.id.clone(),
            category: case.category,
            assessment,
            required_actions: synthesis.required_actions,
            estimated_resolution_hours: synthesis.estimated_resolution_hours,
            reasoning: synthesis.reasoning,
            category_assessment: synthesis.category_assessment,
        })
    }

    fn assess_validated(
        &self,
        case: &DisputeCase,
        customer: &CustomerProfile,
        technical: &TechnicalAssessment,
    ) -> RiskAssessment {
        let abuse = AbuseSignals::collect(customer, case.amount);
        let scores = FactorScores::collect(case, customer, &abuse);
        let score = composite_score(&scores, &self.config.weights);
        let thresholds = self.config.thresholds.for_category(case.category);
        let recommendation = classify(score, thresholds);
        let sub_scores = SubScores::derive(case.category, &scores, technical);

        let signals = Signals {
            case,
            customer,
            scores: &scores,
            technical,
            score,
        };
        let factors = signals.supporting_factors();
        let warnings = signals.warnings();
        let components = components(&scores, &abuse, &self.config.weights, case, customer);

        let confidence = confidence_for(
            recommendation,
            &self.config.confidence,
            self.confidence.as_ref(),
        );

        RiskAssessment {
            score,
            confidence,
            recommendation,
            sub_scores,
            factors,
            warnings,
            components,
        }
    }
}

struct Signals<'a> {
    case: &'a DisputeCase,
    customer: &'a CustomerProfile,
    scores: &'a FactorScores,
    technical: &'a TechnicalAssessment,
    score: u8,
}

impl Signals<'_> {
    fn supporting_factors(&self) -> Vec<String> {
        let case = self.case;
        let customer = self.customer;
        let loyalty_category = matches!(
            case.category,
            DisputeCategory::ProcessingIssues | DisputeCategory::MerchantMerchandise
        );

        let checks = [
            (
                customer.credit_score > 700,
                "Customer has excellent credit score",
            ),
            (
                customer.previous_disputes == 0,
                "No dispute history records",
            ),
            (case.amount < 500.0, "Dispute amount is small"),
            (self.scores.merchant < 30, "Low-risk merchant category"),
            (case.evidence_count >= 2, "Supporting evidence provided"),
            (
                loyalty_category && case.linkage.total() >= 10,
                "Established order history on linked credentials",
            ),
        ];
        labels(&checks)
    }

    fn warnings(&self) -> Vec<String> {
        let case = self.case;
        let checks = [
            (
                self.customer.previous_disputes > 2,
                "Multiple dispute history",
            ),
            (self.score > 70, "High risk score"),
            (case.amount > 2000.0, "Large transaction amount"),
            (self.scores.merchant >= 60, "High-risk merchant category"),
            (
                self.technical.technical_score > 70,
                "Technical processing error detected",
            ),
            (
                case.category == DisputeCategory::FraudUnauthorized && case.linkage.total() > 0,
                "Fraud claim on credentials with prior successful orders",
            ),
            (
                self.scores.abuse >= 40,
                "Dispute behaviour matches abuse patterns",
            ),
        ];
        labels(&checks)
    }
}

fn labels(checks: &[(bool, &str)]) -> Vec<String> {
    checks
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, label)| label.to_string())
        .collect()
}

fn components(
    scores: &FactorScores,
    abuse: &AbuseSignals,
    weights: &FactorWeights,
    case: &DisputeCase,
    customer: &CustomerProfile,
) -> Vec<ScoreComponent> {
    scores
        .weighted(weights)
        .into_iter()
        .map(|(factor, score, weight)| {
            let notes = match factor {
                RiskFactor::Amount => format!("disputed amount ${:.2}", case.amount),
                RiskFactor::CustomerHistory => format!(
                    "credit score {} with {} prior dispute(s)",
                    customer.credit_score, customer.previous_disputes
                ),
                RiskFactor::Merchant => format!(
                    "merchant category '{}' rated {:?}",
                    case.merchant_category,
                    factors::RiskTier::of_merchant_category(&case.merchant_category)
                ),
                RiskFactor::Reason => format!(
                    "dispute reason '{}' rated {:?}",
                    case.dispute_reason,
                    factors::RiskTier::of_dispute_reason(&case.dispute_reason)
                ),
                RiskFactor::Evidence => {
                    format!("{} evidence item(s) attached", case.evidence_count)
                }
                RiskFactor::Legitimacy => format!(
                    "{} linked order(s) under {} rules",
                    case.linkage.total(),
                    case.category.label()
                ),
                RiskFactor::AbusePatterns => format!(
                    "abuse signals total {} across 5 indicators",
                    abuse.sum()
                ),
            };
            ScoreComponent {
                factor,
                score,
                weight,
                notes,
            }
        })
        .collect()
}
