use serde::{Deserialize, Serialize};

use super::super::domain::DisputeCategory;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Weights applied to each factor sub-score. They must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub amount: f64,
    pub customer_history: f64,
    pub merchant: f64,
    pub reason: f64,
    pub evidence: f64,
    pub legitimacy: f64,
    pub abuse: f64,
}

impl FactorWeights {
    fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("amount", self.amount),
            ("customer_history", self.customer_history),
            ("merchant", self.merchant),
            ("reason", self.reason),
            ("evidence", self.evidence),
            ("legitimacy", self.legitimacy),
            ("abuse", self.abuse),
        ]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, weight)| weight).sum()
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            amount: 0.10,
            customer_history: 0.10,
            merchant: 0.05,
            reason: 0.05,
            evidence: 0.10,
            legitimacy: 0.40,
            abuse: 0.20,
        }
    }
}

/// Inclusive approve ceiling and inclusive reject floor; anything between goes to review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    pub approve_max: u8,
    pub reject_min: u8,
}

impl RecommendationThresholds {
    pub const fn new(approve_max: u8, reject_min: u8) -> Self {
        Self {
            approve_max,
            reject_min,
        }
    }
}

/// Per-category threshold table. `fallback` covers disputes without a known category and
/// encodes the flat scheme (approve below 40, review below 60, reject otherwise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryThresholds {
    pub fraud: RecommendationThresholds,
    pub processing: RecommendationThresholds,
    pub merchant: RecommendationThresholds,
    pub fallback: RecommendationThresholds,
}

impl CategoryThresholds {
    pub fn for_category(&self, category: DisputeCategory) -> RecommendationThresholds {
        match category {
            DisputeCategory::FraudUnauthorized => self.fraud,
            DisputeCategory::ProcessingIssues => self.processing,
            DisputeCategory::MerchantMerchandise => self.merchant,
            DisputeCategory::Unknown => self.fallback,
        }
    }
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            fraud: RecommendationThresholds::new(30, 70),
            processing: RecommendationThresholds::new(40, 80),
            merchant: RecommendationThresholds::new(35, 75),
            fallback: RecommendationThresholds::new(39, 60),
        }
    }
}

/// Confidence is `base + jitter` with jitter drawn from `0..=spread`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub base: u8,
    pub spread: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceBands {
    pub approve: ConfidenceBand,
    pub review: ConfidenceBand,
    pub reject: ConfidenceBand,
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self {
            approve: ConfidenceBand {
                base: 85,
                spread: 10,
            },
            review: ConfidenceBand {
                base: 70,
                spread: 15,
            },
            reject: ConfidenceBand {
                base: 60,
                spread: 20,
            },
        }
    }
}

/// Score cut-offs used by the category-specific findings. Comparisons are strict (`>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationPolicy {
    pub fraud_escalation_score: u8,
    pub law_enforcement_score: u8,
    pub high_priority_score: u8,
    pub technical_liability_score: u8,
    pub processor_notification_score: u8,
    pub processing_escalation_score: u8,
    pub merchant_escalation_score: u8,
    pub policy_compliance_floor: u8,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            fraud_escalation_score: 80,
            law_enforcement_score: 85,
            high_priority_score: 70,
            technical_liability_score: 60,
            processor_notification_score: 50,
            processing_escalation_score: 80,
            merchant_escalation_score: 70,
            policy_compliance_floor: 60,
        }
    }
}

/// Base resolution time per category before the recommendation multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionHours {
    pub fraud: u32,
    pub processing: u32,
    pub merchant: u32,
    pub default: u32,
}

impl ResolutionHours {
    pub fn base_for(&self, category: DisputeCategory) -> u32 {
        match category {
            DisputeCategory::FraudUnauthorized => self.fraud,
            DisputeCategory::ProcessingIssues => self.processing,
            DisputeCategory::MerchantMerchandise => self.merchant,
            DisputeCategory::Unknown => self.default,
        }
    }
}

impl Default for ResolutionHours {
    fn default() -> Self {
        Self {
            fraud: 24,
            processing: 72,
            merchant: 120,
            default: 96,
        }
    }
}

/// Immutable tuning injected into the engine. `Default` carries the production constants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    pub weights: FactorWeights,
    pub thresholds: CategoryThresholds,
    pub confidence: ConfidenceBands,
    pub escalation: EscalationPolicy,
    pub resolution: ResolutionHours,
}

impl AssessmentConfig {
    pub fn validate(&self) -> Result<(), AssessmentConfigError> {
        for (factor, weight) in self.weights.entries() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AssessmentConfigError::InvalidWeight { factor, weight });
            }
        }

        let total = self.weights.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(AssessmentConfigError::WeightsDoNotSumToOne(total));
        }

        let table = [
            ("fraud", self.thresholds.fraud),
            ("processing", self.thresholds.processing),
            ("merchant", self.thresholds.merchant),
            ("fallback", self.thresholds.fallback),
        ];
        for (category, thresholds) in table {
            if thresholds.approve_max >= thresholds.reject_min || thresholds.reject_min > 100 {
                return Err(AssessmentConfigError::InvalidThresholds {
                    category,
                    approve_max: thresholds.approve_max,
                    reject_min: thresholds.reject_min,
                });
            }
        }

        let bands = [
            self.confidence.approve,
            self.confidence.review,
            self.confidence.reject,
        ];
        if bands
            .iter()
            .any(|band| u16::from(band.base) + u16::from(band.spread) > 100)
        {
            return Err(AssessmentConfigError::ConfidenceOutOfRange);
        }

        let resolution = &self.resolution;
        if [
            resolution.fraud,
            resolution.processing,
            resolution.merchant,
            resolution.default,
        ]
        .contains(&0)
        {
            return Err(AssessmentConfigError::ZeroResolutionHours);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentConfigError {
    #[error("weight for `{factor}` must be finite and non-negative (found {weight})")]
    InvalidWeight { factor: &'static str, weight: f64 },
    #[error("factor weights must sum to 1.0 (found {0:.6})")]
    WeightsDoNotSumToOne(f64),
    #[error(
        "{category} thresholds invalid: approve <= {approve_max} must sit below reject >= {reject_min} (max 100)"
    )]
    InvalidThresholds {
        category: &'static str,
        approve_max: u8,
        reject_min: u8,
    },
    #[error("confidence bands must stay within 0..=100")]
    ConfidenceOutOfRange,
    #[error("base resolution hours must be positive")]
    ZeroResolutionHours,
}
