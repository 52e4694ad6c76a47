use serde::{Deserialize, Serialize};

use super::super::domain::{DisputeCase, DisputeCategory};
use super::classifier::Recommendation;
use super::config::{AssessmentConfig, EscalationPolicy};
use super::processing::{ProcessingErrorKind, TechnicalAssessment};
use super::RiskAssessment;

const FRAUD_EVIDENCE: &[&str] = &[
    "transaction_logs",
    "customer_authentication",
    "fraud_indicators",
];
const PROCESSING_EVIDENCE: &[&str] = &["system_logs", "authorization_records", "settlement_data"];
const GENERAL_EVIDENCE: &[&str] = &[
    "transaction_receipt",
    "customer_communication",
    "merchant_terms",
];

/// Merchant evidence keyed by a keyword in the dispute reason, first match wins.
const MERCHANT_EVIDENCE: &[(&str, &[&str])] = &[
    (
        "not received",
        &["delivery_confirmation", "tracking_number", "shipping_receipt"],
    ),
    (
        "cancelled",
        &[
            "cancellation_policy",
            "cancellation_request",
            "refund_processing",
        ],
    ),
    (
        "defective",
        &[
            "product_description",
            "quality_control_records",
            "return_policy",
        ],
    ),
    (
        "unauthorized",
        &[
            "authorization_logs",
            "customer_verification",
            "fraud_analysis",
        ],
    ),
];

const POLICY_BASELINE: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyIssue {
    SubscriptionCancellationDifficulty,
    DeliveryFulfillmentIssue,
    RefundProcessingDelay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudFindings {
    pub fraud_probability: u8,
    pub investigation_priority: InvestigationPriority,
    pub law_enforcement_flag: bool,
    pub customer_verification_required: bool,
    pub evidence_requirements: Vec<String>,
    pub escalation_needed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingFindings {
    pub technical_liability: bool,
    pub system_responsibility: bool,
    pub processor_notification_needed: bool,
    pub error_kind: ProcessingErrorKind,
    pub recommended_action: String,
    pub evidence_requirements: Vec<String>,
    pub escalation_needed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantFindings {
    pub merchant_liability_score: u8,
    pub policy_compliance_score: u8,
    pub policy_compliant: bool,
    pub policy_issues: Vec<PolicyIssue>,
    pub evidence_requirements: Vec<String>,
    pub escalation_needed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralFindings {
    pub evidence_requirements: Vec<String>,
    pub escalation_needed: bool,
}

/// Category-specific findings attached to every decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryAssessment {
    Fraud(FraudFindings),
    Processing(ProcessingFindings),
    Merchant(MerchantFindings),
    General(GeneralFindings),
}

impl CategoryAssessment {
    pub fn escalation_needed(&self) -> bool {
        match self {
            CategoryAssessment::Fraud(findings) => findings.escalation_needed,
            CategoryAssessment::Processing(findings) => findings.escalation_needed,
            CategoryAssessment::Merchant(findings) => findings.escalation_needed,
            CategoryAssessment::General(findings) => findings.escalation_needed,
        }
    }

    pub fn law_enforcement_flag(&self) -> bool {
        matches!(self, CategoryAssessment::Fraud(findings) if findings.law_enforcement_flag)
    }

    pub fn technical_liability(&self) -> bool {
        matches!(self, CategoryAssessment::Processing(findings) if findings.technical_liability)
    }

    pub fn evidence_requirements(&self) -> &[String] {
        match self {
            CategoryAssessment::Fraud(findings) => &findings.evidence_requirements,
            CategoryAssessment::Processing(findings) => &findings.evidence_requirements,
            CategoryAssessment::Merchant(findings) => &findings.evidence_requirements,
            CategoryAssessment::General(findings) => &findings.evidence_requirements,
        }
    }
}

/// Everything the synthesizer derives from a finished risk assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub required_actions: Vec<String>,
    pub estimated_resolution_hours: u32,
    pub reasoning: String,
    pub category_assessment: CategoryAssessment,
}

pub struct DecisionSynthesizer<'a> {
    config: &'a AssessmentConfig,
}

impl<'a> DecisionSynthesizer<'a> {
    pub fn new(config: &'a AssessmentConfig) -> Self {
        Self { config }
    }

    pub fn synthesize(
        &self,
        case: &DisputeCase,
        assessment: &RiskAssessment,
        technical: &TechnicalAssessment,
    ) -> Synthesis {
        let category_assessment = self.category_assessment(case, assessment, technical);
        let required_actions = required_actions(assessment.recommendation, &category_assessment);
        let estimated_resolution_hours =
            self.resolution_hours(case.category, assessment.recommendation);
        let reasoning = reasoning(case, assessment);

        Synthesis {
            required_actions,
            estimated_resolution_hours,
            reasoning,
            category_assessment,
        }
    }

    pub fn category_assessment(
        &self,
        case: &DisputeCase,
        assessment: &RiskAssessment,
        technical: &TechnicalAssessment,
    ) -> CategoryAssessment {
        let policy: &EscalationPolicy = &self.config.escalation;
        let score = assessment.score;
        let sub_scores = &assessment.sub_scores;

        match case.category {
            DisputeCategory::FraudUnauthorized => CategoryAssessment::Fraud(FraudFindings {
                fraud_probability: sub_scores.fraud,
                investigation_priority: if score > policy.high_priority_score {
                    InvestigationPriority::High
                } else {
                    InvestigationPriority::Medium
                },
                law_enforcement_flag: score > policy.law_enforcement_score,
                customer_verification_required: true,
                evidence_requirements: owned(FRAUD_EVIDENCE),
                escalation_needed: score > policy.fraud_escalation_score,
            }),
            DisputeCategory::ProcessingIssues => {
                CategoryAssessment::Processing(ProcessingFindings {
                    technical_liability: sub_scores.processing > policy.technical_liability_score,
                    system_responsibility: technical.technical_score
                        > policy.technical_liability_score,
                    processor_notification_needed: score > policy.processor_notification_score,
                    error_kind: technical.error_kind,
                    recommended_action: technical.error_kind.recommended_action().to_string(),
                    evidence_requirements: owned(PROCESSING_EVIDENCE),
                    escalation_needed: sub_scores.processing > policy.processing_escalation_score,
                })
            }
            DisputeCategory::MerchantMerchandise => {
                let (compliance_score, policy_issues) = policy_compliance(&case.dispute_reason);
                CategoryAssessment::Merchant(MerchantFindings {
                    merchant_liability_score: sub_scores.merchant,
                    policy_compliance_score: compliance_score,
                    policy_compliant: compliance_score >= policy.policy_compliance_floor,
                    policy_issues,
                    evidence_requirements: merchant_evidence(&case.dispute_reason),
                    escalation_needed: sub_scores.merchant > policy.merchant_escalation_score,
                })
            }
            DisputeCategory::Unknown => CategoryAssessment::General(GeneralFindings {
                evidence_requirements: owned(GENERAL_EVIDENCE),
                escalation_needed: false,
            }),
        }
    }

    /// Approve halves the base, reject takes three quarters, review one and a half.
    pub fn resolution_hours(
        &self,
        category: DisputeCategory,
        recommendation: Recommendation,
    ) -> u32 {
        let base = self.config.resolution.base_for(category);
        let hours = match recommendation {
            Recommendation::Approve => base / 2,
            Recommendation::Reject => base.saturating_mul(3) / 4,
            Recommendation::Review => base.saturating_mul(3) / 2,
        };
        hours.max(1)
    }
}

pub fn required_actions(
    recommendation: Recommendation,
    category_assessment: &CategoryAssessment,
) -> Vec<String> {
    let base: [&str; 2] = match recommendation {
        Recommendation::Approve => ["Process refund to customer", "Close case with approval"],
        Recommendation::Reject => [
            "Prepare rejection documentation",
            "Notify customer of decision",
        ],
        Recommendation::Review => [
            "Assign to specialist for manual review",
            "Gather additional evidence",
        ],
    };

    let mut actions = owned(&base);
    if category_assessment.escalation_needed() {
        actions.push("Escalate to senior analyst".to_string());
    }
    if category_assessment.law_enforcement_flag() {
        actions.push("Report to fraud investigation unit".to_string());
    }
    if category_assessment.technical_liability() {
        actions.push("Initiate technical system investigation".to_string());
    }
    actions
}

pub fn reasoning(case: &DisputeCase, assessment: &RiskAssessment) -> String {
    let category = case.category.label();
    let mut reasoning = format!(
        "Analysis of {category} dispute for ${:.2}. Risk score: {}/100 ({}% confidence). ",
        case.amount, assessment.score, assessment.confidence
    );

    if !assessment.factors.is_empty() {
        let top: Vec<&str> = assessment.factors.iter().take(3).map(String::as_str).collect();
        reasoning.push_str(&format!("Supporting factors: {}. ", top.join(", ")));
    }

    if !assessment.warnings.is_empty() {
        let top: Vec<&str> = assessment.warnings.iter().take(3).map(String::as_str).collect();
        reasoning.push_str(&format!("Risk factors: {}. ", top.join(", ")));
    }

    reasoning.push_str(&format!(
        "Recommendation: {} based on {} analysis framework.",
        assessment.recommendation.label().to_uppercase(),
        category.to_lowercase()
    ));
    reasoning
}

/// Keyword reading of the dispute reason for merchant policy problems.
pub fn policy_compliance(dispute_reason: &str) -> (u8, Vec<PolicyIssue>) {
    let reason = dispute_reason.to_lowercase();
    let mut score = i32::from(POLICY_BASELINE);
    let mut issues = Vec::new();

    if reason.contains("cancelled") && reason.contains("recurring") {
        score -= 20;
        issues.push(PolicyIssue::SubscriptionCancellationDifficulty);
    }
    if reason.contains("not received") {
        score -= 15;
        issues.push(PolicyIssue::DeliveryFulfillmentIssue);
    }
    if reason.contains("refund") && reason.contains("not processed") {
        score -= 25;
        issues.push(PolicyIssue::RefundProcessingDelay);
    }

    (score.max(0) as u8, issues)
}

fn merchant_evidence(dispute_reason: &str) -> Vec<String> {
    let reason = dispute_reason.to_lowercase();
    MERCHANT_EVIDENCE
        .iter()
        .find(|(keyword, _)| reason.contains(keyword))
        .map(|(_, evidence)| owned(evidence))
        .unwrap_or_else(|| owned(GENERAL_EVIDENCE))
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
