//! Single-dimension scorers. Each maps one input onto a 0-100 risk value and never fails.

use serde::{Deserialize, Serialize};

const HIGH_RISK_MERCHANT_CATEGORIES: &[&str] =
    &["Luxury Goods", "Online Services", "Travel Services"];
const MEDIUM_RISK_MERCHANT_CATEGORIES: &[&str] = &["Electronics", "Subscription Service"];

const HIGH_RISK_REASONS: &[&str] = &["Fraudulent Transaction", "Identity Theft"];
const MEDIUM_RISK_REASONS: &[&str] = &["Unauthorized Transaction", "Duplicate Charge"];

/// Static risk tier for free-form merchant categories and dispute reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    fn classify(value: &str, high: &[&str], medium: &[&str]) -> Self {
        if high.contains(&value) {
            RiskTier::High
        } else if medium.contains(&value) {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn of_merchant_category(category: &str) -> Self {
        Self::classify(
            category,
            HIGH_RISK_MERCHANT_CATEGORIES,
            MEDIUM_RISK_MERCHANT_CATEGORIES,
        )
    }

    pub fn of_dispute_reason(reason: &str) -> Self {
        Self::classify(reason, HIGH_RISK_REASONS, MEDIUM_RISK_REASONS)
    }
}

/// Bands are closed-open: 100.00 already belongs to the 25 band.
pub fn amount_risk(amount: f64) -> u8 {
    if amount < 100.0 {
        10
    } else if amount < 500.0 {
        25
    } else if amount < 2000.0 {
        50
    } else {
        80
    }
}

/// Credit tier plus up to 30 points of dispute history. May exceed 100; the composite clamps.
pub fn customer_history_risk(credit_score: u16, previous_disputes: u32) -> u8 {
    let credit = if credit_score > 750 {
        10
    } else if credit_score > 650 {
        30
    } else {
        70
    };
    let history = previous_disputes.saturating_mul(10).min(30) as u8;
    credit + history
}

pub fn merchant_risk(merchant_category: &str) -> u8 {
    match RiskTier::of_merchant_category(merchant_category) {
        RiskTier::High => 60,
        RiskTier::Medium => 35,
        RiskTier::Low => 20,
    }
}

pub fn reason_risk(dispute_reason: &str) -> u8 {
    match RiskTier::of_dispute_reason(dispute_reason) {
        RiskTier::High => 80,
        RiskTier::Medium => 50,
        RiskTier::Low => 30,
    }
}

/// More evidence lowers the chance that the dispute is invalid.
pub fn evidence_risk(evidence_count: u32) -> u8 {
    match evidence_count {
        0 => 80,
        1 => 50,
        _ => 20,
    }
}
