use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for dispute cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisputeId(pub String);

impl fmt::Display for DisputeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for customers filing disputes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-level dispute grouping used to pick thresholds and category analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeCategory {
    FraudUnauthorized,
    ProcessingIssues,
    MerchantMerchandise,
    #[default]
    Unknown,
}

impl DisputeCategory {
    pub const fn label(self) -> &'static str {
        match self {
            DisputeCategory::FraudUnauthorized => "FRAUD_UNAUTHORIZED",
            DisputeCategory::ProcessingIssues => "PROCESSING_ISSUES",
            DisputeCategory::MerchantMerchandise => "MERCHANT_MERCHANDISE",
            DisputeCategory::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for DisputeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tri-state fulfilment marker. Upstream systems send `Y`/`N` or leave it blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentFlag {
    #[serde(alias = "Y", alias = "y")]
    Yes,
    #[serde(alias = "N", alias = "n")]
    No,
    #[default]
    Unknown,
}

impl FulfillmentFlag {
    pub const fn is_yes(self) -> bool {
        matches!(self, FulfillmentFlag::Yes)
    }
}

/// Prior successful orders sharing an attribute with the disputed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkageCounts {
    pub same_card_orders: u32,
    pub same_address_orders: u32,
    pub same_ip_orders: u32,
    pub same_device_orders: u32,
}

impl LinkageCounts {
    pub fn total(&self) -> u64 {
        u64::from(self.same_card_orders)
            + u64::from(self.same_address_orders)
            + u64::from(self.same_ip_orders)
            + u64::from(self.same_device_orders)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FulfillmentStatus {
    pub item_shipped: FulfillmentFlag,
    pub item_delivered: FulfillmentFlag,
    pub digital_goods: FulfillmentFlag,
}

/// Case snapshot handed to the engine. Every field the scorers read has an explicit default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisputeCase {
    pub id: DisputeId,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub case_number: String,
    #[serde(default)]
    pub category: DisputeCategory,
    pub amount: f64,
    #[serde(default)]
    pub merchant_name: String,
    #[serde(default)]
    pub merchant_category: String,
    #[serde(default)]
    pub dispute_reason: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reason_code: Option<String>,
    #[serde(default)]
    pub card_network: Option<String>,
    #[serde(default)]
    pub evidence_count: u32,
    #[serde(default)]
    pub linkage: LinkageCounts,
    #[serde(default)]
    pub fulfillment: FulfillmentStatus,
}

pub const DEFAULT_CREDIT_SCORE: u16 = 650;

fn default_credit_score() -> u16 {
    DEFAULT_CREDIT_SCORE
}

/// Distinct other accounts sharing an attribute with this customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountLinks {
    pub by_device: u32,
    pub by_ip: u32,
    pub by_card: u32,
    pub by_address: u32,
}

impl AccountLinks {
    /// Number of linkage vectors with at least one shared account.
    pub fn active_vectors(&self) -> usize {
        [self.by_device, self.by_ip, self.by_card, self.by_address]
            .iter()
            .filter(|count| **count > 0)
            .count()
    }
}

/// Customer history consumed by the history and abuse scorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: CustomerId,
    #[serde(default = "default_credit_score")]
    pub credit_score: u16,
    #[serde(default)]
    pub previous_disputes: u32,
    #[serde(default)]
    pub disputes_won: u32,
    #[serde(default)]
    pub dispute_percentage: f64,
    #[serde(default)]
    pub total_purchase_amount: f64,
    #[serde(default)]
    pub linked_customer_count: u32,
    #[serde(default)]
    pub linked_customer_dispute_rate: f64,
    #[serde(default)]
    pub linked_accounts: AccountLinks,
}

impl CustomerProfile {
    /// Profile with no history beyond the default credit score.
    pub fn new(id: CustomerId) -> Self {
        Self {
            id,
            credit_score: DEFAULT_CREDIT_SCORE,
            previous_disputes: 0,
            disputes_won: 0,
            dispute_percentage: 0.0,
            total_purchase_amount: 0.0,
            linked_customer_count: 0,
            linked_customer_dispute_rate: 0.0,
            linked_accounts: AccountLinks::default(),
        }
    }
}
