//! Transaction legitimacy sub-model.
//!
//! The same linkage signal reads in opposite directions depending on the dispute category:
//!
//! * fraud claims: prior successful orders on the same card/address/IP/device contradict a
//!   "stolen identity" story, so more linkage means a higher score;
//! * processing and merchandise claims: linkage marks a repeat customer whose complaint is more
//!   credible, so more linkage means a lower score;
//! * anything else scores a neutral 50.

use super::super::domain::{DisputeCategory, FulfillmentStatus, LinkageCounts};

const NEUTRAL_SCORE: u8 = 50;

const FRAUD_UNLINKED_SCORE: i32 = 10;
const FRAUD_LINKED_BASE: i32 = 80;

const LOYALTY_UNLINKED_SCORE: i32 = 70;
const LOYALTY_LINKED_BASE: i32 = 90;
const LOYALTY_FLOOR: i32 = 10;

pub fn legitimacy_score(
    category: DisputeCategory,
    linkage: &LinkageCounts,
    fulfillment: &FulfillmentStatus,
) -> u8 {
    let total_linked = linkage.total();

    match category {
        DisputeCategory::FraudUnauthorized => fraud_legitimacy(total_linked, fulfillment),
        DisputeCategory::ProcessingIssues | DisputeCategory::MerchantMerchandise => {
            loyalty_legitimacy(total_linked, fulfillment)
        }
        DisputeCategory::Unknown => NEUTRAL_SCORE,
    }
}

fn fraud_legitimacy(total_linked: u64, fulfillment: &FulfillmentStatus) -> u8 {
    if total_linked == 0 {
        return FRAUD_UNLINKED_SCORE as u8;
    }

    let volume_bonus = if total_linked >= 20 {
        15
    } else if total_linked >= 10 {
        10
    } else if total_linked >= 5 {
        5
    } else {
        0
    };

    let context_bonus = if fulfillment.digital_goods.is_yes() {
        5
    } else if fulfillment.item_delivered.is_yes() {
        10
    } else if fulfillment.item_shipped.is_yes() {
        5
    } else {
        0
    };

    (FRAUD_LINKED_BASE + volume_bonus + context_bonus).clamp(0, 100) as u8
}

fn loyalty_legitimacy(total_linked: u64, fulfillment: &FulfillmentStatus) -> u8 {
    if total_linked == 0 {
        return LOYALTY_UNLINKED_SCORE as u8;
    }

    let loyalty_discount = if total_linked >= 30 {
        40
    } else if total_linked >= 20 {
        30
    } else if total_linked >= 10 {
        20
    } else if total_linked >= 5 {
        10
    } else {
        0
    };

    let fulfillment_discount = if fulfillment.item_delivered.is_yes() {
        10
    } else if fulfillment.item_shipped.is_yes() {
        5
    } else {
        0
    };

    let digital_surcharge = if fulfillment.digital_goods.is_yes() {
        5
    } else {
        0
    };

    (LOYALTY_LINKED_BASE - loyalty_discount - fulfillment_discount + digital_surcharge)
        .clamp(LOYALTY_FLOOR, 100) as u8
}
