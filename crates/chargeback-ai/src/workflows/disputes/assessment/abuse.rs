use super::super::domain::CustomerProfile;

/// The divisor stays fixed even when a signal has no data to contribute.
const SIGNAL_COUNT: u32 = 5;

/// Per-signal contributions, kept so callers can explain the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AbuseSignals {
    pub dispute_rate: u32,
    pub win_rate: u32,
    pub fraud_ring: u32,
    pub multi_vector: u32,
    pub spend_disincentive: u32,
}

impl AbuseSignals {
    pub fn collect(customer: &CustomerProfile, dispute_amount: f64) -> Self {
        Self {
            dispute_rate: dispute_rate_signal(customer.dispute_percentage),
            win_rate: win_rate_signal(customer.previous_disputes, customer.disputes_won),
            fraud_ring: fraud_ring_signal(
                customer.linked_customer_count,
                customer.linked_customer_dispute_rate,
            ),
            multi_vector: multi_vector_signal(customer.linked_accounts.active_vectors()),
            spend_disincentive: spend_disincentive_signal(
                customer.total_purchase_amount,
                dispute_amount,
                customer.previous_disputes,
            ),
        }
    }

    pub fn sum(&self) -> u32 {
        self.dispute_rate
            + self.win_rate
            + self.fraud_ring
            + self.multi_vector
            + self.spend_disincentive
    }

    pub fn score(&self) -> u8 {
        (self.sum() / SIGNAL_COUNT).min(100) as u8
    }
}

pub fn abuse_score(customer: &CustomerProfile, dispute_amount: f64) -> u8 {
    AbuseSignals::collect(customer, dispute_amount).score()
}

fn dispute_rate_signal(dispute_percentage: f64) -> u32 {
    if dispute_percentage >= 10.0 {
        80
    } else if dispute_percentage >= 5.0 {
        60
    } else if dispute_percentage >= 2.0 {
        35
    } else if dispute_percentage >= 1.0 {
        20
    } else {
        5
    }
}

fn win_rate_signal(previous_disputes: u32, disputes_won: u32) -> u32 {
    if previous_disputes == 0 {
        return 0;
    }

    let win_rate = f64::from(disputes_won) / f64::from(previous_disputes) * 100.0;
    if win_rate >= 80.0 {
        70
    } else if win_rate >= 60.0 {
        45
    } else if win_rate >= 40.0 {
        25
    } else {
        10
    }
}

fn fraud_ring_signal(linked_customer_count: u32, linked_dispute_rate: f64) -> u32 {
    if linked_customer_count == 0 {
        return 0;
    }

    if linked_dispute_rate >= 8.0 {
        60
    } else if linked_dispute_rate >= 4.0 {
        35
    } else if linked_dispute_rate >= 2.0 {
        20
    } else {
        5
    }
}

fn multi_vector_signal(active_vectors: usize) -> u32 {
    if active_vectors >= 4 {
        50
    } else if active_vectors == 3 {
        30
    } else if active_vectors == 2 {
        15
    } else {
        0
    }
}

/// Many prior disputes on amounts that are tiny relative to lifetime spend.
fn spend_disincentive_signal(
    total_purchase: f64,
    dispute_amount: f64,
    previous_disputes: u32,
) -> u32 {
    if total_purchase <= 0.0 {
        return 0;
    }

    let dispute_ratio = dispute_amount / total_purchase * 100.0;
    if dispute_ratio < 1.0 && previous_disputes > 5 {
        30
    } else {
        0
    }
}
