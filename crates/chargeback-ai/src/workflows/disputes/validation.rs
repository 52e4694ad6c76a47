use super::domain::{CustomerId, CustomerProfile, DisputeCase};

/// Input rejected before scoring. Score clamping is policy; malformed inputs are not clamped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("dispute amount must be a finite, non-negative value (found {0})")]
    InvalidAmount(f64),
    #[error("customer field `{field}` must be a finite, non-negative value (found {value})")]
    InvalidCustomerMetric { field: &'static str, value: f64 },
    #[error("customer reports {won} disputes won out of {filed} filed")]
    DisputesWonExceedFiled { won: u32, filed: u32 },
    #[error("case belongs to customer {expected} but profile {found} was supplied")]
    CustomerMismatch {
        expected: CustomerId,
        found: CustomerId,
    },
}

/// Guard run on every case/customer pair before the engine touches it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseValidator;

impl CaseValidator {
    pub fn check(
        &self,
        case: &DisputeCase,
        customer: &CustomerProfile,
    ) -> Result<(), ValidationError> {
        if !non_negative(case.amount) {
            return Err(ValidationError::InvalidAmount(case.amount));
        }

        if case.customer_id != customer.id {
            return Err(ValidationError::CustomerMismatch {
                expected: case.customer_id.clone(),
                found: customer.id.clone(),
            });
        }

        if customer.disputes_won > customer.previous_disputes {
            return Err(ValidationError::DisputesWonExceedFiled {
                won: customer.disputes_won,
                filed: customer.previous_disputes,
            });
        }

        let metrics = [
            ("dispute_percentage", customer.dispute_percentage),
            ("total_purchase_amount", customer.total_purchase_amount),
            (
                "linked_customer_dispute_rate",
                customer.linked_customer_dispute_rate,
            ),
        ];
        for (field, value) in metrics {
            if !non_negative(value) {
                return Err(ValidationError::InvalidCustomerMetric { field, value });
            }
        }

        Ok(())
    }
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
