//! Deposits recorded against a membership.

use super::membership::MembershipId;
use super::ModelValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type DepositId = i64;

/// A monetary contribution; created once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub deposit_id: DepositId,
    /// Back-reference to the owning membership.
    pub membership_id: MembershipId,
    pub amount: Decimal,
}

impl Deposit {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_amount(self.amount)
    }
}

/// Deposit draft for the create path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDeposit {
    pub membership_id: MembershipId,
    pub amount: Decimal,
}

impl NewDeposit {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_amount(self.amount)
    }
}

/// Rejects negative amounts; zero is accepted.
pub fn validate_amount(amount: Decimal) -> Result<(), ModelValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ModelValidationError::NegativeAmount);
    }
    Ok(())
}
