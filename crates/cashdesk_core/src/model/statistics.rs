//! Derived deposit statistics. Never persisted.

use super::member::Member;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Total deposits of one member for memberships begun in one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositStatistic {
    pub member: Member,
    pub year: i32,
    pub total_amount: Decimal,
}
