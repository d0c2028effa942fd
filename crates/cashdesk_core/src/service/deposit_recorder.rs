//! Deposit recording use-case.

use super::require_member;
use crate::error::{CashDeskError, CashDeskResult};
use crate::model::deposit::{validate_amount, Deposit, NewDeposit};
use crate::model::member::MemberNumber;
use crate::model::membership::{timestamp_now, truncate_to_storage_precision, MembershipId};
use crate::repo::deposit_repo::DepositRepository;
use crate::repo::member_repo::MemberRepository;
use crate::repo::membership_repo::MembershipRepository;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Records deposits against a member's active membership.
pub struct DepositRecorder<M, S, D>
where
    M: MemberRepository,
    S: MembershipRepository,
    D: DepositRepository,
{
    members: M,
    memberships: S,
    deposits: D,
}

impl<M, S, D> DepositRecorder<M, S, D>
where
    M: MemberRepository,
    S: MembershipRepository,
    D: DepositRepository,
{
    pub fn new(members: M, memberships: S, deposits: D) -> Self {
        Self {
            members,
            memberships,
            deposits,
        }
    }

    pub fn deposit(&self, member_number: MemberNumber, amount: Decimal) -> CashDeskResult<Deposit> {
        self.deposit_at(member_number, amount, timestamp_now())
    }

    /// Records `amount` against the membership active at `at`.
    ///
    /// The amount is checked before any lookup, so a negative amount fails
    /// with `Validation("amount")` whatever the member's state.
    pub fn deposit_at(
        &self,
        member_number: MemberNumber,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> CashDeskResult<Deposit> {
        validate_amount(amount)?;
        require_member(&self.members, member_number)?;
        let at = truncate_to_storage_precision(at);

        let membership = self
            .memberships
            .find_active_membership(member_number, at)?
            .ok_or(CashDeskError::NoActiveMembership(member_number))?;

        Ok(self.deposits.create_deposit(&NewDeposit {
            membership_id: membership.membership_id,
            amount,
        })?)
    }

    pub fn list_deposits(&self, membership_id: MembershipId) -> CashDeskResult<Vec<Deposit>> {
        Ok(self.deposits.list_deposits(membership_id)?)
    }
}
