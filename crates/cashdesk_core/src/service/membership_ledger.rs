//! Membership join/cancel use-cases.
//!
//! # Invariants
//! - At most one open membership per member.
//! - Cancel targets the open membership and closes it exactly once; a
//!   closed membership is never changed again.

use super::require_member;
use crate::error::{CashDeskError, CashDeskResult};
use crate::model::member::MemberNumber;
use crate::model::membership::{
    timestamp_now, truncate_to_storage_precision, Membership, NewMembership,
};
use crate::repo::member_repo::MemberRepository;
use crate::repo::membership_repo::MembershipRepository;
use crate::repo::RepoError;
use chrono::{DateTime, Utc};

/// Opens and closes memberships.
pub struct MembershipLedger<M: MemberRepository, S: MembershipRepository> {
    members: M,
    memberships: S,
}

impl<M: MemberRepository, S: MembershipRepository> MembershipLedger<M, S> {
    pub fn new(members: M, memberships: S) -> Self {
        Self {
            members,
            memberships,
        }
    }

    /// Opens a membership beginning now.
    pub fn join_member(&self, member_number: MemberNumber) -> CashDeskResult<Membership> {
        self.join_member_at(member_number, timestamp_now())
    }

    /// Opens a membership beginning at `begin`.
    ///
    /// # Errors
    /// - `UnknownMember` when the member does not exist.
    /// - `AlreadyMember` when an open membership exists.
    pub fn join_member_at(
        &self,
        member_number: MemberNumber,
        begin: DateTime<Utc>,
    ) -> CashDeskResult<Membership> {
        require_member(&self.members, member_number)?;

        if self.memberships.has_open_membership(member_number)? {
            return Err(CashDeskError::AlreadyMember(member_number));
        }

        match self
            .memberships
            .create_membership(&NewMembership::open(member_number, begin))
        {
            Ok(membership) => Ok(membership),
            Err(RepoError::UniqueViolation(_)) => Err(CashDeskError::AlreadyMember(member_number)),
            Err(err) => Err(err.into()),
        }
    }

    /// Ends the member's active membership now.
    pub fn cancel_membership(&self, member_number: MemberNumber) -> CashDeskResult<Membership> {
        self.cancel_membership_at(member_number, timestamp_now())
    }

    /// Ends the member's active membership at `end`.
    ///
    /// # Errors
    /// - `UnknownMember` when the member does not exist.
    /// - `NoActiveMembership` when no membership is open or it begins after
    ///   `end`.
    pub fn cancel_membership_at(
        &self,
        member_number: MemberNumber,
        end: DateTime<Utc>,
    ) -> CashDeskResult<Membership> {
        require_member(&self.members, member_number)?;
        let end = truncate_to_storage_precision(end);

        let mut membership = self
            .memberships
            .find_active_membership(member_number, end)?
            .ok_or(CashDeskError::NoActiveMembership(member_number))?;
        if !membership.close(end) {
            return Err(CashDeskError::NoActiveMembership(member_number));
        }
        membership.validate()?;

        match self
            .memberships
            .close_membership(membership.membership_id, end)
        {
            Ok(()) => Ok(membership),
            Err(RepoError::NotFound { .. }) => {
                Err(CashDeskError::NoActiveMembership(member_number))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lists the member's memberships ordered by begin time.
    pub fn list_memberships(&self, member_number: MemberNumber) -> CashDeskResult<Vec<Membership>> {
        require_member(&self.members, member_number)?;
        Ok(self.memberships.list_memberships(member_number)?)
    }
}
