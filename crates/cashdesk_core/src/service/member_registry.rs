//! Member registration use-cases.
//!
//! # Invariants
//! - First and last name are non-empty after trimming.
//! - Last names are unique across every member ever stored, whatever their
//!   membership state.

use crate::error::{CashDeskError, CashDeskResult};
use crate::model::member::{Member, MemberNumber, NewMember};
use crate::repo::member_repo::MemberRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;

/// Creates and removes members.
pub struct MemberRegistry<M: MemberRepository> {
    members: M,
}

impl<M: MemberRepository> MemberRegistry<M> {
    pub fn new(members: M) -> Self {
        Self { members }
    }

    /// Registers a member and returns the storage-assigned member number.
    ///
    /// # Errors
    /// - `Validation("first_name" | "last_name")` for blank names.
    /// - `DuplicateName` when the last name is already taken.
    pub fn add_member(
        &self,
        first_name: &str,
        last_name: &str,
        birthday: NaiveDate,
    ) -> CashDeskResult<MemberNumber> {
        let draft = NewMember::new(first_name, last_name, birthday);
        draft.validate()?;

        if self.members.find_by_last_name(&draft.last_name)?.is_some() {
            return Err(CashDeskError::DuplicateName(draft.last_name));
        }

        match self.members.create_member(&draft) {
            Ok(member) => Ok(member.member_number),
            Err(RepoError::UniqueViolation(_)) => Err(CashDeskError::DuplicateName(draft.last_name)),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a member; memberships and deposits go with it.
    pub fn delete_member(&self, member_number: MemberNumber) -> CashDeskResult<()> {
        match self.members.delete_member(member_number) {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound { .. }) => Err(CashDeskError::UnknownMember(member_number)),
            Err(err) => Err(err.into()),
        }
    }

    pub fn get_member(&self, member_number: MemberNumber) -> CashDeskResult<Option<Member>> {
        Ok(self.members.get_member(member_number)?)
    }

    pub fn list_members(&self) -> CashDeskResult<Vec<Member>> {
        Ok(self.members.list_members()?)
    }
}
