//! Core use-case services.
//!
//! # Responsibility
//! - Enforce membership lifecycle and deposit rules above the repositories.
//! - Keep session and storage details out of business rules.
//!
//! # Invariants
//! - Services only talk to repository traits, never to each other.
//! - A missing member fails fast with `CashDeskError::UnknownMember`.

pub mod deposit_recorder;
pub mod member_registry;
pub mod membership_ledger;
pub mod statistics_aggregator;

use crate::error::{CashDeskError, CashDeskResult};
use crate::model::member::{Member, MemberNumber};
use crate::repo::member_repo::MemberRepository;

fn require_member<M: MemberRepository>(
    members: &M,
    member_number: MemberNumber,
) -> CashDeskResult<Member> {
    members
        .get_member(member_number)?
        .ok_or(CashDeskError::UnknownMember(member_number))
}
