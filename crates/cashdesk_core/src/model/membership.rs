//! Membership intervals.
//!
//! # Invariants
//! - `end == None` means the membership is open.
//! - `end`, when set, is never earlier than `begin`.
//! - State only moves `Open -> Closed`; a closed membership is immutable.
//! - A membership stops being active at its end instant.

use super::member::MemberNumber;
use super::ModelValidationError;
use chrono::{DateTime, Datelike, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

pub type MembershipId = i64;

/// A time interval during which a member is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub membership_id: MembershipId,
    /// Back-reference to the owning member.
    pub member_number: MemberNumber,
    pub begin: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl Membership {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        match self.end {
            Some(end) if end < self.begin => Err(ModelValidationError::EndBeforeBegin),
            _ => Ok(()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Whether deposits may target this membership at `at`.
    ///
    /// An end that has not been reached yet still counts as active.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.end.map_or(true, |end| end > at)
    }

    /// Calendar year the membership began, used to bucket statistics.
    pub fn begin_year(&self) -> i32 {
        self.begin.year()
    }

    /// Closes the membership at `at`.
    ///
    /// Returns `false` and leaves `self` untouched when the membership is
    /// already closed or has not begun at `at`.
    pub fn close(&mut self, at: DateTime<Utc>) -> bool {
        if !self.is_open() || at < self.begin {
            return false;
        }
        self.end = Some(at);
        true
    }
}

/// Membership draft for the join path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMembership {
    pub member_number: MemberNumber,
    pub begin: DateTime<Utc>,
}

impl NewMembership {
    /// Opens a membership for `member_number` starting at `begin`.
    pub fn open(member_number: MemberNumber, begin: DateTime<Utc>) -> Self {
        Self {
            member_number,
            begin: truncate_to_storage_precision(begin),
        }
    }
}

/// Current time at the precision timestamps are persisted with.
pub fn timestamp_now() -> DateTime<Utc> {
    truncate_to_storage_precision(Utc::now())
}

/// Drops sub-millisecond digits so in-memory values equal their read-back.
pub fn truncate_to_storage_precision(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(3)
}
