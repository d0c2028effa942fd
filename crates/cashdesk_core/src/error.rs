//! Public error surface of the cash desk core.
//!
//! # Invariants
//! - Every error is returned synchronously; nothing is retried internally.
//! - `code()` values are stable and used as `error_code` in log events.

use crate::model::member::MemberNumber;
use crate::model::ModelValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CashDeskResult<T> = Result<T, CashDeskError>;

#[derive(Debug)]
pub enum CashDeskError {
    /// An operation ran before `CashDesk::initialize` or after `dispose`.
    NotInitialized,
    /// `CashDesk::initialize` ran twice without `dispose`.
    AlreadyInitialized,
    /// Malformed input; carries the offending field name.
    Validation(&'static str),
    /// Another member already uses this last name.
    DuplicateName(String),
    UnknownMember(MemberNumber),
    /// The member already has an open membership.
    AlreadyMember(MemberNumber),
    /// The member has no open or still-running membership.
    NoActiveMembership(MemberNumber),
    /// Storage-layer failure.
    Repo(RepoError),
}

impl CashDeskError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::AlreadyInitialized => "already_initialized",
            Self::Validation(_) => "validation",
            Self::DuplicateName(_) => "duplicate_name",
            Self::UnknownMember(_) => "unknown_member",
            Self::AlreadyMember(_) => "already_member",
            Self::NoActiveMembership(_) => "no_active_membership",
            Self::Repo(_) => "storage",
        }
    }
}

impl Display for CashDeskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "cash desk is not initialized"),
            Self::AlreadyInitialized => write!(f, "cash desk is already initialized"),
            Self::Validation(field) => write!(f, "invalid value for `{field}`"),
            Self::DuplicateName(last_name) => {
                write!(f, "a member with last name `{last_name}` already exists")
            }
            Self::UnknownMember(member_number) => write!(f, "unknown member: {member_number}"),
            Self::AlreadyMember(member_number) => {
                write!(f, "member {member_number} already has an open membership")
            }
            Self::NoActiveMembership(member_number) => {
                write!(f, "member {member_number} has no active membership")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CashDeskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CashDeskError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err.field()),
            other => Self::Repo(other),
        }
    }
}

impl From<ModelValidationError> for CashDeskError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value.field())
    }
}

impl From<rusqlite::Error> for CashDeskError {
    fn from(value: rusqlite::Error) -> Self {
        Self::from(RepoError::from(value))
    }
}
