//! Cash desk domain model.
//!
//! # Responsibility
//! - Define members, memberships, deposits and the derived statistics view.
//! - Provide write-side drafts (`New*`) whose identity is assigned by storage.
//!
//! # Invariants
//! - Children reference parents by id only (`member_number`,
//!   `membership_id`); ownership lives in storage foreign keys.
//! - An open membership has `end == None`; there is no sentinel timestamp.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod deposit;
pub mod member;
pub mod membership;
pub mod statistics;

/// Model invariant violations detected before persistence or on read-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelValidationError {
    EmptyFirstName,
    EmptyLastName,
    NegativeAmount,
    EndBeforeBegin,
}

impl ModelValidationError {
    /// Name of the offending input field.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyFirstName => "first_name",
            Self::EmptyLastName => "last_name",
            Self::NegativeAmount => "amount",
            Self::EndBeforeBegin => "end",
        }
    }
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::NegativeAmount => write!(f, "deposit amount must not be negative"),
            Self::EndBeforeBegin => write!(f, "membership end must not precede its begin"),
        }
    }
}

impl Error for ModelValidationError {}
