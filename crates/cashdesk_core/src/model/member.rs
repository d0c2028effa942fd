//! Member records.

use super::ModelValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage-assigned member identity.
pub type MemberNumber = i64;

/// A registered club member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub member_number: MemberNumber,
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
}

impl Member {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_names(&self.first_name, &self.last_name)
    }
}

/// Member draft used on the create path, before an identity exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
}

impl NewMember {
    /// Builds a draft with surrounding whitespace stripped from both names.
    pub fn new(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
        birthday: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.as_ref().trim().to_string(),
            last_name: last_name.as_ref().trim().to_string(),
            birthday,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_names(&self.first_name, &self.last_name)
    }
}

fn validate_names(first_name: &str, last_name: &str) -> Result<(), ModelValidationError> {
    if first_name.trim().is_empty() {
        return Err(ModelValidationError::EmptyFirstName);
    }
    if last_name.trim().is_empty() {
        return Err(ModelValidationError::EmptyLastName);
    }
    Ok(())
}
