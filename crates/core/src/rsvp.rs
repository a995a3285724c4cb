//! RSVP submissions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::guestbook::{MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH};

/// A guest's attendance answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Attending,
    NotAttending,
    Maybe,
}

impl RsvpStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RsvpStatus::Attending => "attending",
            RsvpStatus::NotAttending => "not_attending",
            RsvpStatus::Maybe => "maybe",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RsvpStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attending" => Ok(RsvpStatus::Attending),
            "not_attending" => Ok(RsvpStatus::NotAttending),
            "maybe" => Ok(RsvpStatus::Maybe),
            other => Err(CoreError::Validation(format!(
                "Invalid RSVP status '{other}'"
            ))),
        }
    }
}

/// Validate an RSVP, returning the trimmed name and the trimmed message
/// (blank messages become `None`).
pub fn validate_rsvp(
    name: &str,
    message: Option<&str>,
) -> Result<(String, Option<String>), CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    let message = message.map(str::trim).filter(|m| !m.is_empty());
    if let Some(m) = message {
        if m.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(CoreError::Validation(format!(
                "Message exceeds maximum length of {MAX_MESSAGE_LENGTH} characters"
            )));
        }
    }
    Ok((name.to_string(), message.map(str::to_string)))
}
