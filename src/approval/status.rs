//! Moderation states of an approval log entry.

use super::ApprovalError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a moderation decision. This is the closed set of resolved
/// states; adding an outcome means adding a variant and a code here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Rejected,
    Approved,
}

impl Outcome {
    pub const ALL: [Outcome; 2] = [Outcome::Rejected, Outcome::Approved];

    /// Integer stored in `approval_logs.status`. Always non-negative.
    pub fn code(self) -> i32 {
        match self {
            Outcome::Rejected => 0,
            Outcome::Approved => 1,
        }
    }

    /// Value written to `blogs.is_approved` when this outcome is applied.
    pub fn approves_blog(self) -> bool {
        matches!(self, Outcome::Approved)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Rejected => "rejected",
            Outcome::Approved => "approved",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for Outcome {
    type Error = ApprovalError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Outcome::ALL
            .into_iter()
            .find(|outcome| outcome.code() == code)
            .ok_or_else(|| {
                ApprovalError::InvalidStateTransition(format!(
                    "{} is not a valid outcome code",
                    code
                ))
            })
    }
}

/// Moderation state of an approval log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApprovalStatus {
    Pending,
    Resolved(Outcome),
}

impl ApprovalStatus {
    pub const PENDING_CODE: i32 = -1;

    pub fn code(self) -> i32 {
        match self {
            ApprovalStatus::Pending => Self::PENDING_CODE,
            ApprovalStatus::Resolved(outcome) => outcome.code(),
        }
    }

    pub fn from_code(code: i32) -> Result<Self, ApprovalError> {
        if code == Self::PENDING_CODE {
            Ok(ApprovalStatus::Pending)
        } else {
            Outcome::try_from(code).map(ApprovalStatus::Resolved)
        }
    }

    pub fn is_pending(self) -> bool {
        self == ApprovalStatus::Pending
    }

    pub fn outcome(self) -> Option<Outcome> {
        match self {
            ApprovalStatus::Pending => None,
            ApprovalStatus::Resolved(outcome) => Some(outcome),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Resolved(outcome) => outcome.as_str(),
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
