use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReviewStatusError {
    #[error("invalid review status value: {0}")]
    InvalidStatus(String),
}

//
// ─── REVIEW STATUS ─────────────────────────────────────────────────────────────
//

/// Whether a mistake-log record still needs to be reviewed.
///
/// Every record starts as `NeedsReview`; the learner flips it to `Reviewed`
/// from the review dialog once the mistake is understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    NeedsReview,
    Reviewed,
}

impl ReviewStatus {
    /// Stable string form used by persistence collaborators.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::NeedsReview => "needs_review",
            ReviewStatus::Reviewed => "reviewed",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = ReviewStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "needs_review" => Ok(ReviewStatus::NeedsReview),
            "reviewed" => Ok(ReviewStatus::Reviewed),
            other => Err(ReviewStatusError::InvalidStatus(other.to_string())),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_needs_review() {
        assert_eq!(ReviewStatus::default(), ReviewStatus::NeedsReview);
    }

    #[test]
    fn string_form_round_trips() {
        for status in [ReviewStatus::NeedsReview, ReviewStatus::Reviewed] {
            let parsed: ReviewStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "done".parse::<ReviewStatus>().unwrap_err();
        assert!(matches!(err, ReviewStatusError::InvalidStatus(raw) if raw == "done"));
    }
}
