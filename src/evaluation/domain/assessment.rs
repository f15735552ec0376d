//! Grading outcome returned by the scoring service.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document score in the inclusive range `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    /// Score stored for tasks that have not been graded.
    pub const ZERO: Self = Self(0);

    const MAX: i64 = 100;

    /// Creates a validated score.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ScoreOutOfRange`] when the value is negative
    /// or greater than 100.
    pub fn new(value: i64) -> Result<Self, TaskDomainError> {
        if !(0..=Self::MAX).contains(&value) {
            return Err(TaskDomainError::ScoreOutOfRange(value));
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| TaskDomainError::ScoreOutOfRange(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Score and reviewer comment produced for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    score: Score,
    comment: String,
}

impl Assessment {
    /// Creates an assessment.
    #[must_use]
    pub fn new(score: Score, comment: impl Into<String>) -> Self {
        Self {
            score,
            comment: comment.into(),
        }
    }

    /// Returns the score.
    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Returns the reviewer comment.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Consumes the assessment, returning score and comment.
    #[must_use]
    pub fn into_parts(self) -> (Score, String) {
        (self.score, self.comment)
    }
}
