//! Persisted task record and the status writes applied to it.

use super::{Assessment, Score, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured evaluation payload stored alongside the task status.
///
/// Serialises to `{"comment": ...}` on success, `{"error": ...}` on failure
/// and `{}` while the task is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocEvaluation {
    /// Reviewer comment for a scored document.
    Comment {
        /// Comment text returned by the scoring service.
        comment: String,
    },
    /// Failure description for a task that could not be scored.
    Error {
        /// Human-readable error message.
        error: String,
    },
    /// Placeholder written while evaluation is in flight.
    Pending {},
}

impl DocEvaluation {
    /// Serialises the payload into its stored text form.
    ///
    /// # Errors
    ///
    /// Returns the underlying serialisation error.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// One status write against a task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    task_id: TaskId,
    status: TaskStatus,
    evaluation: DocEvaluation,
    overall_score: Score,
    recorded_at: DateTime<Utc>,
}

impl StatusUpdate {
    /// Marks a task as in flight.
    #[must_use]
    pub const fn pending(task_id: TaskId, recorded_at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            status: TaskStatus::Pending,
            evaluation: DocEvaluation::Pending {},
            overall_score: Score::ZERO,
            recorded_at,
        }
    }

    /// Records a successful assessment.
    #[must_use]
    pub fn completed(task_id: TaskId, assessment: Assessment, recorded_at: DateTime<Utc>) -> Self {
        let (score, comment) = assessment.into_parts();
        Self {
            task_id,
            status: TaskStatus::Completed,
            evaluation: DocEvaluation::Comment { comment },
            overall_score: score,
            recorded_at,
        }
    }

    /// Records a failed evaluation with its error message.
    #[must_use]
    pub fn failed(task_id: TaskId, error: impl Into<String>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            status: TaskStatus::Failed,
            evaluation: DocEvaluation::Error {
                error: error.into(),
            },
            overall_score: Score::ZERO,
            recorded_at,
        }
    }

    /// Returns the target task identifier.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the status being written.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the evaluation payload being written.
    #[must_use]
    pub const fn evaluation(&self) -> &DocEvaluation {
        &self.evaluation
    }

    /// Returns the overall score being written.
    #[must_use]
    pub const fn overall_score(&self) -> Score {
        self.overall_score
    }

    /// Returns the timestamp recorded as `score_time`.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Snapshot of a task record as held by the store.
///
/// `status` is kept as raw text because records are created upstream with
/// statuses the worker never writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Task identifier.
    pub id: TaskId,
    /// Current status text.
    pub status: String,
    /// Stored evaluation payload, if any.
    pub doc_evaluation: Option<String>,
    /// Stored overall score.
    pub overall_score: i32,
    /// Timestamp of the last status write.
    pub score_time: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Creates a record in the upstream `queued` state.
    #[must_use]
    pub fn queued(id: TaskId) -> Self {
        Self {
            id,
            status: "queued".to_owned(),
            doc_evaluation: None,
            overall_score: 0,
            score_time: None,
        }
    }

    /// Applies a status write to this snapshot.
    ///
    /// # Errors
    ///
    /// Returns the serialisation error of the evaluation payload.
    pub fn apply(&mut self, update: &StatusUpdate) -> serde_json::Result<()> {
        self.status = update.status().as_str().to_owned();
        self.doc_evaluation = Some(update.evaluation().to_json()?);
        self.overall_score = i32::from(update.overall_score().value());
        self.score_time = Some(update.recorded_at());
        Ok(())
    }

    /// Returns the parsed status when it is one the worker writes.
    #[must_use]
    pub fn worker_status(&self) -> Option<TaskStatus> {
        TaskStatus::try_from(self.status.as_str()).ok()
    }
}
