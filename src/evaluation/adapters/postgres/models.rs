//! Diesel row models for evaluation persistence.

use super::schema::ai_doc_score_record;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ai_doc_score_record)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRecordRow {
    /// Task identifier.
    pub id: String,
    /// Task status.
    pub status: String,
    /// Serialised evaluation payload.
    pub doc_evaluation: Option<String>,
    /// Overall score.
    pub overall_score: i32,
    /// Timestamp of the last status write.
    pub score_time: Option<DateTime<Utc>>,
}

/// Changeset applied by a status write.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = ai_doc_score_record)]
#[diesel(treat_none_as_null = true)]
pub struct StatusChangeset {
    /// New status.
    pub status: String,
    /// New serialised evaluation payload.
    pub doc_evaluation: Option<String>,
    /// New overall score.
    pub overall_score: i32,
    /// Write timestamp.
    pub score_time: Option<DateTime<Utc>>,
}
