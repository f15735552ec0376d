//! Store port for task records and runtime settings.

use crate::evaluation::domain::{ScoringSettings, StatusUpdate, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Relational store holding task records and the `config` table.
///
/// Implementations own exactly one live connection. [`TaskStore::reconnect`]
/// replaces it; no other component keeps a handle to the old one.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Reads the scoring settings currently stored in the `config` table.
    async fn load_settings(&self) -> StoreResult<ScoringSettings>;

    /// Returns `true` when a record with the identifier exists.
    async fn task_exists(&self, task_id: &TaskId) -> StoreResult<bool>;

    /// Writes status, evaluation payload, score and `score_time`.
    ///
    /// Returns the number of affected rows. Zero rows is not an error.
    async fn update_status(&self, update: &StatusUpdate) -> StoreResult<u64>;

    /// Drops the current connection and establishes a new one.
    async fn reconnect(&self) -> StoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No connection is currently established.
    #[error("store is not connected")]
    Disconnected,

    /// Establishing or using the connection failed.
    #[error("store connection error: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// A statement failed to execute.
    #[error("store query error: {0}")]
    Query(Arc<dyn std::error::Error + Send + Sync>),

    /// The operation failed again after reconnecting.
    #[error("store unavailable during {operation}: {source}")]
    Unavailable {
        /// Name of the failed operation.
        operation: &'static str,
        /// Failure from the last attempt.
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Wraps a connection-level error.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Wraps a statement-level error.
    pub fn query(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Query(Arc::new(err))
    }

    /// Marks an operation as unavailable after the reconnect attempt.
    #[must_use]
    pub fn unavailable(operation: &'static str, last: Self) -> Self {
        Self::Unavailable {
            operation,
            source: Box::new(last),
        }
    }
}
