//! Task lifecycle engine: one queue payload in, at most one terminal write out.

use crate::evaluation::{
    domain::{
        Assessment, MessageDecodeError, Score, ScoringSettings, StatusUpdate, TaskId,
        TaskMessage, TaskStatus,
    },
    ports::{
        ConversionError, DocumentConverter, DocumentDownloader, DocumentScorer, DownloadError,
        ScoringError, StoreError, TaskStore,
    },
    services::resilient::ResilientStore,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Failure that turns a task into a `failed` record.
///
/// The `Display` text is stored as `doc_evaluation.error`.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Document conversion failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// Fetching the converted document failed.
    #[error(transparent)]
    Download(#[from] DownloadError),
    /// The scoring request failed.
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    /// The scoring service answered without invoking the score callback.
    #[error("scoring service returned no score")]
    MissingScore,
}

/// Reason a payload was dropped without a terminal write.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The payload is not a task message.
    #[error("undecodable task message: {0}")]
    Decode(#[from] MessageDecodeError),
    /// The store holds no record for the task.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// A store read failed before the existence check passed.
    #[error("store lookup for task {task_id} failed: {source}")]
    Lookup {
        /// Task identifier.
        task_id: TaskId,
        /// Store failure.
        source: StoreError,
    },
    /// The terminal status write was lost.
    #[error("terminal {status} write for task {task_id} failed: {source}")]
    TerminalWrite {
        /// Task identifier.
        task_id: TaskId,
        /// Status that could not be written.
        status: TaskStatus,
        /// Store failure.
        source: StoreError,
    },
}

/// Result type for processing one payload.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// What happened to a payload that was processed without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The enqueue-time snapshot already said `completed`.
    Skipped(TaskId),
    /// The document was scored and the record completed.
    Completed {
        /// Task identifier.
        task_id: TaskId,
        /// Stored score.
        score: Score,
    },
    /// Evaluation failed and the record was marked `failed`.
    Failed {
        /// Task identifier.
        task_id: TaskId,
        /// Stored error text.
        error: String,
    },
}

/// Orchestrates conversion, scoring and persistence for one task message.
pub struct EvaluationService<S, V, D, P, C>
where
    S: TaskStore,
    V: DocumentConverter,
    D: DocumentDownloader,
    P: DocumentScorer,
    C: Clock + Send + Sync,
{
    store: Arc<ResilientStore<S>>,
    converter: Arc<V>,
    downloader: Arc<D>,
    scorer: Arc<P>,
    clock: Arc<C>,
}

impl<S, V, D, P, C> Clone for EvaluationService<S, V, D, P, C>
where
    S: TaskStore,
    V: DocumentConverter,
    D: DocumentDownloader,
    P: DocumentScorer,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            converter: Arc::clone(&self.converter),
            downloader: Arc::clone(&self.downloader),
            scorer: Arc::clone(&self.scorer),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, V, D, P, C> EvaluationService<S, V, D, P, C>
where
    S: TaskStore,
    V: DocumentConverter,
    D: DocumentDownloader,
    P: DocumentScorer,
    C: Clock + Send + Sync,
{
    /// Creates a new evaluation service.
    #[must_use]
    pub const fn new(
        store: Arc<ResilientStore<S>>,
        converter: Arc<V>,
        downloader: Arc<D>,
        scorer: Arc<P>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            store,
            converter,
            downloader,
            scorer,
            clock,
        }
    }

    /// Processes one raw queue payload.
    ///
    /// A payload that passes the existence check always gets at most one
    /// `pending` write followed by one terminal write attempt. Conversion,
    /// download and scoring failures are recorded as a `failed` row and
    /// reported as [`ProcessOutcome::Failed`].
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError`] when the payload cannot be decoded, the task
    /// is unknown, a store lookup fails, or the terminal write is lost.
    pub async fn process(&self, payload: &[u8]) -> ProcessResult<ProcessOutcome> {
        let message = TaskMessage::decode(payload)?;
        let task_id = message.task_id().clone();

        if message.is_already_completed() {
            info!(%task_id, "task already completed; skipping");
            return Ok(ProcessOutcome::Skipped(task_id));
        }

        let settings = self
            .store
            .load_settings()
            .await
            .map_err(|source| ProcessError::Lookup {
                task_id: task_id.clone(),
                source,
            })?;
        let exists = self
            .store
            .task_exists(&task_id)
            .await
            .map_err(|source| ProcessError::Lookup {
                task_id: task_id.clone(),
                source,
            })?;
        if !exists {
            return Err(ProcessError::NotFound(task_id));
        }

        info!(%task_id, "starting task");
        self.mark_pending(&task_id).await;

        let (update, outcome) = match self.evaluate(&message, &settings).await {
            Ok(assessment) => {
                let score = assessment.score();
                let update = StatusUpdate::completed(task_id.clone(), assessment, self.clock.utc());
                (update, ProcessOutcome::Completed { task_id, score })
            }
            Err(err) => {
                warn!(%task_id, error = %err, "task evaluation failed");
                let error = err.to_string();
                let update = StatusUpdate::failed(task_id.clone(), error.clone(), self.clock.utc());
                (update, ProcessOutcome::Failed { task_id, error })
            }
        };
        self.write_terminal(&update).await?;
        Ok(outcome)
    }

    async fn mark_pending(&self, task_id: &TaskId) {
        let update = StatusUpdate::pending(task_id.clone(), self.clock.utc());
        if let Err(err) = self.store.update_status(&update).await {
            warn!(%task_id, error = %err, "could not mark task pending; continuing");
        }
    }

    async fn evaluate(
        &self,
        message: &TaskMessage,
        settings: &ScoringSettings,
    ) -> Result<Assessment, EvaluationError> {
        let file_url = self
            .converter
            .convert(message.onlyoffice_url(), message.param())
            .await?;
        let document = self.downloader.download(&file_url).await?;
        self.scorer
            .score(&document, settings)
            .await?
            .ok_or(EvaluationError::MissingScore)
    }

    async fn write_terminal(&self, update: &StatusUpdate) -> ProcessResult<()> {
        let task_id = update.task_id();
        let status = update.status();
        if let Err(source) = self.store.update_status(update).await {
            error!(%task_id, %status, error = %source, "terminal status write lost");
            return Err(ProcessError::TerminalWrite {
                task_id: task_id.clone(),
                status,
                source,
            });
        }
        info!(%task_id, %status, "task finished");
        Ok(())
    }
}
