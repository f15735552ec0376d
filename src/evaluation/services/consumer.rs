//! Message consumption loop.
//!
//! Payloads are handled strictly one after another. A handler error is
//! logged and discarded so a poisoned message never stops consumption; only a
//! failing message source ends the loop with an error.

use std::future::Future;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::evaluation::{
    ports::{
        DocumentConverter, DocumentDownloader, DocumentScorer, MessageSource, SourceResult,
        TaskStore,
    },
    services::lifecycle::{EvaluationService, ProcessError, ProcessOutcome, ProcessResult},
};

/// Handles one delivered payload.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Processes `payload` to completion.
    async fn handle(&self, payload: &[u8]) -> ProcessResult<ProcessOutcome>;
}

#[async_trait]
impl<S, V, D, P, C> MessageHandler for EvaluationService<S, V, D, P, C>
where
    S: TaskStore,
    V: DocumentConverter,
    D: DocumentDownloader,
    P: DocumentScorer,
    C: Clock + Send + Sync,
{
    async fn handle(&self, payload: &[u8]) -> ProcessResult<ProcessOutcome> {
        self.process(payload).await
    }
}

/// Tally of what the loop did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerSummary {
    /// Payloads handed to the handler.
    pub delivered: usize,
    /// Payloads recorded as `completed`.
    pub completed: usize,
    /// Payloads recorded as `failed`.
    pub failed: usize,
    /// Payloads skipped as already completed.
    pub skipped: usize,
    /// Payloads whose handler returned an error.
    pub dropped: usize,
}

impl ConsumerSummary {
    fn record(&mut self, result: &ProcessResult<ProcessOutcome>) {
        match result {
            Ok(ProcessOutcome::Completed { .. }) => self.completed += 1,
            Ok(ProcessOutcome::Failed { .. }) => self.failed += 1,
            Ok(ProcessOutcome::Skipped(_)) => self.skipped += 1,
            Err(_) => self.dropped += 1,
        }
    }
}

/// Consumes `source` until it is exhausted.
///
/// # Errors
///
/// Returns the source error when reading the next payload fails.
pub async fn run<M, H>(source: &mut M, handler: &H) -> SourceResult<ConsumerSummary>
where
    M: MessageSource,
    H: MessageHandler,
{
    run_until(source, handler, std::future::pending()).await
}

/// Consumes `source` until it is exhausted or `shutdown` resolves.
///
/// Shutdown is only observed between payloads; a payload already handed to
/// the handler always runs to completion.
///
/// # Errors
///
/// Returns the source error when reading the next payload fails.
pub async fn run_until<M, H, F>(
    source: &mut M,
    handler: &H,
    shutdown: F,
) -> SourceResult<ConsumerSummary>
where
    M: MessageSource,
    H: MessageHandler,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut summary = ConsumerSummary::default();

    loop {
        let received = tokio::select! {
            biased;
            () = &mut shutdown => {
                info!("shutdown requested; stopping consumption");
                break;
            }
            next = source.next_message() => next?,
        };
        let Some(payload) = received else {
            info!("message source exhausted");
            break;
        };

        summary.delivered += 1;
        let delivery_id = Uuid::new_v4();
        let result = handler
            .handle(&payload)
            .instrument(info_span!("delivery", %delivery_id))
            .await;
        log_dropped(&delivery_id, &result);
        summary.record(&result);
    }

    Ok(summary)
}

fn log_dropped(delivery_id: &Uuid, result: &ProcessResult<ProcessOutcome>) {
    match result {
        Ok(_) => {}
        Err(ProcessError::NotFound(task_id)) => {
            warn!(%delivery_id, %task_id, "task not found; message dropped");
        }
        Err(err) => error!(%delivery_id, error = %err, "message dropped"),
    }
}
