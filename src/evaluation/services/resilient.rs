//! Reconnect-and-retry-once wrapper around the task store.

use std::future::Future;

use tracing::{error, warn};

use crate::evaluation::{
    domain::{ScoringSettings, StatusUpdate, TaskId},
    ports::{StoreError, StoreResult, TaskStore},
};

/// Retry policy for store operations.
///
/// An operation is attempted once. On any store error the connection is
/// re-established and the same operation runs a second time; a failure of
/// either the reconnect or the second attempt surfaces as
/// [`StoreError::Unavailable`]. Business outcomes such as zero affected rows
/// are successes and are never retried.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconnectOnce;

impl ReconnectOnce {
    /// Runs `attempt`, reconnecting `store` and retrying once on failure.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] carrying the last failure when the
    /// reconnect or the retry fails.
    pub async fn execute<S, T, F, Fut>(
        self,
        store: &S,
        operation: &'static str,
        attempt: F,
    ) -> StoreResult<T>
    where
        S: TaskStore + ?Sized,
        F: Fn() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let first_failure = match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        warn!(operation, error = %first_failure, "store operation failed; reconnecting");

        if let Err(reconnect_failure) = store.reconnect().await {
            error!(operation, error = %reconnect_failure, "store reconnect failed");
            return Err(StoreError::unavailable(operation, reconnect_failure));
        }

        attempt().await.map_err(|second_failure| {
            error!(operation, error = %second_failure, "store operation failed after reconnect");
            StoreError::unavailable(operation, second_failure)
        })
    }
}

/// Task store whose every operation goes through [`ReconnectOnce`].
#[derive(Debug, Clone)]
pub struct ResilientStore<S> {
    store: S,
    policy: ReconnectOnce,
}

impl<S> ResilientStore<S>
where
    S: TaskStore,
{
    /// Wraps an owned store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            policy: ReconnectOnce,
        }
    }

    /// Reads the current scoring settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when both attempts fail.
    pub async fn load_settings(&self) -> StoreResult<ScoringSettings> {
        let store = &self.store;
        self.policy
            .execute(store, "load_settings", move || store.load_settings())
            .await
    }

    /// Checks whether a task record exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when both attempts fail.
    pub async fn task_exists(&self, task_id: &TaskId) -> StoreResult<bool> {
        let store = &self.store;
        self.policy
            .execute(store, "task_exists", move || store.task_exists(task_id))
            .await
    }

    /// Applies a status write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when both attempts fail.
    pub async fn update_status(&self, update: &StatusUpdate) -> StoreResult<u64> {
        let store = &self.store;
        self.policy
            .execute(store, "update_status", move || store.update_status(update))
            .await
    }
}
