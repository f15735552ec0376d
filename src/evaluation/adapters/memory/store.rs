//! In-memory task store with scripted connection failures.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::evaluation::{
    domain::{ScoringSettings, StatusUpdate, TaskId, TaskRecord},
    ports::{StoreError, StoreResult, TaskStore},
};

/// Thread-safe in-memory task store.
///
/// Besides holding records and settings, the store can be told to fail the
/// next few operations or reconnect attempts, and it keeps a log of every
/// status write so tests can assert on write ordering.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    records: HashMap<TaskId, TaskRecord>,
    settings: Vec<(String, Option<String>)>,
    writes: Vec<StatusUpdate>,
    failing_operations: usize,
    passing_before_failure: usize,
    failing_reconnects: usize,
    operations: usize,
    reconnects: usize,
}

impl InMemoryStoreState {
    fn begin_operation(&mut self) -> StoreResult<()> {
        self.operations += 1;
        if self.failing_operations > 0 {
            if self.passing_before_failure > 0 {
                self.passing_before_failure -= 1;
                return Ok(());
            }
            self.failing_operations -= 1;
            return Err(StoreError::connection(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        Ok(())
    }
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write_state(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, InMemoryStoreState>> {
        self.state
            .write()
            .map_err(|err| StoreError::connection(std::io::Error::other(err.to_string())))
    }

    fn read_state(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, InMemoryStoreState>> {
        self.state
            .read()
            .map_err(|err| StoreError::connection(std::io::Error::other(err.to_string())))
    }

    /// Inserts or replaces a task record.
    ///
    /// # Errors
    ///
    /// Returns store errors when lock acquisition fails.
    pub fn insert_record(&self, record: TaskRecord) -> StoreResult<()> {
        let mut state = self.write_state()?;
        state.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Stores one `config` row.
    ///
    /// # Errors
    ///
    /// Returns store errors when lock acquisition fails.
    pub fn set_setting(&self, key: impl Into<String>, value: Option<String>) -> StoreResult<()> {
        let mut state = self.write_state()?;
        let stored_key = key.into();
        state.settings.retain(|(existing, _)| *existing != stored_key);
        state.settings.push((stored_key, value));
        Ok(())
    }

    /// Makes the next `count` store operations fail with a connection error.
    ///
    /// # Errors
    ///
    /// Returns store errors when lock acquisition fails.
    pub fn fail_next_operations(&self, count: usize) -> StoreResult<()> {
        self.fail_operations_after(0, count)
    }

    /// Lets `successes` operations through, then fails the following `count`.
    ///
    /// # Errors
    ///
    /// Returns store errors when lock acquisition fails.
    pub fn fail_operations_after(&self, successes: usize, count: usize) -> StoreResult<()> {
        let mut state = self.write_state()?;
        state.passing_before_failure = successes;
        state.failing_operations = count;
        Ok(())
    }

    /// Makes the next `count` reconnect attempts fail.
    ///
    /// # Errors
    ///
    /// Returns store errors when lock acquisition fails.
    pub fn fail_next_reconnects(&self, count: usize) -> StoreResult<()> {
        self.write_state()?.failing_reconnects = count;
        Ok(())
    }

    /// Returns a snapshot of the record, if present.
    ///
    /// # Errors
    ///
    /// Returns store errors when lock acquisition fails.
    pub fn record(&self, task_id: &TaskId) -> StoreResult<Option<TaskRecord>> {
        Ok(self.read_state()?.records.get(task_id).cloned())
    }

    /// Returns every status write that reached the store, in order.
    ///
    /// # Errors
    ///
    /// Returns store errors when lock acquisition fails.
    pub fn writes(&self) -> StoreResult<Vec<StatusUpdate>> {
        Ok(self.read_state()?.writes.clone())
    }

    /// Returns the number of operations attempted, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns store errors when lock acquisition fails.
    pub fn operation_count(&self) -> StoreResult<usize> {
        Ok(self.read_state()?.operations)
    }

    /// Returns the number of reconnect attempts.
    ///
    /// # Errors
    ///
    /// Returns store errors when lock acquisition fails.
    pub fn reconnect_count(&self) -> StoreResult<usize> {
        Ok(self.read_state()?.reconnects)
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn load_settings(&self) -> StoreResult<ScoringSettings> {
        let mut state = self.write_state()?;
        state.begin_operation()?;
        Ok(ScoringSettings::from_pairs(state.settings.clone()))
    }

    async fn task_exists(&self, task_id: &TaskId) -> StoreResult<bool> {
        let mut state = self.write_state()?;
        state.begin_operation()?;
        Ok(state.records.contains_key(task_id))
    }

    async fn update_status(&self, update: &StatusUpdate) -> StoreResult<u64> {
        let mut state = self.write_state()?;
        state.begin_operation()?;
        state.writes.push(update.clone());
        let Some(record) = state.records.get_mut(update.task_id()) else {
            return Ok(0);
        };
        record.apply(update).map_err(StoreError::query)?;
        Ok(1)
    }

    async fn reconnect(&self) -> StoreResult<()> {
        let mut state = self.write_state()?;
        state.reconnects += 1;
        if state.failing_reconnects > 0 {
            state.failing_reconnects -= 1;
            return Err(StoreError::connection(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(())
    }
}
