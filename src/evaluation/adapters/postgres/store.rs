//! `PostgreSQL` task store owning a single replaceable connection.

use super::{
    models::{StatusChangeset, TaskRecordRow},
    schema::{ai_doc_score_record, config},
};
use crate::evaluation::{
    domain::{SETTING_KEYS, ScoringSettings, StatusUpdate, TaskId, TaskRecord},
    ports::{StoreError, StoreResult, TaskStore},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// `PostgreSQL`-backed task store.
///
/// The store owns one connection. Statements run on the blocking pool with
/// the connection locked; [`TaskStore::reconnect`] swaps in a freshly
/// established connection.
#[derive(Clone)]
pub struct PostgresTaskStore {
    database_url: Arc<SecretString>,
    connection: Arc<Mutex<Option<PgConnection>>>,
}

impl std::fmt::Debug for PostgresTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresTaskStore")
            .field("database_url", &self.database_url)
            .finish_non_exhaustive()
    }
}

impl PostgresTaskStore {
    /// Creates a store without connecting.
    ///
    /// The first operation fails with [`StoreError::Disconnected`], which the
    /// reconnect policy turns into a connection attempt.
    #[must_use]
    pub fn disconnected(database_url: SecretString) -> Self {
        Self {
            database_url: Arc::new(database_url),
            connection: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates a store and establishes its connection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] when the database is unreachable.
    pub async fn connect(database_url: SecretString) -> StoreResult<Self> {
        let store = Self::disconnected(database_url);
        store.reconnect().await?;
        Ok(store)
    }

    /// Loads a task record snapshot.
    ///
    /// # Errors
    ///
    /// Returns store errors when the query fails.
    pub async fn find_record(&self, task_id: &TaskId) -> StoreResult<Option<TaskRecord>> {
        let id = task_id.clone();
        self.run_blocking(move |connection| {
            let row = ai_doc_score_record::table
                .filter(ai_doc_score_record::id.eq(id.as_str()))
                .select(TaskRecordRow::as_select())
                .first::<TaskRecordRow>(connection)
                .optional()
                .map_err(StoreError::query)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut guard = connection
                .lock()
                .map_err(|err| StoreError::connection(std::io::Error::other(err.to_string())))?;
            let live = guard.as_mut().ok_or(StoreError::Disconnected)?;
            f(live)
        })
        .await
        .map_err(StoreError::connection)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn load_settings(&self) -> StoreResult<ScoringSettings> {
        self.run_blocking(|connection| {
            let rows = config::table
                .filter(config::key.eq_any(SETTING_KEYS.to_vec()))
                .select((config::key, config::value))
                .load::<(String, Option<String>)>(connection)
                .map_err(StoreError::query)?;
            Ok(ScoringSettings::from_pairs(rows))
        })
        .await
    }

    async fn task_exists(&self, task_id: &TaskId) -> StoreResult<bool> {
        let id = task_id.clone();
        self.run_blocking(move |connection| {
            let count = ai_doc_score_record::table
                .filter(ai_doc_score_record::id.eq(id.as_str()))
                .count()
                .get_result::<i64>(connection)
                .map_err(StoreError::query)?;
            Ok(count > 0)
        })
        .await
    }

    async fn update_status(&self, update: &StatusUpdate) -> StoreResult<u64> {
        let id = update.task_id().clone();
        let changeset = to_changeset(update)?;
        self.run_blocking(move |connection| {
            let affected = diesel::update(
                ai_doc_score_record::table.filter(ai_doc_score_record::id.eq(id.as_str())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(StoreError::query)?;
            u64::try_from(affected).map_err(StoreError::query)
        })
        .await
    }

    async fn reconnect(&self) -> StoreResult<()> {
        let url = self.database_url.expose_secret().to_owned();
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            // A panic mid-statement poisons the lock; the connection it
            // guarded is discarded either way.
            let mut guard = connection.lock().unwrap_or_else(PoisonError::into_inner);
            guard.take();
            connection.clear_poison();
            let fresh = PgConnection::establish(&url).map_err(StoreError::connection)?;
            *guard = Some(fresh);
            Ok::<(), StoreError>(())
        })
        .await
        .map_err(StoreError::connection)??;
        info!("database connection established");
        Ok(())
    }
}

fn to_changeset(update: &StatusUpdate) -> StoreResult<StatusChangeset> {
    let doc_evaluation = update.evaluation().to_json().map_err(StoreError::query)?;
    Ok(StatusChangeset {
        status: update.status().as_str().to_owned(),
        doc_evaluation: Some(doc_evaluation),
        overall_score: i32::from(update.overall_score().value()),
        score_time: Some(update.recorded_at()),
    })
}

fn row_to_record(row: TaskRecordRow) -> StoreResult<TaskRecord> {
    let TaskRecordRow {
        id,
        status,
        doc_evaluation,
        overall_score,
        score_time,
    } = row;
    Ok(TaskRecord {
        id: TaskId::new(id).map_err(StoreError::query)?,
        status,
        doc_evaluation,
        overall_score,
        score_time,
    })
}
