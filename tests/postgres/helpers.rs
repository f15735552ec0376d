//! Shared test helpers for `PostgreSQL` integration tests.

use super::cluster::shared_cluster;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use docscore::evaluation::domain::TaskId;
use eyre::{Result, WrapErr};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use uuid::Uuid;

static SCHEMA_APPLIED: Mutex<bool> = Mutex::const_new(false);

/// Environment variable naming the test database.
pub const DATABASE_URL_ENV: &str = "DOCSCORE_TEST_DATABASE_URL";

/// SQL creating the task and settings tables.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_score_tables/up.sql");

/// Returns the test database URL.
///
/// `DOCSCORE_TEST_DATABASE_URL` wins when set; otherwise the shared embedded
/// cluster is used. `None` means neither is available and the cluster has
/// already printed a skip notice.
pub async fn database_url() -> Option<SecretString> {
    if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
        return Some(SecretString::from(url));
    }
    let cluster = shared_cluster().await?;
    Some(SecretString::from(cluster.database_url().to_owned()))
}

/// Returns a task identifier no other test uses.
///
/// # Errors
///
/// Returns an error if the generated identifier is rejected.
pub fn unique_task_id(prefix: &str) -> Result<TaskId> {
    Ok(TaskId::new(format!("{prefix}-{}", Uuid::new_v4().simple()))?)
}

async fn with_connection<T, F>(url: &SecretString, f: F) -> Result<T>
where
    F: FnOnce(&mut PgConnection) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let raw = url.expose_secret().to_owned();
    tokio::task::spawn_blocking(move || {
        let mut connection = PgConnection::establish(&raw).wrap_err("connect to test database")?;
        f(&mut connection)
    })
    .await?
}

/// Applies the schema migration once per test binary.
///
/// # Errors
///
/// Returns an error if the connection or the migration fails.
pub async fn apply_schema(url: &SecretString) -> Result<()> {
    let mut applied = SCHEMA_APPLIED.lock().await;
    if *applied {
        return Ok(());
    }
    with_connection(url, |connection| {
        connection
            .batch_execute(CREATE_SCHEMA_SQL)
            .wrap_err("apply schema")
    })
    .await?;
    *applied = true;
    Ok(())
}

/// Inserts a `queued` task row.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn insert_task(url: &SecretString, task_id: &TaskId) -> Result<()> {
    let id = task_id.as_str().to_owned();
    with_connection(url, move |connection| {
        diesel::sql_query("INSERT INTO ai_doc_score_record (id) VALUES ($1)")
            .bind::<Text, _>(id)
            .execute(connection)
            .wrap_err("insert task")?;
        Ok(())
    })
    .await
}

/// Inserts or replaces one `config` row.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub async fn put_config(url: &SecretString, key: &str, value: Option<&str>) -> Result<()> {
    let stored_key = key.to_owned();
    let stored_value = value.map(str::to_owned);
    with_connection(url, move |connection| {
        diesel::sql_query(
            "INSERT INTO config (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind::<Text, _>(stored_key)
        .bind::<Nullable<Text>, _>(stored_value)
        .execute(connection)
        .wrap_err("upsert config")?;
        Ok(())
    })
    .await
}
