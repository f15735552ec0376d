//! Task store round trips against a live database.

use chrono::{TimeZone, Utc};
use docscore::evaluation::{
    adapters::postgres::PostgresTaskStore,
    domain::{Assessment, ENDPOINT_KEY, MODEL_KEY, Score, StatusUpdate, TaskStatus},
    ports::{StoreError, TaskStore},
    services::ResilientStore,
};
use eyre::{Result, eyre};

use super::helpers::{apply_schema, database_url, insert_task, put_config, unique_task_id};

#[tokio::test(flavor = "multi_thread")]
async fn status_writes_round_trip() -> Result<()> {
    let Some(url) = database_url().await else {
        return Ok(());
    };
    apply_schema(&url).await?;
    let task_id = unique_task_id("roundtrip")?;
    insert_task(&url, &task_id).await?;
    let store = PostgresTaskStore::connect(url).await?;
    let at = Utc
        .with_ymd_and_hms(2026, 3, 1, 8, 30, 0)
        .single()
        .ok_or_else(|| eyre!("valid timestamp"))?;

    assert!(store.task_exists(&task_id).await?);
    assert_eq!(
        store
            .update_status(&StatusUpdate::pending(task_id.clone(), at))
            .await?,
        1
    );
    let pending = store
        .find_record(&task_id)
        .await?
        .ok_or_else(|| eyre!("record missing"))?;
    assert_eq!(pending.worker_status(), Some(TaskStatus::Pending));
    assert_eq!(pending.doc_evaluation.as_deref(), Some("{}"));

    let assessment = Assessment::new(Score::new(87)?, "良好");
    store
        .update_status(&StatusUpdate::completed(task_id.clone(), assessment, at))
        .await?;
    let completed = store
        .find_record(&task_id)
        .await?
        .ok_or_else(|| eyre!("record missing"))?;
    assert_eq!(completed.status, "completed");
    assert_eq!(completed.overall_score, 87);
    assert_eq!(completed.doc_evaluation.as_deref(), Some(r#"{"comment":"良好"}"#));
    assert_eq!(completed.score_time, Some(at));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_is_absent_and_unwritten() -> Result<()> {
    let Some(url) = database_url().await else {
        return Ok(());
    };
    apply_schema(&url).await?;
    let store = PostgresTaskStore::connect(url).await?;
    let task_id = unique_task_id("absent")?;

    assert!(!store.task_exists(&task_id).await?);
    let affected = store
        .update_status(&StatusUpdate::failed(task_id.clone(), "boom", Utc::now()))
        .await?;
    assert_eq!(affected, 0);
    assert!(store.find_record(&task_id).await?.is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn settings_are_read_from_config_table() -> Result<()> {
    let Some(url) = database_url().await else {
        return Ok(());
    };
    apply_schema(&url).await?;
    put_config(&url, ENDPOINT_KEY, Some("http://llm.local")).await?;
    put_config(&url, MODEL_KEY, None).await?;
    let store = PostgresTaskStore::connect(url).await?;

    let settings = store.load_settings().await?;

    assert_eq!(settings.endpoint.as_deref(), Some("http://llm.local"));
    assert_eq!(settings.model, None);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn disconnected_store_recovers_through_policy() -> Result<()> {
    let Some(url) = database_url().await else {
        return Ok(());
    };
    apply_schema(&url).await?;
    let task_id = unique_task_id("recover")?;
    insert_task(&url, &task_id).await?;
    let store = PostgresTaskStore::disconnected(url);

    assert!(matches!(
        store.task_exists(&task_id).await,
        Err(StoreError::Disconnected)
    ));
    let resilient = ResilientStore::new(store);
    assert!(resilient.task_exists(&task_id).await?);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn reconnect_replaces_live_connection() -> Result<()> {
    let Some(url) = database_url().await else {
        return Ok(());
    };
    apply_schema(&url).await?;
    let task_id = unique_task_id("swap")?;
    insert_task(&url, &task_id).await?;
    let store = PostgresTaskStore::connect(url).await?;

    store.reconnect().await?;

    let record = store
        .find_record(&task_id)
        .await?
        .ok_or_else(|| eyre!("record missing"))?;
    assert_eq!(record.status, "queued");
    assert_eq!(record.overall_score, 0);
    assert_eq!(record.score_time, None);
    Ok(())
}
