//! Shared test helpers for in-memory pipeline integration tests.

use std::sync::Arc;

use docscore::evaluation::{
    adapters::memory::{InMemoryTaskStore, ScriptedConverter, ScriptedDownloader, ScriptedScorer},
    domain::{TaskId, TaskRecord},
    services::{EvaluationService, ResilientStore},
};
use eyre::Result;
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::json;

/// Engine built from scripted collaborators.
pub type ScriptedService = EvaluationService<
    InMemoryTaskStore,
    ScriptedConverter,
    ScriptedDownloader,
    ScriptedScorer,
    DefaultClock,
>;

/// Store, scripted services and the engine sharing them.
pub struct Pipeline {
    /// Task store.
    pub store: InMemoryTaskStore,
    /// Conversion stand-in.
    pub converter: ScriptedConverter,
    /// Download stand-in.
    pub downloader: ScriptedDownloader,
    /// Scoring stand-in.
    pub scorer: ScriptedScorer,
    /// Engine under test.
    pub service: ScriptedService,
}

/// Provides a fresh pipeline for each test.
#[fixture]
pub fn pipeline() -> Pipeline {
    let store = InMemoryTaskStore::new();
    let converter = ScriptedConverter::new();
    let downloader = ScriptedDownloader::new();
    let scorer = ScriptedScorer::new();
    let service = EvaluationService::new(
        Arc::new(ResilientStore::new(store.clone())),
        Arc::new(converter.clone()),
        Arc::new(downloader.clone()),
        Arc::new(scorer.clone()),
        Arc::new(DefaultClock),
    );
    Pipeline {
        store,
        converter,
        downloader,
        scorer,
        service,
    }
}

/// Inserts a `queued` record for `id`.
///
/// # Errors
///
/// Returns an error if the id is blank or the store rejects the insert.
pub fn seed_task(store: &InMemoryTaskStore, id: &str) -> Result<TaskId> {
    let task_id = TaskId::new(id)?;
    store.insert_record(TaskRecord::queued(task_id.clone()))?;
    Ok(task_id)
}

/// Encodes a task message addressed at `converter_url`.
///
/// # Errors
///
/// Returns an error if the message cannot be serialised.
pub fn task_payload(task_id: &str, converter_url: &str, status: &str) -> Result<Vec<u8>> {
    let message = json!({
        "task_id": task_id,
        "onlyoffice_url": converter_url,
        "param": { "async": false, "filetype": "docx", "outputtype": "txt", "key": task_id },
        "status": status,
    });
    Ok(serde_json::to_vec(&message)?)
}
