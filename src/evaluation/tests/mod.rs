//! Unit tests for the evaluation module.


use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::evaluation::{
    adapters::memory::{InMemoryTaskStore, ScriptedConverter, ScriptedDownloader, ScriptedScorer},
    domain::{TaskId, TaskRecord},
    services::{EvaluationService, ResilientStore},
};

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Returns a clock pinned to 2026-03-01T08:30:00Z.
    pub fn morning() -> Self {
        Self(
            Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub type TestService = EvaluationService<
    InMemoryTaskStore,
    ScriptedConverter,
    ScriptedDownloader,
    ScriptedScorer,
    FixedClock,
>;

/// Engine wired to in-memory collaborators, with handles kept for assertions.
pub struct Harness {
    pub store: InMemoryTaskStore,
    pub converter: ScriptedConverter,
    pub downloader: ScriptedDownloader,
    pub scorer: ScriptedScorer,
    pub clock: FixedClock,
    pub service: TestService,
}

impl Harness {
    pub fn new() -> Self {
        let store = InMemoryTaskStore::new();
        let converter = ScriptedConverter::new();
        let downloader = ScriptedDownloader::new();
        let scorer = ScriptedScorer::new();
        let clock = FixedClock::morning();
        let service = EvaluationService::new(
            Arc::new(ResilientStore::new(store.clone())),
            Arc::new(converter.clone()),
            Arc::new(downloader.clone()),
            Arc::new(scorer.clone()),
            Arc::new(clock),
        );
        Self {
            store,
            converter,
            downloader,
            scorer,
            clock,
            service,
        }
    }

    /// Seeds a `queued` record and returns its id.
    pub fn seed(&self, id: &str) -> TaskId {
        let task_id = TaskId::new(id).expect("valid task id");
        self.store
            .insert_record(TaskRecord::queued(task_id.clone()))
            .expect("seed record");
        task_id
    }
}

/// Builds a task message payload.
pub fn payload(task_id: &str, status: Option<&str>) -> Vec<u8> {
    let mut message = serde_json::json!({
        "task_id": task_id,
        "onlyoffice_url": "http://convert.local/ConvertService.ashx",
        "param": { "filetype": "docx", "outputtype": "txt", "key": task_id },
    });
    if let (Some(value), Some(fields)) = (status, message.as_object_mut()) {
        fields.insert("status".to_owned(), serde_json::Value::from(value));
    }
    serde_json::to_vec(&message).expect("serialisable payload")
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let address = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{address}")
}

/// Returns a base URL nothing listens on.
pub async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let address = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{address}")
}

/// HTTP client with a short timeout for adapter tests.
pub fn client(timeout: Duration) -> reqwest::Client {
    crate::evaluation::adapters::http::build_client(timeout).expect("http client")
}
