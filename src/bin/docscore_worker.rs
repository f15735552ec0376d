//! Runs the document scoring worker.
//!
//! Usage:
//!
//! ```text
//! queue-consumer --topic ai-doc-score | docscore-worker
//! ```
//!
//! Each line read from standard input is one task message. The worker stops
//! at end of input or on Ctrl-C, after finishing the message in hand. Run
//! `docscore-worker --help` for the database, timeout and logging options.

use std::sync::Arc;

use clap::Parser;
use docscore::{
    evaluation::{
        adapters::{
            http::{HttpDocumentDownloader, OnlyOfficeConverter, OpenAiScorer, build_client},
            lines::LineMessageSource,
            postgres::PostgresTaskStore,
        },
        ports::TaskStore,
        services::{EvaluationService, ResilientStore, run_until},
    },
    settings::WorkerSettings,
    telemetry,
};
use mockable::DefaultClock;
use tokio::{io::BufReader, runtime::Builder};
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    let settings = WorkerSettings::parse();
    if !telemetry::init(settings.log_format) {
        warn!("a tracing subscriber was already installed; keeping it");
    }

    let runtime = Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run(settings))
}

async fn run(settings: WorkerSettings) -> Result<(), BoxError> {
    let database_url = settings.database_url()?;
    let store = PostgresTaskStore::disconnected(database_url);
    if let Err(err) = store.reconnect().await {
        warn!(error = %err, "initial database connection failed; will reconnect on first use");
    }

    let client = build_client(settings.http_timeout())?;
    let service = EvaluationService::new(
        Arc::new(ResilientStore::new(store)),
        Arc::new(OnlyOfficeConverter::new(client.clone())),
        Arc::new(HttpDocumentDownloader::new(client.clone())),
        Arc::new(OpenAiScorer::new(client)),
        Arc::new(DefaultClock),
    );

    let mut source = LineMessageSource::new(BufReader::new(tokio::io::stdin()));
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "could not listen for Ctrl-C; running until end of input");
            std::future::pending::<()>().await;
        }
    };

    info!("worker started");
    let summary = run_until(&mut source, &service, shutdown).await?;
    info!(
        delivered = summary.delivered,
        completed = summary.completed,
        failed = summary.failed,
        skipped = summary.skipped,
        dropped = summary.dropped,
        "worker stopped"
    );
    Ok(())
}
