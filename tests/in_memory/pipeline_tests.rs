//! Consumption loop over scripted services.

use super::helpers::{Pipeline, pipeline, seed_task, task_payload};
use docscore::evaluation::{
    adapters::memory::ChannelMessageSource,
    domain::{Assessment, Score, TaskStatus},
    ports::ConversionError,
    services::{ConsumerSummary, run},
};
use eyre::{Result, eyre};
use rstest::rstest;

const CONVERTER: &str = "http://onlyoffice.local/ConvertService.ashx";

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mixed_batch_settles_every_known_task(pipeline: Pipeline) -> Result<()> {
    let scored = seed_task(&pipeline.store, "batch-1")?;
    let broken = seed_task(&pipeline.store, "batch-2")?;
    let finished = seed_task(&pipeline.store, "batch-3")?;

    pipeline
        .converter
        .push_reply(Ok("http://onlyoffice.local/cache/1.txt".to_owned()));
    pipeline.downloader.push_reply(Ok("正文 内容".to_owned()));
    pipeline
        .scorer
        .push_reply(Ok(Some(Assessment::new(Score::new(87)?, "良好"))));
    pipeline.converter.push_reply(Err(ConversionError::Failed {
        code: -4,
        message: "Error while downloading the document file to be converted",
    }));

    let (sender, mut source) = ChannelMessageSource::channel(8);
    sender.send(task_payload("batch-1", CONVERTER, "queued")?).await?;
    sender.send(b"garbage".to_vec()).await?;
    sender.send(task_payload("batch-2", CONVERTER, "queued")?).await?;
    sender.send(task_payload("batch-3", CONVERTER, "completed")?).await?;
    sender.send(task_payload("unknown", CONVERTER, "queued")?).await?;
    drop(sender);

    let summary = run(&mut source, &pipeline.service).await?;

    assert_eq!(
        summary,
        ConsumerSummary {
            delivered: 5,
            completed: 1,
            failed: 1,
            skipped: 1,
            dropped: 2,
        }
    );

    let scored_record = pipeline
        .store
        .record(&scored)?
        .ok_or_else(|| eyre!("scored record missing"))?;
    assert_eq!(scored_record.worker_status(), Some(TaskStatus::Completed));
    assert_eq!(scored_record.overall_score, 87);
    assert!(scored_record.score_time.is_some());

    let broken_record = pipeline
        .store
        .record(&broken)?
        .ok_or_else(|| eyre!("broken record missing"))?;
    assert_eq!(broken_record.worker_status(), Some(TaskStatus::Failed));
    assert_eq!(
        broken_record.doc_evaluation.as_deref(),
        Some(
            r#"{"error":"conversion service reported error -4: Error while downloading the document file to be converted"}"#
        )
    );

    let finished_record = pipeline
        .store
        .record(&finished)?
        .ok_or_else(|| eyre!("finished record missing"))?;
    assert_eq!(finished_record.status, "queued");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_processed_task_gets_pending_then_terminal(pipeline: Pipeline) -> Result<()> {
    seed_task(&pipeline.store, "order-1")?;
    seed_task(&pipeline.store, "order-2")?;
    for _ in 0..2 {
        pipeline
            .converter
            .push_reply(Ok("http://onlyoffice.local/cache/x.txt".to_owned()));
        pipeline.downloader.push_reply(Ok("text".to_owned()));
        pipeline
            .scorer
            .push_reply(Ok(Some(Assessment::new(Score::new(60)?, "及格"))));
    }

    let (sender, mut source) = ChannelMessageSource::channel(2);
    let producer = tokio::spawn(async move {
        for id in ["order-1", "order-2"] {
            let payload = task_payload(id, CONVERTER, "queued")?;
            sender.send(payload).await?;
        }
        Ok::<(), eyre::Report>(())
    });
    run(&mut source, &pipeline.service).await?;
    producer.await??;

    let trail: Vec<(String, TaskStatus)> = pipeline
        .store
        .writes()?
        .iter()
        .map(|update| (update.task_id().to_string(), update.status()))
        .collect();
    assert_eq!(
        trail,
        vec![
            ("order-1".to_owned(), TaskStatus::Pending),
            ("order-1".to_owned(), TaskStatus::Completed),
            ("order-2".to_owned(), TaskStatus::Pending),
            ("order-2".to_owned(), TaskStatus::Completed),
        ]
    );
    Ok(())
}
