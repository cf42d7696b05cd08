//! End-to-end ingestion tests against the file-backed store.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tempfile::TempDir;

use almanac::{EventStore, IngestOutcome, IngestionPipeline, JsonFileStore};

const REFERENCE: (i32, u32, u32) = (2024, 1, 10); // a Wednesday

async fn pipeline_in(dir: &TempDir) -> (IngestionPipeline, Arc<JsonFileStore>) {
    let store = Arc::new(
        JsonFileStore::open(dir.path().join("events.json"))
            .await
            .unwrap(),
    );
    let (y, m, d) = REFERENCE;
    let pipeline = IngestionPipeline::with_reference_date(
        store.clone(),
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
    );
    (pipeline, store)
}

#[tokio::test]
async fn test_ingest_persists_to_disk() {
    let dir = TempDir::new().unwrap();

    {
        let (pipeline, _store) = pipeline_in(&dir).await;
        let outcome = pipeline
            .ingest("Team meeting Thursday at 2pm", false)
            .await
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Created(_)));
    }

    // A fresh store over the same file sees the event.
    let reopened = JsonFileStore::open(dir.path().join("events.json"))
        .await
        .unwrap();
    let events = reopened.read_all().await.unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].title.contains("meeting"));
    assert!(!events[0].all_day);
    assert_eq!(
        events[0].effective_end() - events[0].start,
        Duration::hours(1)
    );
}

#[tokio::test]
async fn test_conflicting_ingest_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let (pipeline, store) = pipeline_in(&dir).await;

    pipeline
        .ingest("Standup Thursday 2pm to 3pm", false)
        .await
        .unwrap();
    let outcome = pipeline
        .ingest("Dentist Thursday at 2:30pm", false)
        .await
        .unwrap();

    let IngestOutcome::Conflict {
        conflicts,
        proposed,
    } = outcome
    else {
        panic!("expected a conflict");
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(proposed.title, "Dentist");
    assert_eq!(store.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_by_composite_identity() {
    let dir = TempDir::new().unwrap();
    let (pipeline, store) = pipeline_in(&dir).await;

    let outcome = pipeline
        .ingest("Conference next Monday", false)
        .await
        .unwrap();
    let IngestOutcome::Created(event) = outcome else {
        panic!("expected Created");
    };
    assert!(event.all_day);

    let removed = store.delete(&event.composite_id()).await.unwrap();
    assert_eq!(removed, 1);
    assert!(store.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_ingestions_detect_each_other() {
    let dir = TempDir::new().unwrap();
    let (pipeline, store) = pipeline_in(&dir).await;
    let pipeline = Arc::new(pipeline);

    // Two overlapping descriptions racing through the same pipeline:
    // the write guard serializes them, so exactly one may win.
    let a = {
        let p = pipeline.clone();
        tokio::spawn(async move { p.ingest("Standup Thursday 2pm to 3pm", false).await })
    };
    let b = {
        let p = pipeline.clone();
        tokio::spawn(async move { p.ingest("Dentist Thursday at 2:30pm", false).await })
    };

    let outcomes = [a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];
    let created = outcomes
        .iter()
        .filter(|o| matches!(o, IngestOutcome::Created(_)))
        .count();
    let conflicted = outcomes
        .iter()
        .filter(|o| matches!(o, IngestOutcome::Conflict { .. }))
        .count();

    assert_eq!(created, 1);
    assert_eq!(conflicted, 1);
    assert_eq!(store.read_all().await.unwrap().len(), 1);
}
