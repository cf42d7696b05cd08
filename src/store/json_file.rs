//! Flat-file JSON event store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::event::Event;

use super::traits::EventStore;

/// The on-disk document shape: `{ "events": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct EventDocument {
    #[serde(default)]
    events: Vec<Event>,
}

/// Durable event store backed by a single JSON file.
///
/// The file is read once at [`open`](JsonFileStore::open) and served
/// from memory afterwards; every mutation writes the whole document
/// back through a temp-file rename. The inner lock serializes
/// mutations within the process; cross-process writers are not
/// coordinated.
pub struct JsonFileStore {
    path: PathBuf,
    events: RwLock<Vec<Event>>,
}

impl JsonFileStore {
    /// Open the store, creating an empty document if the file does not
    /// exist yet. This is the explicit initialization step: backends
    /// never probe for the file on individual calls.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(StoreError::Io)?;
            }
        }

        let events = match fs::read_to_string(&path).await {
            Ok(content) => {
                let document: EventDocument =
                    serde_json::from_str(&content).map_err(StoreError::Corrupt)?;
                document.events
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                write_document(&path, &EventDocument::default()).await?;
                Vec::new()
            }
            Err(err) => return Err(StoreError::Io(err).into()),
        };

        info!(path = %path.display(), count = events.len(), "event store opened");
        Ok(Self {
            path,
            events: RwLock::new(events),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serialize and atomically replace the document file.
async fn write_document(path: &Path, document: &EventDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document).map_err(StoreError::Corrupt)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).await.map_err(StoreError::Io)?;
    fs::rename(&tmp, path).await.map_err(StoreError::Io)?;
    Ok(())
}

#[async_trait]
impl EventStore for JsonFileStore {
    async fn read_all(&self) -> Result<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn append(&self, event: Event) -> Result<()> {
        let mut events = self.events.write().await;
        events.push(event);
        write_document(
            &self.path,
            &EventDocument {
                events: events.clone(),
            },
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|event| !event.matches_id(id));
        let removed = before - events.len();

        if removed > 0 {
            write_document(
                &self.path,
                &EventDocument {
                    events: events.clone(),
                },
            )
            .await?;
        }
        debug!(id, removed, "delete from event store");
        Ok(removed)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample_event(title: &str) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 1, 11, 14, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 11, 15, 0, 0).unwrap();
        Event::new(title, start).with_end(end)
    }

    #[tokio::test]
    async fn test_open_creates_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(path.exists());
        assert!(store.read_all().await.unwrap().is_empty());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"events\""));
    }

    #[tokio::test]
    async fn test_append_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");

        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store.append(sample_event("Persisted")).await.unwrap();
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let events = reopened.read_all().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Persisted");
    }

    #[tokio::test]
    async fn test_delete_by_surrogate_id() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("events.json"))
            .await
            .unwrap();

        let event = sample_event("Doomed");
        store.append(event.clone()).await.unwrap();
        store.append(sample_event("Kept")).await.unwrap();

        let removed = store.delete(&event.id).await.unwrap();
        assert_eq!(removed, 1);

        let remaining = store.read_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Kept");
    }

    #[tokio::test]
    async fn test_delete_by_composite_removes_all_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("events.json"))
            .await
            .unwrap();

        // Two distinct records sharing start and title share the
        // composite identity.
        let first = sample_event("Twin");
        let second = sample_event("Twin");
        assert_ne!(first.id, second.id);
        store.append(first.clone()).await.unwrap();
        store.append(second).await.unwrap();

        let removed = store.delete(&first.composite_id()).await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_loads_legacy_document_without_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"{
                "events": [
                    {
                        "title": "Legacy",
                        "start": "2024-01-11T14:00:00Z",
                        "end": "2024-01-11T15:00:00Z",
                        "allDay": false
                    }
                ]
            }"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        let events = store.read_all().await.unwrap();
        assert_eq!(events.len(), 1);

        let removed = store
            .delete("2024-01-11T14:00:00Z-Legacy")
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(JsonFileStore::open(&path).await.is_err());
    }
}
