use std::path::PathBuf;

use super::{EventSource, SourceError};
use crate::model::CollectionEvent;

/// Parse a JSON snapshot: an array of collection events, newest submission
/// first.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of events.
pub fn parse_snapshot(text: &str) -> Result<Vec<CollectionEvent>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Reads collection events from a JSON export of the event store.
///
/// The file is read afresh on every call.
#[derive(Debug, Clone)]
pub struct SnapshotEventSource {
    path: PathBuf,
}

impl SnapshotEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for SnapshotEventSource {
    fn collection_events(&self) -> Result<Vec<CollectionEvent>, SourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let events = parse_snapshot(&text).map_err(|source| SourceError::Snapshot {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            path = %self.path.display(),
            count = events.len(),
            "read collection events from snapshot"
        );
        Ok(events)
    }
}
