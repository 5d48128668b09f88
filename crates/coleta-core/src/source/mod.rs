//! Read interface over the collection event history.
//!
//! An [`EventSource`] hands the scheduler a complete snapshot of collection
//! events ordered **newest submission first**. Sources either return the
//! whole snapshot or fail; they never yield partial results.

mod snapshot;
mod sqlite;

pub use snapshot::{SnapshotEventSource, parse_snapshot};
pub use sqlite::SqliteEventSource;

use std::path::PathBuf;

use crate::model::CollectionEvent;

/// Errors from reading the collection event history.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A store query failed mid-read.
    #[error("event store query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A snapshot file could not be read.
    #[error("failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot file is not a valid event array.
    #[error("invalid snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A provider of collection events, newest submission first.
pub trait EventSource {
    /// Read every collection event in descending submission order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the read does not complete.
    fn collection_events(&self) -> Result<Vec<CollectionEvent>, SourceError>;
}

impl<T: EventSource + ?Sized> EventSource for &T {
    fn collection_events(&self) -> Result<Vec<CollectionEvent>, SourceError> {
        (**self).collection_events()
    }
}

impl<T: EventSource + ?Sized> EventSource for Box<T> {
    fn collection_events(&self) -> Result<Vec<CollectionEvent>, SourceError> {
        (**self).collection_events()
    }
}

/// An in-memory source, mostly for tests and embedding callers that already
/// hold a snapshot.
impl EventSource for [CollectionEvent] {
    fn collection_events(&self) -> Result<Vec<CollectionEvent>, SourceError> {
        Ok(self.to_vec())
    }
}

impl EventSource for Vec<CollectionEvent> {
    fn collection_events(&self) -> Result<Vec<CollectionEvent>, SourceError> {
        Ok(self.clone())
    }
}
