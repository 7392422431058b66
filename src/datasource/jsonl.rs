//! JSON-lines event feed: one `RawEvent` per line.

use super::{events_after, EventSource, SourceError};
use crate::domain::{EventId, RawEvent};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Reads the whole file on every fetch, so lines appended between polls are
/// picked up on the next call.
#[derive(Debug, Clone)]
pub struct JsonlEventSource {
    path: PathBuf,
}

impl JsonlEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Decode a JSON-lines document. Blank lines are ignored; line numbers in errors
/// are 1-based.
pub fn parse_events(content: &str) -> Result<Vec<RawEvent>, SourceError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<RawEvent>(line).map_err(|e| SourceError::Parse {
                line: idx + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl EventSource for JsonlEventSource {
    async fn fetch_events(&self, after: Option<EventId>) -> Result<Vec<RawEvent>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io(format!("{}: {}", self.path.display(), e)))?;

        let events = parse_events(&content)?;
        debug!(path = %self.path.display(), count = events.len(), "Read event feed");
        Ok(events_after(events, after))
    }
}
