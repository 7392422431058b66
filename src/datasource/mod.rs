//! Event source abstraction: where decoded lending events come from.

use crate::domain::{EventId, RawEvent};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod jsonl;
pub mod mock;

pub use jsonl::JsonlEventSource;
pub use mock::MockEventSource;

/// Source of decoded lending events.
///
/// Implementations need not sort their output; the indexer orders events by
/// (block number, log index) before projecting. Delivery order is only
/// guaranteed within one emitting contract: an event from one contract may
/// arrive after a later event from another.
#[async_trait]
pub trait EventSource: Send + Sync + fmt::Debug {
    /// Fetch every available event positioned strictly after `after`.
    ///
    /// # Arguments
    /// * `after` - Oldest per-contract cursor, or `None` to start from genesis
    async fn fetch_events(&self, after: Option<EventId>) -> Result<Vec<RawEvent>, SourceError>;
}

/// Error type for event source operations.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Source could not be read (missing file, closed stream).
    #[error("I/O error: {0}")]
    Io(String),
    /// An event could not be decoded.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    /// Temporary failure; the caller may retry.
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Unavailable(_))
    }
}

/// Keep events positioned strictly after `after`.
pub(crate) fn events_after(events: Vec<RawEvent>, after: Option<EventId>) -> Vec<RawEvent> {
    match after {
        Some(cursor) => events.into_iter().filter(|e| e.id() > cursor).collect(),
        None => events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Io("no such file".to_string());
        assert_eq!(err.to_string(), "I/O error: no such file");

        let err = SourceError::Parse {
            line: 3,
            message: "missing field `kind`".to_string(),
        };
        assert_eq!(err.to_string(), "parse error at line 3: missing field `kind`");

        let err = SourceError::Unavailable("rpc timeout".to_string());
        assert_eq!(err.to_string(), "source unavailable: rpc timeout");
    }

    #[test]
    fn test_only_unavailable_is_transient() {
        assert!(SourceError::Unavailable("x".to_string()).is_transient());
        assert!(!SourceError::Io("x".to_string()).is_transient());
        assert!(!SourceError::Parse {
            line: 1,
            message: "x".to_string()
        }
        .is_transient());
    }
}
