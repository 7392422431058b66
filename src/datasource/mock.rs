//! Mock event source for testing without a chain connection.

use super::{events_after, EventSource, SourceError};
use crate::domain::{EventId, RawEvent};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock source that returns predefined events.
///
/// Events can be appended after construction through a clone, which shares the
/// same backing list, to simulate a chain that keeps producing blocks.
#[derive(Debug, Clone, Default)]
pub struct MockEventSource {
    events: Arc<Mutex<Vec<RawEvent>>>,
    transient_failures: Arc<AtomicUsize>,
    fetch_count: Arc<AtomicUsize>,
}

impl MockEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(self, event: RawEvent) -> Self {
        self.push(event);
        self
    }

    pub fn with_events(self, events: Vec<RawEvent>) -> Self {
        for event in events {
            self.push(event);
        }
        self
    }

    /// Fail the next `n` fetches with [`SourceError::Unavailable`].
    pub fn with_transient_failures(self, n: usize) -> Self {
        self.transient_failures.store(n, Ordering::SeqCst);
        self
    }

    pub fn push(&self, event: RawEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Number of fetch attempts, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn fetch_events(&self, after: Option<EventId>) -> Result<Vec<RawEvent>, SourceError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(SourceError::Unavailable("mock outage".to_string()));
        }

        let events = self
            .events
            .lock()
            .map_err(|_| SourceError::Io("mock event list poisoned".to_string()))?
            .clone();
        Ok(events_after(events, after))
    }
}
