//! Indexer host loop: pulls events from the source and projects them one at a
//! time, in (block number, log index) order.
//!
//! Sources only promise ordering within one emitting contract, so progress is
//! tracked per contract. Each pass fetches from the oldest cursor among the
//! observed contracts and drops, per contract, what was already projected.

use crate::datasource::{EventSource, SourceError};
use crate::domain::{Address, EventId, RawEvent};
use crate::engine::{ProjectionError, Projector};
use crate::orchestration::watch::WatchList;
use crate::store::{IndexStore, StoreError};
use backoff::future::retry;
use backoff::ExponentialBackoff;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

pub struct Indexer<S> {
    source: Arc<dyn EventSource>,
    store: Arc<S>,
    projector: Projector,
    watch: WatchList,
    backoff: ExponentialBackoff,
    restored: bool,
}

/// Counts from a single indexing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexerReport {
    pub fetched: usize,
    pub projected: usize,
    /// Events dropped by the replay guard.
    pub duplicates: usize,
    /// Events at or before their contract's cursor, or from contracts not
    /// being observed.
    pub skipped: usize,
    /// Pools newly added to the watch list.
    pub registered: usize,
    /// Bound passed to the source for this pass.
    pub fetched_after: Option<EventId>,
    pub last_projected: Option<EventId>,
}

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<S: IndexStore + 'static> Indexer<S> {
    pub fn new(source: Arc<dyn EventSource>, store: Arc<S>, factories: &[Address]) -> Self {
        let projector = Projector::new(store.clone());
        Self {
            source,
            store,
            projector,
            watch: WatchList::new(factories.iter().cloned()),
            backoff: ExponentialBackoff {
                max_elapsed_time: Some(Duration::from_secs(30)),
                ..Default::default()
            },
            restored: false,
        }
    }

    pub fn with_replay_guard(mut self, enabled: bool) -> Self {
        self.projector = self.projector.with_replay_guard(enabled);
        self
    }

    /// Override the retry policy used for transient source failures.
    pub fn with_backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn watch_list(&self) -> &WatchList {
        &self.watch
    }

    /// Re-register pools already in the store so a restarted indexer keeps
    /// admitting their events.
    pub async fn restore(&mut self) -> Result<usize, IndexerError> {
        let pools = self.store.registered_pools().await?;
        let restored = pools
            .into_iter()
            .filter(|pool| self.watch.begin_observing(pool.clone()))
            .count();
        self.restored = true;
        info!(pools = restored, "Restored watch list from store");
        Ok(restored)
    }

    /// Fetch everything after the oldest observed cursor and project what each
    /// contract has not seen yet.
    ///
    /// Every projection writes its own cursor advance, so a failure leaves each
    /// contract on the last event that completed.
    pub async fn run_once(&mut self) -> Result<IndexerReport, IndexerError> {
        if !self.restored {
            self.restore().await?;
        }

        let mut cursors = self.store.load_cursors().await?;
        let after = self.low_water(&cursors);
        let mut events = self.fetch(after).await?;
        events.sort_by_key(RawEvent::id);

        let mut report = IndexerReport {
            fetched: events.len(),
            fetched_after: after,
            ..Default::default()
        };

        for event in &events {
            let event_id = event.id();
            if !self.watch.admits(event) {
                debug!(
                    event_id = %event_id,
                    emitter = %event.address,
                    kind = %event.event.kind(),
                    "Skipping event from unobserved contract"
                );
                report.skipped += 1;
                continue;
            }
            if cursors.get(&event.address).is_some_and(|c| event_id <= *c) {
                debug!(
                    event_id = %event_id,
                    emitter = %event.address,
                    "Skipping event already projected for this contract"
                );
                report.skipped += 1;
                continue;
            }

            let projection = self.projector.project(event).await?;
            if projection.skipped_duplicate {
                report.duplicates += 1;
            } else {
                report.projected += 1;
            }
            advance(&mut cursors, &event.address, event_id);

            for pool in projection.registrations {
                advance(&mut cursors, &pool, event_id);
                if self.watch.begin_observing(pool.clone()) {
                    info!(pool = %pool, event_id = %event_id, "Observing new lending pool");
                    report.registered += 1;
                }
            }
            report.last_projected = Some(event_id);
        }

        Ok(report)
    }

    /// Poll the source forever. Failed passes are logged and retried on the
    /// next tick.
    pub async fn run(mut self, poll_interval: Duration) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.run_once().await {
                Ok(report) if report.projected > 0 || report.registered > 0 => info!(
                    projected = report.projected,
                    registered = report.registered,
                    skipped = report.skipped,
                    duplicates = report.duplicates,
                    last_projected = ?report.last_projected.map(|c| c.to_string()),
                    "Indexing pass complete"
                ),
                Ok(_) => debug!("No new events"),
                Err(e) => error!(error = %e, "Indexing pass failed"),
            }
        }
    }

    /// Oldest cursor among observed contracts. `None`, a full fetch, while any
    /// of them has not projected an event yet.
    fn low_water(&self, cursors: &BTreeMap<Address, EventId>) -> Option<EventId> {
        self.watch
            .contracts()
            .map(|contract| cursors.get(contract).copied())
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .min()
    }

    async fn fetch(&self, after: Option<EventId>) -> Result<Vec<RawEvent>, SourceError> {
        retry(self.backoff.clone(), || async {
            self.source.fetch_events(after).await.map_err(|e| {
                if e.is_transient() {
                    warn!(error = %e, "Event source unavailable, retrying");
                    backoff::Error::transient(e)
                } else {
                    backoff::Error::permanent(e)
                }
            })
        })
        .await
    }
}

fn advance(cursors: &mut BTreeMap<Address, EventId>, contract: &Address, event_id: EventId) {
    let cursor = cursors.entry(contract.clone()).or_insert(event_id);
    if event_id > *cursor {
        *cursor = event_id;
    }
}
