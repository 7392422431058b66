//! Entity store abstraction used by the projection engine.
//!
//! Writes are full-record upserts keyed by id, grouped per event into a
//! [`Changeset`]. A missing entity is `Ok(None)`, never an error.

use crate::domain::{Address, EventId, EventRecord, Factory, Pool, User};
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("corrupt {entity} row {id}: {reason}")]
    Corrupt {
        entity: &'static str,
        id: String,
        reason: String,
    },
    #[error("{field} out of range for storage: {value}")]
    OutOfRange { field: &'static str, value: u64 },
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Everything one event writes. Applied as a unit by [`EntityStore::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    pub factory: Option<Factory>,
    pub pool: Option<Pool>,
    pub user: Option<User>,
    pub record: Option<EventRecord>,
    /// Per-contract cursor advances. A stored cursor never moves backwards.
    pub cursors: Vec<(Address, EventId)>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.factory.is_none()
            && self.pool.is_none()
            && self.user.is_none()
            && self.record.is_none()
            && self.cursors.is_empty()
    }
}

/// Loads per entity type plus one atomic write path.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn load_factory(&self, id: &Address) -> Result<Option<Factory>, StoreError>;
    async fn load_pool(&self, id: &Address) -> Result<Option<Pool>, StoreError>;
    async fn load_user(&self, id: &Address) -> Result<Option<User>, StoreError>;
    async fn load_event_record(&self, id: &EventId) -> Result<Option<EventRecord>, StoreError>;

    /// Write every part of `changeset`, or nothing if any part fails.
    async fn apply(&self, changeset: &Changeset) -> Result<(), StoreError>;
}

/// Host-side bookkeeping the indexer needs to resume after a restart.
#[async_trait]
pub trait IndexerState: Send + Sync {
    /// Last projected event per emitting contract.
    async fn load_cursors(&self) -> Result<BTreeMap<Address, EventId>, StoreError>;
    /// Pools created by a factory, i.e. those the source must keep observing.
    async fn registered_pools(&self) -> Result<Vec<Address>, StoreError>;
}

/// Everything the indexer host requires from a store.
pub trait IndexStore: EntityStore + IndexerState {}

impl<T: EntityStore + IndexerState> IndexStore for T {}
