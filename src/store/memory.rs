//! In-memory entity store for tests and dry runs.

use super::{Changeset, EntityStore, IndexerState, StoreError};
use crate::domain::{Address, EventId, EventRecord, Factory, Pool, User};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    factories: HashMap<Address, Factory>,
    pools: HashMap<Address, Pool>,
    users: HashMap<Address, User>,
    records: BTreeMap<EventId, EventRecord>,
    cursors: BTreeMap<Address, EventId>,
}

/// Store backed by hash maps. Can be switched to fail every call to exercise
/// error propagation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// All event records in (block, log index) order.
    pub async fn event_records(&self) -> Vec<EventRecord> {
        self.state.lock().await.records.values().cloned().collect()
    }

    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn load_factory(&self, id: &Address) -> Result<Option<Factory>, StoreError> {
        self.check()?;
        Ok(self.state.lock().await.factories.get(id).cloned())
    }

    async fn load_pool(&self, id: &Address) -> Result<Option<Pool>, StoreError> {
        self.check()?;
        Ok(self.state.lock().await.pools.get(id).cloned())
    }

    async fn load_user(&self, id: &Address) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self.state.lock().await.users.get(id).cloned())
    }

    async fn load_event_record(&self, id: &EventId) -> Result<Option<EventRecord>, StoreError> {
        self.check()?;
        Ok(self.state.lock().await.records.get(id).cloned())
    }

    async fn apply(&self, changeset: &Changeset) -> Result<(), StoreError> {
        self.check()?;
        let mut state = self.state.lock().await;

        if let Some(factory) = &changeset.factory {
            state.factories.insert(factory.id.clone(), factory.clone());
        }
        if let Some(user) = &changeset.user {
            state.users.insert(user.id.clone(), user.clone());
        }
        if let Some(pool) = &changeset.pool {
            state.pools.insert(pool.id.clone(), pool.clone());
        }
        if let Some(record) = &changeset.record {
            state.records.insert(record.id, record.clone());
        }
        for (contract, event_id) in &changeset.cursors {
            let cursor = state.cursors.entry(contract.clone()).or_insert(*event_id);
            if *event_id > *cursor {
                *cursor = *event_id;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl IndexerState for MemoryStore {
    async fn load_cursors(&self) -> Result<BTreeMap<Address, EventId>, StoreError> {
        self.check()?;
        Ok(self.state.lock().await.cursors.clone())
    }

    async fn registered_pools(&self) -> Result<Vec<Address>, StoreError> {
        self.check()?;
        let state = self.state.lock().await;
        let mut pools: Vec<Address> = state
            .pools
            .values()
            .filter(|p| p.factory.is_some())
            .map(|p| p.id.clone())
            .collect();
        pools.sort();
        Ok(pools)
    }
}
