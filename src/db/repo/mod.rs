//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct, the SQLite implementation of
//! the entity store. Methods are organized across submodules:
//! - `entities.rs` - Factory, Pool, and User rows
//! - `records.rs` - Event record rows and record queries
//! - `cursor.rs` - Per-contract indexer cursors and registered pool lookup
//!
//! Row writers take a connection so [`Repository::apply_changeset`] can run them
//! inside one transaction.

mod cursor;
mod entities;
mod records;

pub use records::RecordFilter;

use crate::domain::{Address, Amount, EventId, EventRecord, Factory, Pool, User};
use crate::store::{Changeset, EntityStore, IndexerState, StoreError};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use std::collections::BTreeMap;

/// Repository for database operations.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Write one event's changes in a single transaction. Nothing is committed
    /// if any row fails.
    pub async fn apply_changeset(&self, changeset: &Changeset) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        if let Some(factory) = &changeset.factory {
            Self::upsert_factory(&mut *tx, factory).await?;
        }
        if let Some(user) = &changeset.user {
            Self::upsert_user(&mut *tx, user).await?;
        }
        if let Some(pool) = &changeset.pool {
            Self::upsert_pool(&mut *tx, pool).await?;
        }
        if let Some(record) = &changeset.record {
            Self::upsert_event_record(&mut *tx, record).await?;
        }
        for (contract, cursor) in &changeset.cursors {
            Self::advance_cursor(&mut *tx, contract, cursor).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn to_db_int(field: &'static str, value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::OutOfRange { field, value })
}

fn from_db_int(entity: &'static str, id: &str, value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::Corrupt {
        entity,
        id: id.to_string(),
        reason: format!("negative integer {}", value),
    })
}

fn parse_amount(entity: &'static str, id: &str, value: &str) -> Result<Amount, StoreError> {
    Amount::from_str_canonical(value).map_err(|e| StoreError::Corrupt {
        entity,
        id: id.to_string(),
        reason: e.to_string(),
    })
}

fn parse_address(entity: &'static str, id: &str, value: &str) -> Result<Address, StoreError> {
    Address::parse(value).map_err(|e| StoreError::Corrupt {
        entity,
        id: id.to_string(),
        reason: e.to_string(),
    })
}

fn parse_optional_address(
    entity: &'static str,
    id: &str,
    value: Option<String>,
) -> Result<Option<Address>, StoreError> {
    value
        .map(|v| parse_address(entity, id, &v))
        .transpose()
}

#[async_trait]
impl EntityStore for Repository {
    async fn load_factory(&self, id: &Address) -> Result<Option<Factory>, StoreError> {
        self.get_factory(id).await
    }

    async fn load_pool(&self, id: &Address) -> Result<Option<Pool>, StoreError> {
        self.get_pool(id).await
    }

    async fn load_user(&self, id: &Address) -> Result<Option<User>, StoreError> {
        self.get_user(id).await
    }

    async fn load_event_record(&self, id: &EventId) -> Result<Option<EventRecord>, StoreError> {
        self.get_event_record(id).await
    }

    async fn apply(&self, changeset: &Changeset) -> Result<(), StoreError> {
        self.apply_changeset(changeset).await
    }
}

#[async_trait]
impl IndexerState for Repository {
    async fn load_cursors(&self) -> Result<BTreeMap<Address, EventId>, StoreError> {
        self.get_cursors().await
    }

    async fn registered_pools(&self) -> Result<Vec<Address>, StoreError> {
        self.list_registered_pools().await
    }
}
