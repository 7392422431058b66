//! Indexer bookkeeping: per-contract cursors and registered pools.

use crate::domain::{Address, EventId};
use crate::store::StoreError;
use sqlx::sqlite::SqliteConnection;
use sqlx::Row;
use std::collections::BTreeMap;

use super::{from_db_int, now_ms, parse_address, to_db_int, Repository};

impl Repository {
    /// Last projected event for every contract that has one.
    pub async fn get_cursors(&self) -> Result<BTreeMap<Address, EventId>, StoreError> {
        let rows = sqlx::query("SELECT contract, block_number, log_index FROM indexer_cursors")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let contract: String = row.get("contract");
                let address = parse_address("cursor", &contract, &contract)?;
                let block_number = from_db_int("cursor", &contract, row.get("block_number"))?;
                let log_index = from_db_int("cursor", &contract, row.get("log_index"))?;
                Ok((address, EventId::new(block_number, log_index)))
            })
            .collect()
    }

    /// Move `contract`'s cursor to `cursor` unless it is already further along.
    pub(super) async fn advance_cursor(
        conn: &mut SqliteConnection,
        contract: &Address,
        cursor: &EventId,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO indexer_cursors (contract, block_number, log_index, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(contract) DO UPDATE SET
                block_number = excluded.block_number,
                log_index = excluded.log_index,
                updated_at = excluded.updated_at
            WHERE excluded.block_number > indexer_cursors.block_number
               OR (excluded.block_number = indexer_cursors.block_number
                   AND excluded.log_index > indexer_cursors.log_index)
            "#,
        )
        .bind(contract.as_str())
        .bind(to_db_int("cursor.block_number", cursor.block_number)?)
        .bind(to_db_int("cursor.log_index", cursor.log_index)?)
        .bind(now_ms())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Pools linked to a factory, in address order.
    pub async fn list_registered_pools(&self) -> Result<Vec<Address>, StoreError> {
        let rows = sqlx::query("SELECT id FROM pools WHERE factory IS NOT NULL ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                parse_address("pool", &id, &id)
            })
            .collect()
    }
}
