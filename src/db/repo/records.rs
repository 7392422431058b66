//! Event record rows.
//!
//! The full record is kept as JSON in `payload`; pool, user, amount, and the
//! chain position are duplicated into columns for filtering and ordering.

use crate::domain::{Address, EventId, EventRecord};
use crate::store::StoreError;
use sqlx::sqlite::SqliteConnection;
use sqlx::Row;

use super::{now_ms, to_db_int, Repository};

/// Filter for record listings. Results are newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub pool: Option<Address>,
    pub user: Option<Address>,
    pub limit: u32,
}

impl Default for RecordFilter {
    fn default() -> Self {
        RecordFilter {
            pool: None,
            user: None,
            limit: 100,
        }
    }
}

impl Repository {
    /// Load an event record by id.
    pub async fn get_event_record(&self, id: &EventId) -> Result<Option<EventRecord>, StoreError> {
        let row = sqlx::query("SELECT payload FROM event_records WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let payload: String = row.get("payload");
                Ok(Some(decode_payload(id, &payload)?))
            }
            None => Ok(None),
        }
    }

    /// Write the complete record row. A second write with the same id replaces
    /// the first.
    pub(super) async fn upsert_event_record(
        conn: &mut SqliteConnection,
        record: &EventRecord,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_string(record)?;

        sqlx::query(
            r#"
            INSERT INTO event_records (
                id, kind, pool, user, amount, block_number, log_index,
                timestamp, transaction_hash, payload, indexed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                kind = excluded.kind,
                pool = excluded.pool,
                user = excluded.user,
                amount = excluded.amount,
                block_number = excluded.block_number,
                log_index = excluded.log_index,
                timestamp = excluded.timestamp,
                transaction_hash = excluded.transaction_hash,
                payload = excluded.payload,
                indexed_at = excluded.indexed_at
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.kind().as_str())
        .bind(record.pool().as_str())
        .bind(record.user().map(|u| u.as_str()))
        .bind(record.amount().map(|a| a.to_canonical_string()))
        .bind(to_db_int("record.block_number", record.id.block_number)?)
        .bind(to_db_int("record.log_index", record.id.log_index)?)
        .bind(to_db_int("record.timestamp", record.timestamp)?)
        .bind(record.transaction_hash.as_str())
        .bind(payload)
        .bind(now_ms())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// List records matching the filter, newest first.
    pub async fn query_event_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<EventRecord>, StoreError> {
        let pool = filter.pool.as_ref().map(|a| a.as_str());
        let user = filter.user.as_ref().map(|a| a.as_str());

        let rows = sqlx::query(
            r#"
            SELECT id, payload
            FROM event_records
            WHERE (? IS NULL OR pool = ?)
              AND (? IS NULL OR user = ?)
            ORDER BY block_number DESC, log_index DESC
            LIMIT ?
            "#,
        )
        .bind(pool)
        .bind(pool)
        .bind(user)
        .bind(user)
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let payload: String = row.get("payload");
                serde_json::from_str::<EventRecord>(&payload).map_err(|e| StoreError::Corrupt {
                    entity: "event_record",
                    id,
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

fn decode_payload(id: &EventId, payload: &str) -> Result<EventRecord, StoreError> {
    serde_json::from_str(payload).map_err(|e| StoreError::Corrupt {
        entity: "event_record",
        id: id.to_string(),
        reason: e.to_string(),
    })
}
