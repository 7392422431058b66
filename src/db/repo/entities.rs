//! Aggregate entity rows: factories, pools, users.

use crate::domain::{Address, Factory, Pool, User};
use crate::store::StoreError;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

use super::{
    from_db_int, now_ms, parse_amount, parse_optional_address, to_db_int, Repository,
};

impl Repository {
    /// Load a factory by address.
    pub async fn get_factory(&self, id: &Address) -> Result<Option<Factory>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, total_pools_created, created
            FROM factories
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| factory_from_row(id, &row)).transpose()
    }

    /// Write the complete factory row, replacing any existing one.
    pub(super) async fn upsert_factory(
        conn: &mut SqliteConnection,
        factory: &Factory,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO factories (id, total_pools_created, created, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                total_pools_created = excluded.total_pools_created,
                created = excluded.created,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(factory.id.as_str())
        .bind(factory.total_pools_created.to_canonical_string())
        .bind(to_db_int("factory.created", factory.created)?)
        .bind(now_ms())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Load a pool by address.
    pub async fn get_pool(&self, id: &Address) -> Result<Option<Pool>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, factory, token0, token1, total_deposits, total_withdrawals,
                   total_borrows, total_repays, created
            FROM pools
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| pool_from_row(id, &row)).transpose()
    }

    /// Write the complete pool row, replacing any existing one.
    pub(super) async fn upsert_pool(
        conn: &mut SqliteConnection,
        pool: &Pool,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO pools (
                id, factory, token0, token1, total_deposits, total_withdrawals,
                total_borrows, total_repays, created, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                factory = excluded.factory,
                token0 = excluded.token0,
                token1 = excluded.token1,
                total_deposits = excluded.total_deposits,
                total_withdrawals = excluded.total_withdrawals,
                total_borrows = excluded.total_borrows,
                total_repays = excluded.total_repays,
                created = excluded.created,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(pool.id.as_str())
        .bind(pool.factory.as_ref().map(|a| a.as_str()))
        .bind(pool.token0.as_ref().map(|a| a.as_str()))
        .bind(pool.token1.as_ref().map(|a| a.as_str()))
        .bind(pool.total_deposits.to_canonical_string())
        .bind(pool.total_withdrawals.to_canonical_string())
        .bind(pool.total_borrows.to_canonical_string())
        .bind(pool.total_repays.to_canonical_string())
        .bind(to_db_int("pool.created", pool.created)?)
        .bind(now_ms())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Load a user by wallet address.
    pub async fn get_user(&self, id: &Address) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, total_deposited, total_withdrawn, total_borrowed, total_repaid
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| user_from_row(id, &row)).transpose()
    }

    /// Write the complete user row, replacing any existing one.
    pub(super) async fn upsert_user(
        conn: &mut SqliteConnection,
        user: &User,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, total_deposited, total_withdrawn, total_borrowed, total_repaid, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                total_deposited = excluded.total_deposited,
                total_withdrawn = excluded.total_withdrawn,
                total_borrowed = excluded.total_borrowed,
                total_repaid = excluded.total_repaid,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user.id.as_str())
        .bind(user.total_deposited.to_canonical_string())
        .bind(user.total_withdrawn.to_canonical_string())
        .bind(user.total_borrowed.to_canonical_string())
        .bind(user.total_repaid.to_canonical_string())
        .bind(now_ms())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

fn factory_from_row(id: &Address, row: &SqliteRow) -> Result<Factory, StoreError> {
    const ENTITY: &str = "factory";
    let key = id.as_str();
    Ok(Factory {
        id: id.clone(),
        total_pools_created: parse_amount(ENTITY, key, row.get("total_pools_created"))?,
        created: from_db_int(ENTITY, key, row.get("created"))?,
    })
}

fn pool_from_row(id: &Address, row: &SqliteRow) -> Result<Pool, StoreError> {
    const ENTITY: &str = "pool";
    let key = id.as_str();
    Ok(Pool {
        id: id.clone(),
        factory: parse_optional_address(ENTITY, key, row.get("factory"))?,
        token0: parse_optional_address(ENTITY, key, row.get("token0"))?,
        token1: parse_optional_address(ENTITY, key, row.get("token1"))?,
        total_deposits: parse_amount(ENTITY, key, row.get("total_deposits"))?,
        total_withdrawals: parse_amount(ENTITY, key, row.get("total_withdrawals"))?,
        total_borrows: parse_amount(ENTITY, key, row.get("total_borrows"))?,
        total_repays: parse_amount(ENTITY, key, row.get("total_repays"))?,
        created: from_db_int(ENTITY, key, row.get("created"))?,
    })
}

fn user_from_row(id: &Address, row: &SqliteRow) -> Result<User, StoreError> {
    const ENTITY: &str = "user";
    let key = id.as_str();
    Ok(User {
        id: id.clone(),
        total_deposited: parse_amount(ENTITY, key, row.get("total_deposited"))?,
        total_withdrawn: parse_amount(ENTITY, key, row.get("total_withdrawn"))?,
        total_borrowed: parse_amount(ENTITY, key, row.get("total_borrowed"))?,
        total_repaid: parse_amount(ENTITY, key, row.get("total_repaid"))?,
    })
}
