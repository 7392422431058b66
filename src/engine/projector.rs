//! Event projector: turns one raw event into aggregate mutations plus one
//! immutable event record.
//!
//! Pool-scoped handlers resolve the pool by the emitting address and the user by
//! the event's `user` parameter. Pool creation is the only factory-scoped event;
//! it resolves the pool by its `lendingPool` parameter and asks the host to start
//! observing that address.
//!
//! Handlers only read from the store. Everything an event changes, including
//! the emitter's cursor, goes back in a single [`Changeset`].

use crate::domain::{
    Address, Amount, BorrowRecord, EventId, EventRecord, LendingEvent, Pool, PoolCreatedParams,
    PoolCreatedRecord, PositionParams, PositionRecord, RawEvent, RecordDetail, RepayRecord,
    SupplyRecord, User, UserAmountParams, WithdrawRecord, FIXED_BORROW_RATE,
    FIXED_BORROW_RATE_MODE,
};
use crate::engine::resolver::{get_or_create_factory, get_or_create_pool, get_or_create_user};
use crate::store::{Changeset, EntityStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Outcome of projecting one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub event_id: EventId,
    /// Contract addresses the host should begin observing.
    pub registrations: Vec<Address>,
    /// Set when the replay guard found an existing record and only cursors moved.
    pub skipped_duplicate: bool,
}

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Projector {
    store: Arc<dyn EntityStore>,
    replay_guard: bool,
}

impl Projector {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            replay_guard: false,
        }
    }

    /// Skip events whose record already exists instead of applying them again.
    ///
    /// Off by default: a replayed event is counted twice.
    pub fn with_replay_guard(mut self, enabled: bool) -> Self {
        self.replay_guard = enabled;
        self
    }

    /// Project a single event. Runs to completion before returning; callers must
    /// not project two events concurrently against the same store.
    ///
    /// The store sees one `apply` per event, so a failure leaves no partial
    /// counts behind.
    pub async fn project(&self, event: &RawEvent) -> Result<Projection, ProjectionError> {
        let event_id = event.id();
        // A skipped pool creation still has to be observed.
        let registrations = match &event.event {
            LendingEvent::LendingPoolCreated(params) => vec![params.lending_pool.clone()],
            _ => Vec::new(),
        };

        let duplicate =
            self.replay_guard && self.store.load_event_record(&event_id).await?.is_some();
        let mut changeset = if duplicate {
            debug!(
                event_id = %event_id,
                kind = %event.event.kind(),
                "Skipping already projected event"
            );
            Changeset::default()
        } else {
            self.changeset_for(event).await?
        };

        changeset.cursors.push((event.address.clone(), event_id));
        for pool in &registrations {
            changeset.cursors.push((pool.clone(), event_id));
        }
        self.store.apply(&changeset).await?;

        if !duplicate {
            debug!(
                event_id = %event_id,
                kind = %event.event.kind(),
                emitter = %event.address,
                "Projected event"
            );
        }
        Ok(Projection {
            event_id,
            registrations,
            skipped_duplicate: duplicate,
        })
    }

    async fn changeset_for(&self, event: &RawEvent) -> Result<Changeset, StoreError> {
        match &event.event {
            LendingEvent::LendingPoolCreated(params) => self.pool_created(event, params).await,
            LendingEvent::SupplyLiquidity(params) => self.supply_liquidity(event, params).await,
            LendingEvent::WithdrawLiquidity(params) => self.withdraw_liquidity(event, params).await,
            LendingEvent::BorrowDebtCrosschain(params) => {
                self.borrow_debt_crosschain(event, params).await
            }
            LendingEvent::RepayWithCollateralByPosition(params) => {
                self.repay_with_collateral(event, params).await
            }
            LendingEvent::SupplyCollateral(params) => self.supply_collateral(event, params).await,
            LendingEvent::CreatePosition(params) => self.create_position(event, params).await,
        }
    }

    async fn pool_created(
        &self,
        event: &RawEvent,
        params: &PoolCreatedParams,
    ) -> Result<Changeset, StoreError> {
        let store = self.store.as_ref();
        let mut factory = get_or_create_factory(store, &event.address).await?;
        let mut pool = get_or_create_pool(store, &params.lending_pool).await?;

        factory.record_pool_created(event.timestamp);
        pool.mark_created(
            &factory.id,
            &params.collateral_token,
            &params.borrow_token,
            event.timestamp,
        );

        Ok(Changeset {
            factory: Some(factory),
            pool: Some(pool),
            record: Some(record(
                event,
                RecordDetail::LendingPoolCreated(PoolCreatedRecord {
                    lending_pool: params.lending_pool.clone(),
                    collateral_token: params.collateral_token.clone(),
                    borrow_token: params.borrow_token.clone(),
                    ltv: params.ltv.clone(),
                }),
            )),
            ..Default::default()
        })
    }

    async fn supply_liquidity(
        &self,
        event: &RawEvent,
        params: &UserAmountParams,
    ) -> Result<Changeset, StoreError> {
        let (mut pool, mut user) = self.resolve_pool_and_user(event, &params.user).await?;

        user.total_deposited += &params.amount;
        pool.total_deposits += &params.amount;

        let detail = RecordDetail::SupplyLiquidity(SupplyRecord {
            user: user.id.clone(),
            pool: pool.id.clone(),
            asset: event.address.clone(),
            amount: params.amount.clone(),
            on_behalf_of: params.user.clone(),
        });
        Ok(pool_scoped(event, pool, user, detail))
    }

    async fn withdraw_liquidity(
        &self,
        event: &RawEvent,
        params: &UserAmountParams,
    ) -> Result<Changeset, StoreError> {
        let (mut pool, mut user) = self.resolve_pool_and_user(event, &params.user).await?;

        user.total_withdrawn += &params.amount;
        pool.total_withdrawals += &params.amount;

        let detail = RecordDetail::WithdrawLiquidity(WithdrawRecord {
            user: user.id.clone(),
            pool: pool.id.clone(),
            asset: event.address.clone(),
            amount: params.amount.clone(),
            to: params.user.clone(),
        });
        Ok(pool_scoped(event, pool, user, detail))
    }

    async fn borrow_debt_crosschain(
        &self,
        event: &RawEvent,
        params: &UserAmountParams,
    ) -> Result<Changeset, StoreError> {
        let (mut pool, mut user) = self.resolve_pool_and_user(event, &params.user).await?;

        user.total_borrowed += &params.amount;
        pool.total_borrows += &params.amount;

        let detail = RecordDetail::BorrowDebtCrosschain(BorrowRecord {
            user: user.id.clone(),
            pool: pool.id.clone(),
            asset: event.address.clone(),
            amount: params.amount.clone(),
            borrow_rate_mode: Amount::from(FIXED_BORROW_RATE_MODE),
            borrow_rate: Amount::from(FIXED_BORROW_RATE),
            on_behalf_of: params.user.clone(),
        });
        Ok(pool_scoped(event, pool, user, detail))
    }

    async fn repay_with_collateral(
        &self,
        event: &RawEvent,
        params: &UserAmountParams,
    ) -> Result<Changeset, StoreError> {
        let (mut pool, mut user) = self.resolve_pool_and_user(event, &params.user).await?;

        user.total_repaid += &params.amount;
        pool.total_repays += &params.amount;

        let detail = RecordDetail::RepayWithCollateralByPosition(RepayRecord {
            user: user.id.clone(),
            pool: pool.id.clone(),
            asset: event.address.clone(),
            amount: params.amount.clone(),
            repayer: params.user.clone(),
        });
        Ok(pool_scoped(event, pool, user, detail))
    }

    // Collateral lands in the same deposit totals as liquidity.
    async fn supply_collateral(
        &self,
        event: &RawEvent,
        params: &UserAmountParams,
    ) -> Result<Changeset, StoreError> {
        let (mut pool, mut user) = self.resolve_pool_and_user(event, &params.user).await?;

        user.total_deposited += &params.amount;
        pool.total_deposits += &params.amount;

        let detail = RecordDetail::SupplyCollateral(SupplyRecord {
            user: user.id.clone(),
            pool: pool.id.clone(),
            asset: event.address.clone(),
            amount: params.amount.clone(),
            on_behalf_of: params.user.clone(),
        });
        Ok(pool_scoped(event, pool, user, detail))
    }

    async fn create_position(
        &self,
        event: &RawEvent,
        params: &PositionParams,
    ) -> Result<Changeset, StoreError> {
        let (pool, user) = self.resolve_pool_and_user(event, &params.user).await?;

        // No counters move, but both sides become visible in the store.
        let detail = RecordDetail::CreatePosition(PositionRecord {
            user: user.id.clone(),
            pool: pool.id.clone(),
        });
        Ok(pool_scoped(event, pool, user, detail))
    }

    async fn resolve_pool_and_user(
        &self,
        event: &RawEvent,
        user: &Address,
    ) -> Result<(Pool, User), StoreError> {
        let store = self.store.as_ref();
        let pool = get_or_create_pool(store, &event.address).await?;
        let user = get_or_create_user(store, user).await?;
        Ok((pool, user))
    }
}

fn pool_scoped(event: &RawEvent, pool: Pool, user: User, detail: RecordDetail) -> Changeset {
    Changeset {
        pool: Some(pool),
        user: Some(user),
        record: Some(record(event, detail)),
        ..Default::default()
    }
}

fn record(event: &RawEvent, detail: RecordDetail) -> EventRecord {
    EventRecord {
        id: event.id(),
        timestamp: event.timestamp,
        block_number: event.block_number,
        transaction_hash: event.transaction_hash.clone(),
        detail,
    }
}
