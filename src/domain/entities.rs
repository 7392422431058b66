//! Long-lived aggregate entities: Factory, Pool, User.
//!
//! Each is keyed by its address and starts from all-zero counters. Counters only
//! ever grow; reference fields are filled in at most once.

use crate::domain::{Address, Amount};
use serde::{Deserialize, Serialize};

/// Lending pool factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Factory {
    pub id: Address,
    pub total_pools_created: Amount,
    /// Block timestamp of the first pool creation observed for this factory.
    pub created: u64,
}

impl Factory {
    pub fn new(id: Address) -> Self {
        Factory {
            id,
            total_pools_created: Amount::zero(),
            created: 0,
        }
    }

    /// Count one more pool. The first one also stamps `created`.
    pub fn record_pool_created(&mut self, timestamp: u64) {
        if self.total_pools_created.is_zero() {
            self.created = timestamp;
        }
        self.total_pools_created += &Amount::from(1u64);
    }
}

/// Lending pool, keyed by the pool contract address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: Address,
    pub factory: Option<Address>,
    /// Collateral token.
    pub token0: Option<Address>,
    /// Borrow token.
    pub token1: Option<Address>,
    pub total_deposits: Amount,
    pub total_withdrawals: Amount,
    pub total_borrows: Amount,
    pub total_repays: Amount,
    pub created: u64,
}

impl Pool {
    pub fn new(id: Address) -> Self {
        Pool {
            id,
            factory: None,
            token0: None,
            token1: None,
            total_deposits: Amount::zero(),
            total_withdrawals: Amount::zero(),
            total_borrows: Amount::zero(),
            total_repays: Amount::zero(),
            created: 0,
        }
    }

    /// Whether a factory has announced this pool.
    pub fn is_created(&self) -> bool {
        self.factory.is_some()
    }

    /// Record creation details from the first announcement. Later calls leave
    /// the pool untouched.
    pub fn mark_created(
        &mut self,
        factory: &Address,
        collateral_token: &Address,
        borrow_token: &Address,
        timestamp: u64,
    ) {
        if self.is_created() {
            return;
        }
        self.factory = Some(factory.clone());
        self.token0 = Some(collateral_token.clone());
        self.token1 = Some(borrow_token.clone());
        self.created = timestamp;
    }
}

/// Wallet that has interacted with any pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Address,
    pub total_deposited: Amount,
    pub total_withdrawn: Amount,
    pub total_borrowed: Amount,
    pub total_repaid: Amount,
}

impl User {
    pub fn new(id: Address) -> Self {
        User {
            id,
            total_deposited: Amount::zero(),
            total_withdrawn: Amount::zero(),
            total_borrowed: Amount::zero(),
            total_repaid: Amount::zero(),
        }
    }
}
