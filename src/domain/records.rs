//! Immutable event records, one per observed raw event.

use crate::domain::{Address, Amount, EventId, EventKind, TxHash};
use serde::{Deserialize, Serialize};

/// Borrow rate mode recorded for every cross-chain borrow. Not computed.
pub const FIXED_BORROW_RATE_MODE: u64 = 1;
/// Borrow rate recorded for every cross-chain borrow. Not computed.
pub const FIXED_BORROW_RATE: u64 = 0;

/// Create-once audit row for a single event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: EventId,
    pub timestamp: u64,
    pub block_number: u64,
    pub transaction_hash: TxHash,
    pub detail: RecordDetail,
}

impl EventRecord {
    pub fn kind(&self) -> EventKind {
        self.detail.kind()
    }

    /// Pool the record belongs to. For pool creation this is the new pool.
    pub fn pool(&self) -> &Address {
        match &self.detail {
            RecordDetail::LendingPoolCreated(r) => &r.lending_pool,
            RecordDetail::SupplyLiquidity(r) | RecordDetail::SupplyCollateral(r) => &r.pool,
            RecordDetail::WithdrawLiquidity(r) => &r.pool,
            RecordDetail::BorrowDebtCrosschain(r) => &r.pool,
            RecordDetail::RepayWithCollateralByPosition(r) => &r.pool,
            RecordDetail::CreatePosition(r) => &r.pool,
        }
    }

    pub fn user(&self) -> Option<&Address> {
        match &self.detail {
            RecordDetail::LendingPoolCreated(_) => None,
            RecordDetail::SupplyLiquidity(r) | RecordDetail::SupplyCollateral(r) => Some(&r.user),
            RecordDetail::WithdrawLiquidity(r) => Some(&r.user),
            RecordDetail::BorrowDebtCrosschain(r) => Some(&r.user),
            RecordDetail::RepayWithCollateralByPosition(r) => Some(&r.user),
            RecordDetail::CreatePosition(r) => Some(&r.user),
        }
    }

    pub fn amount(&self) -> Option<&Amount> {
        match &self.detail {
            RecordDetail::LendingPoolCreated(_) | RecordDetail::CreatePosition(_) => None,
            RecordDetail::SupplyLiquidity(r) | RecordDetail::SupplyCollateral(r) => {
                Some(&r.amount)
            }
            RecordDetail::WithdrawLiquidity(r) => Some(&r.amount),
            RecordDetail::BorrowDebtCrosschain(r) => Some(&r.amount),
            RecordDetail::RepayWithCollateralByPosition(r) => Some(&r.amount),
        }
    }
}

/// Variant-specific fields, tagged by event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RecordDetail {
    LendingPoolCreated(PoolCreatedRecord),
    SupplyLiquidity(SupplyRecord),
    WithdrawLiquidity(WithdrawRecord),
    BorrowDebtCrosschain(BorrowRecord),
    RepayWithCollateralByPosition(RepayRecord),
    SupplyCollateral(SupplyRecord),
    CreatePosition(PositionRecord),
}

impl RecordDetail {
    pub fn kind(&self) -> EventKind {
        match self {
            RecordDetail::LendingPoolCreated(_) => EventKind::LendingPoolCreated,
            RecordDetail::SupplyLiquidity(_) => EventKind::SupplyLiquidity,
            RecordDetail::WithdrawLiquidity(_) => EventKind::WithdrawLiquidity,
            RecordDetail::BorrowDebtCrosschain(_) => EventKind::BorrowDebtCrosschain,
            RecordDetail::RepayWithCollateralByPosition(_) => {
                EventKind::RepayWithCollateralByPosition
            }
            RecordDetail::SupplyCollateral(_) => EventKind::SupplyCollateral,
            RecordDetail::CreatePosition(_) => EventKind::CreatePosition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolCreatedRecord {
    pub lending_pool: Address,
    pub collateral_token: Address,
    pub borrow_token: Address,
    pub ltv: Amount,
}

/// Shared by liquidity supply and collateral supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyRecord {
    pub user: Address,
    pub pool: Address,
    pub asset: Address,
    pub amount: Amount,
    pub on_behalf_of: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRecord {
    pub user: Address,
    pub pool: Address,
    pub asset: Address,
    pub amount: Amount,
    pub to: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    pub user: Address,
    pub pool: Address,
    pub asset: Address,
    pub amount: Amount,
    pub borrow_rate_mode: Amount,
    pub borrow_rate: Amount,
    pub on_behalf_of: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepayRecord {
    pub user: Address,
    pub pool: Address,
    pub asset: Address,
    pub amount: Amount,
    pub repayer: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub user: Address,
    pub pool: Address,
}
