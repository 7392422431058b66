//! Inbound lending protocol events as delivered by the event source.

use crate::domain::{Address, Amount, EventId, TxHash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One decoded log plus its block/transaction metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Emitting contract address.
    pub address: Address,
    pub block_number: u64,
    pub log_index: u64,
    /// Block timestamp in seconds.
    pub timestamp: u64,
    pub transaction_hash: TxHash,
    pub event: LendingEvent,
}

impl RawEvent {
    /// Deterministic record id for this event.
    pub fn id(&self) -> EventId {
        EventId::new(self.block_number, self.log_index)
    }
}

/// Event parameters, tagged by event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum LendingEvent {
    LendingPoolCreated(PoolCreatedParams),
    SupplyLiquidity(UserAmountParams),
    WithdrawLiquidity(UserAmountParams),
    BorrowDebtCrosschain(UserAmountParams),
    RepayWithCollateralByPosition(UserAmountParams),
    SupplyCollateral(UserAmountParams),
    CreatePosition(PositionParams),
}

impl LendingEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LendingEvent::LendingPoolCreated(_) => EventKind::LendingPoolCreated,
            LendingEvent::SupplyLiquidity(_) => EventKind::SupplyLiquidity,
            LendingEvent::WithdrawLiquidity(_) => EventKind::WithdrawLiquidity,
            LendingEvent::BorrowDebtCrosschain(_) => EventKind::BorrowDebtCrosschain,
            LendingEvent::RepayWithCollateralByPosition(_) => {
                EventKind::RepayWithCollateralByPosition
            }
            LendingEvent::SupplyCollateral(_) => EventKind::SupplyCollateral,
            LendingEvent::CreatePosition(_) => EventKind::CreatePosition,
        }
    }

    /// Whether the event is emitted by a factory rather than a pool.
    pub fn is_factory_event(&self) -> bool {
        matches!(self, LendingEvent::LendingPoolCreated(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolCreatedParams {
    pub lending_pool: Address,
    pub collateral_token: Address,
    pub borrow_token: Address,
    pub ltv: Amount,
}

/// Parameters shared by every pool event that moves an amount for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAmountParams {
    pub user: Address,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionParams {
    pub user: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    LendingPoolCreated,
    SupplyLiquidity,
    WithdrawLiquidity,
    BorrowDebtCrosschain,
    RepayWithCollateralByPosition,
    SupplyCollateral,
    CreatePosition,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::LendingPoolCreated => "LendingPoolCreated",
            EventKind::SupplyLiquidity => "SupplyLiquidity",
            EventKind::WithdrawLiquidity => "WithdrawLiquidity",
            EventKind::BorrowDebtCrosschain => "BorrowDebtCrosschain",
            EventKind::RepayWithCollateralByPosition => "RepayWithCollateralByPosition",
            EventKind::SupplyCollateral => "SupplyCollateral",
            EventKind::CreatePosition => "CreatePosition",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_event_json_shape() {
        let json = r#"{
            "address": "0x1111111111111111111111111111111111111111",
            "blockNumber": 101,
            "logIndex": 0,
            "timestamp": 1010,
            "transactionHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
            "event": {
                "kind": "SupplyLiquidity",
                "user": "0x3333333333333333333333333333333333333333",
                "amount": "300"
            }
        }"#;

        let event: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id().to_string(), "101-0");
        assert_eq!(event.event.kind(), EventKind::SupplyLiquidity);
        match event.event {
            LendingEvent::SupplyLiquidity(params) => {
                assert_eq!(params.user, Address::repeat_byte(0x33));
                assert_eq!(params.amount, Amount::from(300u64));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_pool_created_params_camel_case() {
        let json = r#"{
            "kind": "LendingPoolCreated",
            "lendingPool": "0x5050505050505050505050505050505050505050",
            "collateralToken": "0xc0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0",
            "borrowToken": "0xb0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0",
            "ltv": 7500
        }"#;
        let event: LendingEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_factory_event());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"kind": "Liquidate", "user": "0x3333333333333333333333333333333333333333"}"#;
        assert!(serde_json::from_str::<LendingEvent>(json).is_err());
    }
}
