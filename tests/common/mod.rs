#![allow(dead_code)]

use poolscope::domain::{PoolCreatedParams, PositionParams, UserAmountParams};
use poolscope::{Address, Amount, LendingEvent, RawEvent, TxHash};

pub const FACTORY: u8 = 0xfa;
pub const POOL: u8 = 0x50;
pub const USER: u8 = 0x33;
pub const COLLATERAL: u8 = 0xc0;
pub const BORROW: u8 = 0xb0;

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn raw(emitter: u8, block: u64, log: u64, timestamp: u64, event: LendingEvent) -> RawEvent {
    RawEvent {
        address: addr(emitter),
        block_number: block,
        log_index: log,
        timestamp,
        transaction_hash: TxHash::repeat_byte((block % 256) as u8),
        event,
    }
}

pub fn pool_created(factory: u8, pool: u8, block: u64, log: u64, timestamp: u64) -> RawEvent {
    raw(
        factory,
        block,
        log,
        timestamp,
        LendingEvent::LendingPoolCreated(PoolCreatedParams {
            lending_pool: addr(pool),
            collateral_token: addr(COLLATERAL),
            borrow_token: addr(BORROW),
            ltv: Amount::from(7500u64),
        }),
    )
}

fn user_amount(user: u8, amount: u64) -> UserAmountParams {
    UserAmountParams {
        user: addr(user),
        amount: Amount::from(amount),
    }
}

pub fn supply_liquidity(pool: u8, user: u8, amount: u64, block: u64, log: u64) -> RawEvent {
    raw(pool, block, log, block * 10, LendingEvent::SupplyLiquidity(user_amount(user, amount)))
}

pub fn supply_collateral(pool: u8, user: u8, amount: u64, block: u64, log: u64) -> RawEvent {
    raw(pool, block, log, block * 10, LendingEvent::SupplyCollateral(user_amount(user, amount)))
}

pub fn withdraw_liquidity(pool: u8, user: u8, amount: u64, block: u64, log: u64) -> RawEvent {
    raw(pool, block, log, block * 10, LendingEvent::WithdrawLiquidity(user_amount(user, amount)))
}

pub fn borrow(pool: u8, user: u8, amount: u64, block: u64, log: u64) -> RawEvent {
    raw(pool, block, log, block * 10, LendingEvent::BorrowDebtCrosschain(user_amount(user, amount)))
}

pub fn repay(pool: u8, user: u8, amount: u64, block: u64, log: u64) -> RawEvent {
    raw(
        pool,
        block,
        log,
        block * 10,
        LendingEvent::RepayWithCollateralByPosition(user_amount(user, amount)),
    )
}

pub fn create_position(pool: u8, user: u8, block: u64, log: u64) -> RawEvent {
    raw(
        pool,
        block,
        log,
        block * 10,
        LendingEvent::CreatePosition(PositionParams { user: addr(user) }),
    )
}
