//! Domain types for the lending pool indexer.
//!
//! This module provides:
//! - Primitives: Address, TxHash, arbitrary-precision Amount
//! - Deterministic event ids
//! - Inbound events, aggregate entities, and immutable event records

pub mod amount;
pub mod entities;
pub mod events;
pub mod ids;
pub mod primitives;
pub mod records;

pub use amount::{Amount, AmountParseError};
pub use entities::{Factory, Pool, User};
pub use events::{
    EventKind, LendingEvent, PoolCreatedParams, PositionParams, RawEvent, UserAmountParams,
};
pub use ids::{EventId, EventIdParseError};
pub use primitives::{Address, AddressParseError, TxHash};
pub use records::{
    BorrowRecord, EventRecord, PoolCreatedRecord, PositionRecord, RecordDetail, RepayRecord,
    SupplyRecord, WithdrawRecord, FIXED_BORROW_RATE, FIXED_BORROW_RATE_MODE,
};
