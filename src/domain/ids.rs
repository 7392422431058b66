//! Deterministic identifiers for event records.
//!
//! Aggregate ids are the normalized address string (see [`Address`]). Event
//! record ids are `"<blockNumber>-<logIndex>"`, unique as long as the source
//! never delivers two logs with the same (block, log index) pair.
//!
//! [`Address`]: crate::domain::Address

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid event id: {0}")]
pub struct EventIdParseError(String);

/// Position of a log in the chain. Orders by block number, then log index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId {
    pub block_number: u64,
    pub log_index: u64,
}

impl EventId {
    pub fn new(block_number: u64, log_index: u64) -> Self {
        EventId {
            block_number,
            log_index,
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.block_number, self.log_index)
    }
}

impl FromStr for EventId {
    type Err = EventIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (block, log) = s
            .split_once('-')
            .ok_or_else(|| EventIdParseError(s.to_string()))?;
        let block_number = block
            .parse::<u64>()
            .map_err(|_| EventIdParseError(s.to_string()))?;
        let log_index = log
            .parse::<u64>()
            .map_err(|_| EventIdParseError(s.to_string()))?;
        Ok(EventId::new(block_number, log_index))
    }
}

impl TryFrom<String> for EventId {
    type Error = EventIdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventId> for String {
    fn from(value: EventId) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_format() {
        assert_eq!(EventId::new(100, 2).to_string(), "100-2");
        assert_eq!(EventId::new(101, 0).to_string(), "101-0");
    }

    #[test]
    fn test_distinct_pairs_give_distinct_ids() {
        let ids = [
            EventId::new(1, 11),
            EventId::new(11, 1),
            EventId::new(1, 1),
            EventId::new(11, 11),
        ];
        let strings: std::collections::HashSet<String> =
            ids.iter().map(|id| id.to_string()).collect();
        assert_eq!(strings.len(), ids.len());
    }

    #[test]
    fn test_same_pair_collides() {
        assert_eq!(
            EventId::new(42, 7).to_string(),
            EventId::new(42, 7).to_string()
        );
    }

    #[test]
    fn test_parse_roundtrip_and_errors() {
        assert_eq!("100-2".parse::<EventId>().unwrap(), EventId::new(100, 2));
        assert!("100".parse::<EventId>().is_err());
        assert!("a-2".parse::<EventId>().is_err());
        assert!("100-2-3".parse::<EventId>().is_err());
    }

    #[test]
    fn test_ordering_is_block_then_log() {
        assert!(EventId::new(1, 99) < EventId::new(2, 0));
        assert!(EventId::new(2, 0) < EventId::new(2, 1));
    }
}
