//! Domain primitives: Address, TxHash.
//!
//! Both are stored as lowercase `0x`-prefixed hex so that the string form can be
//! used directly as an entity key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const ADDRESS_LEN: usize = 20;
const TX_HASH_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("missing 0x prefix: {0}")]
    MissingPrefix(String),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

fn normalize_hex(s: &str, expected: usize) -> Result<String, AddressParseError> {
    let trimmed = s.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| AddressParseError::MissingPrefix(trimmed.to_string()))?;
    let bytes =
        hex::decode(body).map_err(|_| AddressParseError::InvalidHex(trimmed.to_string()))?;
    if bytes.len() != expected {
        return Err(AddressParseError::InvalidLength {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// 20-byte contract or wallet address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address. Mixed-case input maps to the same value.
    pub fn parse(s: &str) -> Result<Self, AddressParseError> {
        normalize_hex(s, ADDRESS_LEN).map(Address)
    }

    /// Address with every byte set to `byte`.
    pub fn repeat_byte(byte: u8) -> Self {
        Address(format!("0x{}", hex::encode([byte; ADDRESS_LEN])))
    }

    /// Get the address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 32-byte transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(String);

impl TxHash {
    pub fn parse(s: &str) -> Result<Self, AddressParseError> {
        normalize_hex(s, TX_HASH_LEN).map(TxHash)
    }

    /// Hash with every byte set to `byte`.
    pub fn repeat_byte(byte: u8) -> Self {
        TxHash(format!("0x{}", hex::encode([byte; TX_HASH_LEN])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TxHash {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TxHash {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TxHash> for String {
    fn from(value: TxHash) -> Self {
        value.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_normalizes_case() {
        let upper = Address::parse("0xABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
        let lower = Address::parse("0xabcdef0123456789abcdef0123456789abcdef01").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!(matches!(
            Address::parse("abcdef"),
            Err(AddressParseError::MissingPrefix(_))
        ));
        assert!(matches!(
            Address::parse("0xzz"),
            Err(AddressParseError::InvalidHex(_))
        ));
        assert_eq!(
            Address::parse("0x1234"),
            Err(AddressParseError::InvalidLength {
                expected: 20,
                actual: 2
            })
        );
    }

    #[test]
    fn test_address_serde_uses_normalized_string() {
        let addr: Address =
            serde_json::from_str("\"0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\"").unwrap();
        assert_eq!(addr, Address::repeat_byte(0xaa));
        assert_eq!(
            serde_json::to_string(&addr).unwrap(),
            "\"0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\""
        );
    }

    #[test]
    fn test_tx_hash_length() {
        assert!(TxHash::parse(Address::repeat_byte(1).as_str()).is_err());
        let hash = TxHash::repeat_byte(0xab);
        assert_eq!(hash.as_str().len(), 66);
    }
}
