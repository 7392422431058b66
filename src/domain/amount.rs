//! Arbitrary-precision unsigned amount backed by num-bigint.
//!
//! On-chain amounts are uint256 and running totals may exceed that, so sums are
//! never bounded. The canonical string form is base-10 without separators.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// Non-negative integer amount of unbounded size.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "AmountRepr", into = "String")]
pub struct Amount(BigUint);

/// Wire forms accepted for amounts: a JSON number or a decimal/`0x` hex string.
#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Number(u64),
    Text(String),
}

impl Amount {
    /// The additive identity (0).
    pub fn zero() -> Self {
        Amount(BigUint::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parse a base-10 string, or a `0x`-prefixed hex quantity.
    pub fn from_str_canonical(s: &str) -> Result<Self, AmountParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let (digits, radix) = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => (hex, 16),
            None => (trimmed, 10),
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(AmountParseError::Invalid(trimmed.to_string()));
        }

        BigUint::parse_bytes(digits.as_bytes(), radix)
            .map(Amount)
            .ok_or_else(|| AmountParseError::Invalid(trimmed.to_string()))
    }

    /// Format as a base-10 string.
    pub fn to_canonical_string(&self) -> String {
        self.0.to_str_radix(10)
    }

    pub fn inner(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl TryFrom<AmountRepr> for Amount {
    type Error = AmountParseError;

    fn try_from(value: AmountRepr) -> Result<Self, Self::Error> {
        match value {
            AmountRepr::Number(n) => Ok(Amount::from(n)),
            AmountRepr::Text(s) => Amount::from_str_canonical(&s),
        }
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_canonical_string()
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(BigUint::from(value))
    }
}

impl From<BigUint> for Amount {
    fn from(value: BigUint) -> Self {
        Amount(value)
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, rhs: &Amount) {
        self.0 += &rhs.0;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}
