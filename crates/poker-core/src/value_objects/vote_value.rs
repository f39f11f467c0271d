//! Vote values on the estimation scale
//!
//! On the wire a vote is a plain number; `-1` stands for "unknown". Internally
//! the unknown case is its own variant so it can never leak into aggregation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed numeric estimates
pub const ESTIMATION_SCALE: [u8; 11] = [0, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89];

/// Wire value for an "unknown / uncertain" vote
pub const UNKNOWN_SENTINEL: i64 = -1;

/// A single participant's estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum VoteValue {
    /// A value from [`ESTIMATION_SCALE`]
    Known(u8),
    /// The participant cannot estimate
    Unknown,
}

impl VoteValue {
    /// Parse a wire value
    pub fn from_wire(value: i64) -> Result<Self, VoteValueError> {
        if value == UNKNOWN_SENTINEL {
            return Ok(Self::Unknown);
        }

        u8::try_from(value)
            .ok()
            .filter(|v| ESTIMATION_SCALE.contains(v))
            .map(Self::Known)
            .ok_or(VoteValueError(value))
    }

    /// Wire representation
    #[must_use]
    pub fn to_wire(self) -> i64 {
        match self {
            Self::Known(v) => i64::from(v),
            Self::Unknown => UNKNOWN_SENTINEL,
        }
    }

    /// The numeric estimate, if any
    #[inline]
    pub fn known(self) -> Option<u8> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown => None,
        }
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = VoteValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_wire(value)
    }
}

impl From<VoteValue> for i64 {
    fn from(value: VoteValue) -> Self {
        value.to_wire()
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{v}"),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// Rejected wire value
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("vote value {0} is not on the estimation scale")]
pub struct VoteValueError(pub i64);
