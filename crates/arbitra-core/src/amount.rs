//! # Fixed-Point Amounts
//!
//! [`Amount`] counts thousandths of an asset unit ("millis"). `1.000` is
//! stored as `1000`. Arithmetic is checked, and the decimal parser follows
//! the funding-intent rules:
//!
//! - digits and at most one `.`; no sign, exponent or whitespace,
//! - at most three fractional digits are significant; further digits are
//!   truncated (floor), never rounded,
//! - values whose millis do not fit in a `u64` are rejected.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of implied decimal digits.
pub const DECIMALS: u32 = 3;

const SCALE: u64 = 1_000;

/// A non-negative amount with three implied decimal digits.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Construct from a raw count of thousandths.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// The raw count of thousandths.
    pub const fn millis(&self) -> u64 {
        self.0
    }

    /// Whether the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Parse a decimal string such as `1.000`, `0.5` or `12`.
    pub fn parse_decimal(s: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidAmount {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(invalid("empty"));
        }
        if !s.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return Err(invalid("only digits and a single '.' are allowed"));
        }
        if !s.bytes().any(|b| b.is_ascii_digit()) {
            return Err(invalid("no digits"));
        }

        let (int_str, frac_str) = match s.split_once('.') {
            Some((int_part, frac_part)) => {
                if frac_part.contains('.') {
                    return Err(invalid("more than one '.'"));
                }
                (int_part, frac_part)
            }
            None => (s, ""),
        };

        let mut whole: u64 = 0;
        for b in int_str.bytes() {
            whole = whole
                .checked_mul(10)
                .and_then(|w| w.checked_add(u64::from(b - b'0')))
                .ok_or_else(|| invalid("overflow"))?;
        }

        let mut frac: u64 = 0;
        let mut digits = 0;
        for b in frac_str.bytes().take(DECIMALS as usize) {
            frac = frac * 10 + u64::from(b - b'0');
            digits += 1;
        }
        while digits < DECIMALS {
            frac *= 10;
            digits += 1;
        }

        whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(frac))
            .map(Amount)
            .ok_or_else(|| invalid("overflow"))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:03}", self.0 / SCALE, self.0 % SCALE)
    }
}

impl std::str::FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}
