//! Token amount type.
//!
//! Amounts are fixed-point integers (u128) counted in base units to avoid
//! floating-point errors. One human-scale token is 10^18 base units, the
//! conventional fungible-token scaling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::TypeError;

/// Number of fractional decimal places of a human-scale token.
pub const TOKEN_DECIMALS: u32 = 18;

/// Base units per human-scale token (10^18).
pub const TOKEN_UNIT: u128 = 10u128.pow(TOKEN_DECIMALS);

/// A token amount in base units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Scale a whole number of human-scale tokens into base units.
    ///
    /// # Panics
    /// Panics on overflow (more than ~3.4 * 10^20 tokens).
    pub const fn from_tokens(tokens: u128) -> Self {
        match tokens.checked_mul(TOKEN_UNIT) {
            Some(raw) => Self(raw),
            None => panic!("token amount overflows u128 base units"),
        }
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Whole human-scale tokens, truncating the fractional part.
    pub fn whole_tokens(&self) -> u128 {
        self.0 / TOKEN_UNIT
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Parse a human-scale decimal string (e.g. `"135.7623"`) into base units.
    ///
    /// Accepts an integer part and up to 18 fractional digits. Signs,
    /// exponents and digit separators are rejected.
    pub fn parse_units(input: &str) -> Result<Self, TypeError> {
        let invalid = |reason| TypeError::InvalidAmount {
            input: input.to_string(),
            reason,
        };

        let s = input.trim();
        if s.is_empty() {
            return Err(invalid("empty"));
        }
        let (int_part, frac_part) = match s.split_once('.') {
            Some((int_part, frac_part)) => {
                if frac_part.is_empty() {
                    return Err(invalid("missing fractional digits"));
                }
                (int_part, frac_part)
            }
            None => (s, ""),
        };
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("integer part must be decimal digits"));
        }
        if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("fractional part must be decimal digits"));
        }
        if frac_part.len() > TOKEN_DECIMALS as usize {
            return Err(invalid("more than 18 fractional digits"));
        }

        let whole: u128 = int_part.parse().map_err(|_| invalid("overflow"))?;
        let whole = whole.checked_mul(TOKEN_UNIT).ok_or_else(|| invalid("overflow"))?;

        let frac = if frac_part.is_empty() {
            0
        } else {
            let digits: u128 = frac_part.parse().map_err(|_| invalid("overflow"))?;
            digits * 10u128.pow(TOKEN_DECIMALS - frac_part.len() as u32)
        };

        whole
            .checked_add(frac)
            .map(Self)
            .ok_or_else(|| invalid("overflow"))
    }

    /// Render the amount as a human-scale decimal with trailing zeros trimmed.
    pub fn format_units(&self) -> String {
        let whole = self.0 / TOKEN_UNIT;
        let frac = self.0 % TOKEN_UNIT;
        if frac == 0 {
            return whole.to_string();
        }
        let digits = format!("{:018}", frac);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl Add for TokenAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TokenAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_units())
    }
}

impl FromStr for TokenAmount {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_units(s)
    }
}
