//! # Fixed-Point Ledger Amounts
//!
//! The ledger represents every balance as a decimal string with exactly seven
//! fractional digits. `Amount` stores the same value as a signed count of
//! 10^-7 units (stroops) so that pool splitting, truncation and summation are
//! exact.

use crate::errors::AmountError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of stroops in one whole unit of any asset.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// Number of fractional digits the ledger uses for amounts.
pub const DECIMALS: usize = 7;

/// An asset amount in stroops (10^-7 units).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Build from a raw stroop count.
    pub const fn from_stroops(stroops: i64) -> Self {
        Self(stroops)
    }

    /// Build from whole units. Saturates instead of overflowing.
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(STROOPS_PER_UNIT))
    }

    pub const fn stroops(self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero (`12.9` -> `12`).
    pub const fn whole_units(self) -> i64 {
        self.0 / STROOPS_PER_UNIT
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Floor division by a positive integer divisor.
    ///
    /// Returns `None` when `divisor` is not positive.
    pub fn div_floor(self, divisor: i64) -> Option<Amount> {
        if divisor <= 0 {
            return None;
        }
        Some(Amount(self.0.div_euclid(divisor)))
    }

    /// `floor(self * numerator / denominator)` computed in 128-bit integers.
    ///
    /// Returns `None` when `denominator` is zero or the result does not fit
    /// in an `i64`.
    pub fn mul_div_floor(self, numerator: i64, denominator: i64) -> Option<Amount> {
        if denominator == 0 {
            return None;
        }
        let product = i128::from(self.0) * i128::from(numerator);
        let quotient = product.div_euclid(i128::from(denominator));
        i64::try_from(quotient).ok().map(Amount)
    }

    /// Approximate value in whole units, for display and price ratios only.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / STROOPS_PER_UNIT as f64
    }

    /// Parse the ledger's decimal representation (`"12.5"`, `"0.0000001"`).
    pub fn parse(input: &str) -> Result<Amount, AmountError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(AmountError::Invalid(input.to_string()));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::Invalid(input.to_string()));
        }
        if fraction.len() > DECIMALS {
            return Err(AmountError::TooPrecise {
                value: input.to_string(),
                max_decimals: DECIMALS,
            });
        }

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| AmountError::Overflow(input.to_string()))?
        };

        let mut fraction_stroops: i64 = 0;
        for (i, digit) in fraction.bytes().enumerate() {
            let place = 10_i64.pow((DECIMALS - 1 - i) as u32);
            fraction_stroops += i64::from(digit - b'0') * place;
        }

        let stroops = whole_units
            .checked_mul(STROOPS_PER_UNIT)
            .and_then(|w| w.checked_add(fraction_stroops))
            .ok_or_else(|| AmountError::Overflow(input.to_string()))?;

        Ok(Amount(if negative { -stroops } else { stroops }))
    }
}

impl fmt::Display for Amount {
    /// Always renders seven fractional digits, as the ledger expects.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = STROOPS_PER_UNIT as u64;
        write!(f, "{}{}.{:07}", sign, abs / unit, abs % unit)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}
