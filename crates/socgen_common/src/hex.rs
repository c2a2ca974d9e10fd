//! Hexadecimal address and size values.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// An address, offset, or range size written in hexadecimal.
///
/// Parses strings like `"0x1000"`, `"0X8000_0000"`, and bare digits such as
/// `"ff"`. Every value in a design description is hexadecimal text, so bare
/// digits are never read as decimal. Displays with a lowercase `0x` prefix;
/// [`HexValue::upper`] gives the upper-cased form used for emitted ranges.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HexValue(u64);

impl HexValue {
    /// The zero address.
    pub const ZERO: HexValue = HexValue(0);

    /// Creates a value from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Adds two values, returning `None` on 64-bit overflow.
    pub fn checked_add(self, rhs: HexValue) -> Option<HexValue> {
        self.0.checked_add(rhs.0).map(HexValue)
    }

    /// Renders the value upper-cased, prefix included (`0X1000`).
    pub fn upper(&self) -> String {
        format!("0X{:X}", self.0)
    }
}

impl fmt::Debug for HexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexValue({self})")
    }
}

impl fmt::Display for HexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl From<u64> for HexValue {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Error type for parsing hexadecimal strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hexadecimal value: '{input}'")]
pub struct ParseHexError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for HexValue {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseHexError {
            input: s.to_string(),
        };

        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        // `_` may only separate two digit groups.
        let well_formed = !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_hexdigit() || c == '_')
            && !digits.starts_with('_')
            && !digits.ends_with('_')
            && !digits.contains("__");
        if !well_formed {
            return Err(err());
        }
        let digits: String = digits.chars().filter(|c| *c != '_').collect();
        u64::from_str_radix(&digits, 16)
            .map(HexValue)
            .map_err(|_| err())
    }
}

impl<'de> Deserialize<'de> for HexValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = HexValue;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a hexadecimal string such as \"0x1000\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}
