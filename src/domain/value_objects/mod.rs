//! Value Objects for product variants

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of a variant axis ("Size", "Color")
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantName(String);

impl VariantName {
    pub fn new(value: impl Into<String>) -> Result<Self, NameError> {
        let value = value.into().trim().to_string();
        if value.is_empty() { return Err(NameError::Empty); }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for VariantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum NameError { Empty }
impl std::error::Error for NameError {}
impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Empty => write!(f, "variant type name is blank") }
    }
}

/// Ordered option labels parsed from a comma-separated string.
///
/// Tokens are trimmed and empty ones dropped. Order and duplicates are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionList(Vec<String>);

impl OptionList {
    pub fn parse(raw: &str) -> Self {
        Self(raw.split(',').map(str::trim).filter(|t| !t.is_empty()).map(String::from).collect())
    }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.0.iter().map(String::as_str) }
    pub fn as_slice(&self) -> &[String] { &self.0 }
    pub fn into_vec(self) -> Vec<String> { self.0 }
}

/// Unit price typed into the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub fn new(amount: Decimal) -> Self { Self(amount) }

    /// Lenient text parse; `None` for empty or non-numeric input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() { return None; }
        Decimal::from_str(raw).ok().map(Self)
    }
    pub fn amount(&self) -> Decimal { self.0 }
    pub fn is_positive(&self) -> bool { self.0 > Decimal::ZERO }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Stock count for one variant row. May be negative until validated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stock(i64);

impl Stock {
    pub fn new(value: i64) -> Self { Self(value) }

    /// Reads the leading integer of `raw`; anything unreadable counts as zero.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
        let value = digits[..end].parse::<i64>().unwrap_or(0);
        Self(if negative { -value } else { value })
    }
    pub fn value(&self) -> i64 { self.0 }
    pub fn is_negative(&self) -> bool { self.0 < 0 }
}
