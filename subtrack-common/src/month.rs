//! Calendar month tokens ("MM-YYYY")
//!
//! Months travel over the wire as `MM-YYYY` strings and are stored as an
//! integer ordinal (`year * 12 + month - 1`) so the database orders them
//! the same way the calendar does.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Length of a month token: `MM-YYYY`
const TOKEN_LEN: usize = 7;

/// A calendar month
///
/// Field order matters: the derived `Ord` compares year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Build a month from its parts. `month` must be 1..=12 and `year` 0..=9999.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::validation(format!("month out of range: {}", month)));
        }
        if !(0..=9999).contains(&year) {
            return Err(Error::validation(format!("year out of range: {}", year)));
        }
        Ok(Self { year, month })
    }

    /// Parse a strict `MM-YYYY` token
    ///
    /// # Examples
    /// ```
    /// use subtrack_common::Month;
    ///
    /// let m = Month::parse("03-2024").unwrap();
    /// assert_eq!(m.year(), 2024);
    /// assert_eq!(m.month(), 3);
    ///
    /// assert!(Month::parse("3-2024").is_err());
    /// assert!(Month::parse("13-2024").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        parse_token(s).ok_or_else(|| Error::validation(format!("invalid month token: {:?}", s)))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Storage encoding, monotonic in calendar order
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Inverse of [`Month::ordinal`]
    pub fn from_ordinal(ordinal: i64) -> Result<Self> {
        if ordinal < 0 {
            return Err(Error::Internal(format!("negative month ordinal: {}", ordinal)));
        }
        let year = i32::try_from(ordinal / 12)
            .map_err(|_| Error::Internal(format!("month ordinal out of range: {}", ordinal)))?;
        Self::new(year, (ordinal % 12) as u32 + 1)
            .map_err(|e| Error::Internal(format!("corrupt month ordinal {}: {}", ordinal, e)))
    }

    /// True when `end` is the same month as `start` or later
    pub fn is_end_after_start(start: Month, end: Month) -> bool {
        end >= start
    }
}

/// Strict token check: two-digit month 01..12, `-`, four ASCII digits
fn parse_token(s: &str) -> Option<Month> {
    let bytes = s.as_bytes();
    if bytes.len() != TOKEN_LEN || bytes[2] != b'-' {
        return None;
    }
    let (mm, yyyy) = (&bytes[..2], &bytes[3..]);
    if !mm.iter().chain(yyyy.iter()).all(u8::is_ascii_digit) {
        return None;
    }

    let month = mm.iter().fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
    let year = yyyy.iter().fold(0i32, |acc, d| acc * 10 + i32::from(d - b'0'));
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(Month { year, month })
}

/// True iff `s` is exactly `(0[1-9]|1[0-2])-\d{4}`
pub fn validate_month(s: &str) -> bool {
    parse_token(s).is_some()
}

/// Calendar comparison of two month tokens
///
/// Malformed tokens are rejected rather than compared as a zero date.
pub fn compare_months(a: &str, b: &str) -> Result<Ordering> {
    Ok(Month::parse(a)?.cmp(&Month::parse(b)?))
}

/// `end` is the same month as `start` or later
pub fn is_end_after_start(start: &str, end: &str) -> Result<bool> {
    Ok(compare_months(end, start)? != Ordering::Less)
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Month::parse(s)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Month::parse(&s).map_err(de::Error::custom)
    }
}
