//! Revision numbers
//!
//! Revision numbers are strictly increasing 64-bit integers. Zero means
//! "no revisions yet". `HEAD` is a lookup sentinel meaning "the latest
//! revision, whatever it is"; it is resolved against the store and never
//! stored in a revision.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A revision sequence number, or the `HEAD` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevisionNumber(u64);

impl RevisionNumber {
    /// The number of an empty history
    pub const ZERO: RevisionNumber = RevisionNumber(0);

    /// Sentinel for "the latest revision"
    pub const HEAD: RevisionNumber = RevisionNumber(u64::MAX);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_head(&self) -> bool {
        *self == Self::HEAD
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The number following this one. Saturates below `HEAD`.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1).min(u64::MAX - 1))
    }
}

impl PartialOrd for RevisionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RevisionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for RevisionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_head() {
            write!(f, "HEAD")
        } else {
            write!(f, "R{}", self.0)
        }
    }
}

impl From<u64> for RevisionNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for RevisionNumber {
    type Err = std::num::ParseIntError;

    /// Accepts `head` (any case) or a decimal number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("head") {
            return Ok(Self::HEAD);
        }
        s.parse::<u64>().map(Self)
    }
}

impl Serialize for RevisionNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_numeric() {
        assert!(RevisionNumber::new(2) > RevisionNumber::new(1));
        assert!(RevisionNumber::ZERO < RevisionNumber::new(1));
    }

    #[test]
    fn test_head_sentinel() {
        assert!(RevisionNumber::HEAD.is_head());
        assert!(!RevisionNumber::new(7).is_head());
        assert_eq!(RevisionNumber::HEAD.to_string(), "HEAD");
    }

    #[test]
    fn test_next_never_reaches_head() {
        let almost = RevisionNumber::new(u64::MAX - 1);
        assert!(!almost.next().is_head());
        assert_eq!(RevisionNumber::new(4).next(), RevisionNumber::new(5));
    }

    #[test]
    fn test_parse() {
        assert_eq!("head".parse::<RevisionNumber>().unwrap(), RevisionNumber::HEAD);
        assert_eq!("HEAD".parse::<RevisionNumber>().unwrap(), RevisionNumber::HEAD);
        assert_eq!("12".parse::<RevisionNumber>().unwrap(), RevisionNumber::new(12));
        assert!("twelve".parse::<RevisionNumber>().is_err());
    }
}
