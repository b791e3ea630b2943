//! Tri-state sync status filter.

use super::parse::parse_int_prefix;
use std::fmt;

/// Filter on a record's sync status code.
///
/// The target is `None` when the raw value did not parse. That sentinel
/// equals no status code: [`StatusFilter::Only`] then keeps nothing and
/// [`StatusFilter::Except`] keeps everything. Records with no status code
/// never equal a target either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Keep records whose code equals the target.
    Only(Option<i64>),
    /// Keep records whose code differs from the target (`!` prefix).
    Except(Option<i64>),
}

impl StatusFilter {
    /// Parses a raw filter value such as `"200"` or `"!200"`.
    ///
    /// An empty value means no filter.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(match raw.strip_prefix('!') {
            Some(rest) => StatusFilter::Except(parse_int_prefix(rest)),
            None => StatusFilter::Only(parse_int_prefix(raw)),
        })
    }

    /// Returns the target code.
    pub fn target(&self) -> Option<i64> {
        match self {
            StatusFilter::Only(target) | StatusFilter::Except(target) => *target,
        }
    }

    /// Returns the same filter with the opposite polarity.
    pub fn negated(self) -> Self {
        match self {
            StatusFilter::Only(target) => StatusFilter::Except(target),
            StatusFilter::Except(target) => StatusFilter::Only(target),
        }
    }

    /// Decides whether a record with the given status code is kept.
    pub fn keeps(&self, status_code: Option<u16>) -> bool {
        let equal = match (status_code, self.target()) {
            (Some(code), Some(target)) => i64::from(code) == target,
            _ => false,
        };
        match self {
            StatusFilter::Only(_) => equal,
            StatusFilter::Except(_) => !equal,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let StatusFilter::Except(_) = self {
            write!(f, "!")?;
        }
        match self.target() {
            Some(target) => write!(f, "{target}"),
            None => write!(f, "NaN"),
        }
    }
}
