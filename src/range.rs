//! 1-based inclusive genomic coordinate ranges.

use std::fmt;

/// A 1-based, inclusive coordinate range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    pub start: u64,
    pub end: u64,
}

impl Range {
    /// Creates a range, returning `None` unless `1 <= start <= end`.
    #[must_use]
    pub fn new(start: u64, end: u64) -> Option<Self> {
        (start >= 1 && start <= end).then_some(Self { start, end })
    }

    /// Number of positions covered.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    #[must_use]
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[must_use]
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn join(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
