//! Half-open `[begin, end)` ranges over token indices or character offsets.

use serde::{Deserialize, Serialize};

/// A half-open range on a discrete axis.
///
/// The default value is undefined (`begin > end`) so that [`Interval::cover`]
/// can grow a range from nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub begin: usize,
    pub end: usize,
}

impl Interval {
    pub const fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    pub const fn undefined() -> Self {
        Self {
            begin: usize::MAX,
            end: 0,
        }
    }

    /// A single position `[at, at + 1)`.
    pub const fn unit(at: usize) -> Self {
        Self::new(at, at + 1)
    }

    pub fn is_defined(&self) -> bool {
        self.begin < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_no_intersection(&self, other: &Interval) -> bool {
        self.end <= other.begin || other.end <= self.begin
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        !self.has_no_intersection(other)
    }

    /// Rebase by `by` positions.
    pub fn offset(self, by: usize) -> Self {
        Self::new(self.begin + by, self.end + by)
    }

    /// Extend by an interval that starts exactly where this one ends.
    ///
    /// An undefined interval takes `next` as is. Returns `false` and leaves
    /// `self` untouched when the two are not adjacent.
    pub fn adjoin(&mut self, next: Interval) -> bool {
        if !self.is_defined() {
            *self = next;
        } else if self.end == next.begin {
            self.end = next.end;
        } else {
            return false;
        }
        true
    }

    /// Grow to the smallest interval containing both.
    pub fn cover(&mut self, other: Interval) {
        self.begin = self.begin.min(other.begin);
        self.end = self.end.max(other.end);
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.begin..self.end
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::undefined()
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defined() {
        assert!(Interval::new(0, 1).is_defined());
        assert!(!Interval::new(3, 3).is_defined());
        assert!(!Interval::default().is_defined());
        assert_eq!(Interval::default().len(), 0);
    }

    #[test]
    fn test_intersection_is_half_open() {
        let a = Interval::new(0, 5);
        assert!(a.has_no_intersection(&Interval::new(5, 8)));
        assert!(Interval::new(5, 8).has_no_intersection(&a));
        assert!(a.intersects(&Interval::new(4, 6)));
        assert!(a.intersects(&Interval::new(1, 2)));
    }

    #[test]
    fn test_adjoin() {
        let mut span = Interval::undefined();
        assert!(span.adjoin(Interval::unit(2)));
        assert!(span.adjoin(Interval::unit(3)));
        assert_eq!(span, Interval::new(2, 4));
        assert!(!span.adjoin(Interval::unit(5)));
        assert_eq!(span, Interval::new(2, 4));
    }

    #[test]
    fn test_cover_from_undefined() {
        let mut span = Interval::undefined();
        span.cover(Interval::new(10, 12));
        span.cover(Interval::new(4, 6));
        assert_eq!(span, Interval::new(4, 12));
        assert_eq!(span.offset(3), Interval::new(7, 15));
    }
}
