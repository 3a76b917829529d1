// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

//! Subordinate ID ranges.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// A block of subordinate IDs, the half-open interval `[start, start + count)`.
///
/// Values are not validated: negative starts or counts are kept as parsed and
/// a zero count is an empty range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SubIdRange {
    pub start: i64,
    pub count: i64,
}

impl SubIdRange {
    pub fn new(start: i64, count: i64) -> Self {
        Self { start, count }
    }

    /// First ID after the range.
    ///
    /// Computed on 128 bits so that any pair of `i64` values is valid.
    pub fn end(&self) -> i128 {
        i128::from(self.start) + i128::from(self.count)
    }

    /// Whether the two ranges share at least one ID.
    ///
    /// Ranges touching at a bound do not overlap, and an empty range (zero or
    /// negative count) never overlaps anything, itself included.
    pub fn overlaps(&self, other: &SubIdRange) -> bool {
        if self.count <= 0 || other.count <= 0 {
            return false;
        }
        !(self.end() <= i128::from(other.start) || other.end() <= i128::from(self.start))
    }
}

impl From<(i64, i64)> for SubIdRange {
    fn from((start, count): (i64, i64)) -> Self {
        Self::new(start, count)
    }
}

impl From<SubIdRange> for (i64, i64) {
    fn from(range: SubIdRange) -> Self {
        (range.start, range.count)
    }
}

impl Display for SubIdRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// Check two `(start, count)` ranges for overlap.
pub fn overlaps(a: (i64, i64), b: (i64, i64)) -> bool {
    SubIdRange::from(a).overlaps(&SubIdRange::from(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_detects_overlapping_ranges() {
        assert!(overlaps((0, 10), (5, 10)));
        assert!(overlaps((5, 10), (0, 10)));
        // one inside the other
        assert!(overlaps((0, 100), (10, 5)));
        assert!(overlaps((10, 5), (0, 100)));
        assert!(overlaps((100000, 65536), (130000, 65536)));
    }

    #[test]
    fn it_accepts_adjacent_and_distant_ranges() {
        assert!(!overlaps((0, 10), (10, 10)));
        assert!(!overlaps((10, 10), (0, 10)));
        assert!(!overlaps((0, 10), (20, 5)));
        assert!(!overlaps((100000, 65536), (165536, 65536)));
    }

    #[test]
    fn empty_ranges_never_overlap() {
        assert!(!overlaps((0, 0), (0, 0)));
        assert!(!overlaps((5, 0), (0, 10)));
        assert!(!overlaps((0, 10), (5, 0)));
        assert!(!overlaps((5, 0), (5, 0)));
        // negative counts are empty intervals as well
        assert!(!overlaps((10, -5), (0, 20)));
        assert!(!overlaps((0, 20), (10, -5)));
    }

    #[test]
    fn it_is_symmetric() {
        let samples = [
            (0, 0),
            (0, 1),
            (0, 10),
            (5, 10),
            (9, 1),
            (10, 10),
            (-5, 6),
            (i64::MAX, i64::MAX),
            (i64::MIN, 3),
        ];
        for a in samples {
            for b in samples {
                assert_eq!(overlaps(a, b), overlaps(b, a), "{a:?} {b:?}");
            }
        }
    }

    #[test]
    fn it_does_not_overflow() {
        let top = SubIdRange::new(i64::MAX, i64::MAX);
        assert_eq!(top.end(), 2 * i128::from(i64::MAX));
        assert!(top.overlaps(&SubIdRange::new(i64::MAX, 1)));
        assert!(!top.overlaps(&SubIdRange::new(0, 10)));
    }

    #[test]
    fn it_displays_half_open_interval() {
        assert_eq!(
            SubIdRange::new(100000, 65536).to_string(),
            "[100000, 165536)"
        );
    }
}
